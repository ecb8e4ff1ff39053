//! Startup Auto-Centering
//!
//! Skips a configurable number of lead-in samples, then takes the next raw
//! sample as the zero point and maps every following sample into a range
//! symmetric around zero.

use tracing::debug;

use crate::error::{CleanerResult, check_range};

/// Symmetric output range `[-half, half)` used for wrapping.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SymmetricRange {
    /// Upper bound (exclusive)
    pub max: f32,
    /// Lower bound (inclusive), equal to `-max`
    pub min: f32,
    /// Full width, `2 * max`
    pub span: f32,
}

impl SymmetricRange {
    /// Build the range for a given half range.
    pub fn new(half_range: f32) -> Self {
        Self {
            max: half_range,
            min: -half_range,
            span: half_range * 2.0,
        }
    }

    /// Shift `value` by one span if it falls outside the range.
    ///
    /// Only one span is ever added or removed, so a value more than a full
    /// span outside the range stays outside.
    #[inline]
    pub fn wrap_once(&self, value: f32) -> f32 {
        self.wrap_once_wide(f64::from(value)) as f32
    }

    #[inline]
    fn wrap_once_wide(&self, value: f64) -> f64 {
        if value >= f64::from(self.max) {
            value - f64::from(self.span)
        } else if value < f64::from(self.min) {
            value + f64::from(self.span)
        } else {
            value
        }
    }
}

/// Calibration phase.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CenterPhase {
    /// Discarding samples; calibration happens on the sample after `remaining` reaches zero
    LeadIn {
        /// Samples still to discard
        remaining: u32,
    },
    /// Offset locked in; samples are shifted and wrapped
    Active {
        /// Value added to every raw sample
        offset: f32,
    },
}

/// Auto-center state machine.
///
/// # Example
///
/// ```
/// use points_cleaner::AutoCenter;
///
/// let mut center = AutoCenter::new(1, std::f32::consts::PI)?;
/// assert_eq!(center.apply(0.4), None); // lead-in
/// assert_eq!(center.apply(0.5), Some(0.0)); // calibrates on this sample
/// assert!(center.is_calibrated());
/// # Ok::<(), points_cleaner::CleanerError>(())
/// ```
#[derive(Copy, Clone, Debug)]
pub struct AutoCenter {
    lead_in: u32,
    range: SymmetricRange,
    phase: CenterPhase,
}

impl AutoCenter {
    /// Arm auto-centering.
    ///
    /// # Arguments
    ///
    /// * `lead_in` - Samples to discard before calibrating
    /// * `half_range` - Half of the symmetric output range (e.g. π for angles)
    ///
    /// # Errors
    ///
    /// Returns an error if `half_range` is not finite or not positive.
    pub fn new(lead_in: u32, half_range: f32) -> CleanerResult<Self> {
        check_range("half_range", half_range, f32::MIN_POSITIVE, f32::MAX / 2.0)?;
        Ok(Self {
            lead_in,
            range: SymmetricRange::new(half_range),
            phase: CenterPhase::LeadIn { remaining: lead_in },
        })
    }

    /// Feed a raw sample through the stage.
    ///
    /// Returns `None` while the lead-in is still running. The calibrating
    /// sample itself maps to `0.0`.
    ///
    /// The shift and wrap run in `f64`. A result that still does not fit in
    /// `f32` comes back infinite; only the active phase can produce one, and
    /// it changes no state.
    #[inline]
    pub fn apply(&mut self, raw: f32) -> Option<f32> {
        let offset = match self.phase {
            CenterPhase::LeadIn { remaining } if remaining > 0 => {
                self.phase = CenterPhase::LeadIn {
                    remaining: remaining - 1,
                };
                return None;
            }
            CenterPhase::LeadIn { .. } => {
                let offset = -raw;
                debug!(offset, "auto-center calibrated");
                self.phase = CenterPhase::Active { offset };
                offset
            }
            CenterPhase::Active { offset } => offset,
        };

        let shifted = f64::from(raw) + f64::from(offset);
        Some(self.range.wrap_once_wide(shifted) as f32)
    }

    /// Restart the lead-in, dropping any learned offset.
    pub fn rearm(&mut self) {
        self.phase = CenterPhase::LeadIn {
            remaining: self.lead_in,
        };
    }

    /// Current phase.
    pub fn phase(&self) -> CenterPhase {
        self.phase
    }

    /// Whether the offset has been learned.
    pub fn is_calibrated(&self) -> bool {
        matches!(self.phase, CenterPhase::Active { .. })
    }

    /// Learned offset, if calibrated.
    pub fn offset(&self) -> Option<f32> {
        match self.phase {
            CenterPhase::Active { offset } => Some(offset),
            CenterPhase::LeadIn { .. } => None,
        }
    }

    /// Configured lead-in length.
    pub fn lead_in(&self) -> u32 {
        self.lead_in
    }

    /// Output range.
    pub fn range(&self) -> SymmetricRange {
        self.range
    }
}
