//! Consensus-Gated Points Cleaner
//!
//! Per-sample flow:
//!
//! ```text
//! raw → AutoCenter (optional) → threshold gate ─┬─ |delta| > threshold1 → accept as-is
//!                                                └─ DeltaWindow vote → damped correction
//! ```

use tracing::{debug, trace};

use crate::auto_center::AutoCenter;
use crate::config::{
    AutoCenterConfig, CleanerConfig, DEFAULT_MATCH_FRACTION, DEFAULT_REACTION_SPEED,
    DEFAULT_THRESHOLD1, DEFAULT_THRESHOLD2,
};
use crate::error::{CleanerError, CleanerResult, check_non_negative, check_range};
use crate::window::DeltaWindow;

/// Products closer than this to an integer count as that integer.
const MATCH_COUNT_EPSILON: f64 = 1e-6;

/// Output of one processed sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Reading {
    /// Auto-center lead-in is still running; no output yet
    Pending,
    /// Cleaned value
    Clean(f32),
}

impl Reading {
    /// The cleaned value, if any.
    pub fn value(self) -> Option<f32> {
        match self {
            Reading::Pending => None,
            Reading::Clean(value) => Some(value),
        }
    }

    /// Whether no output was available.
    pub fn is_pending(self) -> bool {
        matches!(self, Reading::Pending)
    }
}

/// Path taken by the most recent sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Decision {
    /// Nothing processed yet, or the sample was swallowed by the auto-center lead-in
    Pending,
    /// Jump above threshold1 accepted directly; window untouched
    Bypassed {
        /// Jump size, infinite when the jump spans more than the `f32` range
        delta: f32,
    },
    /// Too few deltas agreed in sign; output held
    NoConsensus {
        /// Agreeing deltas
        matches: usize,
        /// Agreeing deltas needed
        required: usize,
    },
    /// Consensus reached but the damped correction was within threshold2; output held
    Suppressed {
        /// Agreeing deltas
        matches: usize,
        /// Correction that was dropped
        correction: f32,
    },
    /// Consensus reached and the damped correction applied
    Corrected {
        /// Agreeing deltas
        matches: usize,
        /// Correction added to the output
        correction: f32,
    },
}

impl Decision {
    /// Correction that moved the output on this sample, 0.0 if none.
    pub fn applied_correction(self) -> f32 {
        match self {
            Decision::Corrected { correction, .. } => correction,
            _ => 0.0,
        }
    }
}

/// `ceil(fraction * window_size)`, multiplied in full precision.
///
/// A product within 1e-6 of an integer counts as that integer, so a fraction
/// of 0.6 over 5 slots needs 3 matches even though `0.6f32 * 5` lands just
/// above 3.
fn required_matches(match_fraction: f32, window_size: usize) -> usize {
    let product = f64::from(match_fraction) * window_size as f64;
    let nearest = product.round();
    let count = if (product - nearest).abs() < MATCH_COUNT_EPSILON {
        nearest
    } else {
        product.ceil()
    };
    (count.max(0.0) as usize).min(window_size)
}

/// Adaptive noise filter for one scalar signal channel.
///
/// Large jumps are trusted and pass straight through. Small deltas are
/// recorded in a circular window; the output only moves when enough of the
/// window agrees with the current delta's direction, and then only by a
/// damped share of the agreeing deltas' mean.
///
/// # RT Safety
///
/// - The delta window is allocated once in the constructor
/// - [`process_sample`](Self::process_sample) performs no allocation or I/O
/// - O(n) in the window length per sample
///
/// # Example
///
/// ```
/// use points_cleaner::{PointsCleaner, Reading};
///
/// let mut cleaner = PointsCleaner::new(5)?;
///
/// // Large jump: accepted as-is
/// assert_eq!(cleaner.process_sample(1.0)?, Reading::Clean(1.0));
///
/// // Small jitter: held
/// assert_eq!(cleaner.process_sample(1.01)?, Reading::Clean(1.0));
/// # Ok::<(), points_cleaner::CleanerError>(())
/// ```
#[derive(Clone, Debug)]
pub struct PointsCleaner {
    threshold1: f32,
    threshold2: f32,
    match_fraction: f32,
    required_matches: usize,
    reaction_speed: f32,
    window: DeltaWindow,
    last_accepted: f32,
    auto_center: Option<AutoCenter>,
    last_decision: Decision,
}

impl PointsCleaner {
    /// Create a cleaner with default tuning and auto-center disabled.
    ///
    /// Defaults: threshold1 = 0.15, threshold2 = 0.17, match fraction = 0.98,
    /// reaction speed = 0.2.
    ///
    /// # Errors
    ///
    /// Returns [`CleanerError::InvalidWindowSize`] when `window_size` is zero.
    pub fn new(window_size: usize) -> CleanerResult<Self> {
        let window = DeltaWindow::new(window_size)?;
        Ok(Self {
            threshold1: DEFAULT_THRESHOLD1,
            threshold2: DEFAULT_THRESHOLD2,
            match_fraction: DEFAULT_MATCH_FRACTION,
            required_matches: required_matches(DEFAULT_MATCH_FRACTION, window_size),
            reaction_speed: DEFAULT_REACTION_SPEED,
            window,
            last_accepted: 0.0,
            auto_center: None,
            last_decision: Decision::Pending,
        })
    }

    /// Create a cleaner from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns the first parameter violation reported by
    /// [`CleanerConfig::validate`].
    pub fn from_config(config: &CleanerConfig) -> CleanerResult<Self> {
        config.validate()?;
        let mut cleaner = Self::new(config.window_size)?;
        cleaner.set_threshold1(config.threshold1)?;
        cleaner.set_threshold2(config.threshold2)?;
        cleaner.set_match_fraction(config.match_fraction)?;
        cleaner.set_reaction_speed(config.reaction_speed)?;
        if let Some(auto_center) = &config.auto_center {
            cleaner.enable_auto_center(auto_center.lead_in, auto_center.half_range)?;
        }
        debug!(
            window_size = config.window_size,
            required_matches = cleaner.required_matches,
            auto_center = config.auto_center.is_some(),
            "points cleaner configured"
        );
        Ok(cleaner)
    }

    /// Set the gate threshold (radians).
    ///
    /// # Errors
    ///
    /// Returns an error if `threshold` is negative or not finite.
    pub fn set_threshold1(&mut self, threshold: f32) -> CleanerResult<()> {
        check_non_negative("threshold1", threshold)?;
        self.threshold1 = threshold;
        Ok(())
    }

    /// Set the correction-suppression threshold (radians).
    ///
    /// # Errors
    ///
    /// Returns an error if `threshold` is negative or not finite.
    pub fn set_threshold2(&mut self, threshold: f32) -> CleanerResult<()> {
        check_non_negative("threshold2", threshold)?;
        self.threshold2 = threshold;
        Ok(())
    }

    /// Set the fraction of window deltas that must agree, recomputing the
    /// required match count.
    ///
    /// # Errors
    ///
    /// Returns an error if `fraction` is outside `[0, 1]` or not finite.
    pub fn set_match_fraction(&mut self, fraction: f32) -> CleanerResult<()> {
        check_range("match_fraction", fraction, 0.0, 1.0)?;
        self.match_fraction = fraction;
        self.required_matches = required_matches(fraction, self.window.len());
        debug!(
            match_fraction = fraction,
            required_matches = self.required_matches,
            "match fraction updated"
        );
        Ok(())
    }

    /// Set the share of the agreeing deltas' mean that is applied.
    ///
    /// # Errors
    ///
    /// Returns an error if `speed` is outside `[0, 1]` or not finite.
    pub fn set_reaction_speed(&mut self, speed: f32) -> CleanerResult<()> {
        check_range("reaction_speed", speed, 0.0, 1.0)?;
        self.reaction_speed = speed;
        Ok(())
    }

    /// Arm startup auto-centering.
    ///
    /// The next `lead_in` samples produce [`Reading::Pending`]; the sample
    /// after that becomes the zero point.
    ///
    /// # Errors
    ///
    /// Returns an error if `half_range` is not finite or not positive.
    pub fn enable_auto_center(&mut self, lead_in: u32, half_range: f32) -> CleanerResult<()> {
        self.auto_center = Some(AutoCenter::new(lead_in, half_range)?);
        debug!(lead_in, half_range, "auto-center armed");
        Ok(())
    }

    /// Turn auto-centering off; raw samples pass through unchanged.
    pub fn disable_auto_center(&mut self) {
        self.auto_center = None;
    }

    /// Process one raw sample.
    ///
    /// # Errors
    ///
    /// Returns [`CleanerError::NonFiniteSample`] for NaN or infinite input,
    /// and [`CleanerError::CenteredOverflow`] when a finite sample leaves the
    /// `f32` range after the auto-center shift. Either way the sample is
    /// dropped without touching any state, including the auto-center lead-in
    /// count.
    #[inline]
    pub fn process_sample(&mut self, raw: f32) -> CleanerResult<Reading> {
        if !raw.is_finite() {
            trace!(raw, "non-finite sample rejected");
            return Err(CleanerError::NonFiniteSample(raw));
        }

        let value = match self.auto_center.as_mut() {
            Some(auto_center) => match auto_center.apply(raw) {
                Some(value) => value,
                None => {
                    self.last_decision = Decision::Pending;
                    return Ok(Reading::Pending);
                }
            },
            None => raw,
        };
        if !value.is_finite() {
            trace!(raw, "centered sample overflowed");
            return Err(CleanerError::CenteredOverflow(raw));
        }

        // Both operands are finite: an overflowing delta is infinite and takes the bypass
        let delta = value - self.last_accepted;
        self.last_decision = if delta.abs() > self.threshold1 {
            // Large jumps are trusted and kept out of the window statistics
            self.last_accepted = value;
            Decision::Bypassed { delta }
        } else {
            self.smooth(delta)
        };

        trace!(raw, value, decision = ?self.last_decision, output = self.last_accepted);
        Ok(Reading::Clean(self.last_accepted))
    }

    fn smooth(&mut self, delta: f32) -> Decision {
        self.window.push(delta);

        let vote = self.window.consensus(delta);
        if vote.matches < self.required_matches {
            return Decision::NoConsensus {
                matches: vote.matches,
                required: self.required_matches,
            };
        }

        let correction = vote.average() * self.reaction_speed;
        let corrected = self.last_accepted + correction;
        if correction.abs() > self.threshold2 && corrected.is_finite() {
            self.last_accepted = corrected;
            Decision::Corrected {
                matches: vote.matches,
                correction,
            }
        } else {
            Decision::Suppressed {
                matches: vote.matches,
                correction,
            }
        }
    }

    /// Clear the window and output and re-arm auto-centering.
    ///
    /// Tuning parameters are kept.
    pub fn reset(&mut self) {
        self.window.clear();
        self.last_accepted = 0.0;
        self.last_decision = Decision::Pending;
        if let Some(auto_center) = self.auto_center.as_mut() {
            auto_center.rearm();
        }
    }

    /// Most recently returned value.
    pub fn last_accepted(&self) -> f32 {
        self.last_accepted
    }

    /// Path taken by the most recent sample.
    pub fn last_decision(&self) -> Decision {
        self.last_decision
    }

    /// Agreeing deltas needed before a correction is considered.
    pub fn required_matches(&self) -> usize {
        self.required_matches
    }

    /// Delta window length.
    pub fn window_size(&self) -> usize {
        self.window.len()
    }

    /// Recorded deltas in storage order.
    pub fn deltas(&self) -> &[f32] {
        self.window.as_slice()
    }

    /// Gate threshold.
    pub fn threshold1(&self) -> f32 {
        self.threshold1
    }

    /// Correction-suppression threshold.
    pub fn threshold2(&self) -> f32 {
        self.threshold2
    }

    /// Fraction of the window that must agree.
    pub fn match_fraction(&self) -> f32 {
        self.match_fraction
    }

    /// Damping applied to the consensus mean.
    pub fn reaction_speed(&self) -> f32 {
        self.reaction_speed
    }

    /// Auto-center stage, if enabled.
    pub fn auto_center(&self) -> Option<&AutoCenter> {
        self.auto_center.as_ref()
    }

    /// Current parameters as a configuration.
    pub fn config(&self) -> CleanerConfig {
        CleanerConfig {
            window_size: self.window.len(),
            threshold1: self.threshold1,
            threshold2: self.threshold2,
            match_fraction: self.match_fraction,
            reaction_speed: self.reaction_speed,
            auto_center: self
                .auto_center
                .as_ref()
                .map(|ac| AutoCenterConfig::new(ac.lead_in(), ac.range().max)),
        }
    }
}
