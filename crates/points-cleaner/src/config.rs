//! Cleaner configuration
//!
//! Serializable parameter set for a [`PointsCleaner`](crate::PointsCleaner).
//! Missing fields in a JSON/YAML document fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::error::{CleanerError, CleanerResult, check_non_negative, check_range};

/// Default gate threshold in radians.
pub const DEFAULT_THRESHOLD1: f32 = 0.15;
/// Default correction-suppression threshold in radians.
pub const DEFAULT_THRESHOLD2: f32 = 0.17;
/// Default fraction of window deltas that must agree in sign.
pub const DEFAULT_MATCH_FRACTION: f32 = 0.98;
/// Default damping applied to the consensus average.
pub const DEFAULT_REACTION_SPEED: f32 = 0.2;
/// Default delta window length.
pub const DEFAULT_WINDOW_SIZE: usize = 10;
/// Default number of samples discarded before auto-center calibration.
pub const DEFAULT_LEAD_IN: u32 = 3;
/// Default auto-center half range.
pub const DEFAULT_HALF_RANGE: f32 = 1.0;

/// Auto-center parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutoCenterConfig {
    /// Samples to discard before the calibrating sample
    pub lead_in: u32,
    /// Half of the symmetric output range; output wraps into `[-half_range, half_range)`
    pub half_range: f32,
}

impl Default for AutoCenterConfig {
    fn default() -> Self {
        Self {
            lead_in: DEFAULT_LEAD_IN,
            half_range: DEFAULT_HALF_RANGE,
        }
    }
}

impl AutoCenterConfig {
    /// Create an auto-center configuration.
    pub fn new(lead_in: u32, half_range: f32) -> Self {
        Self {
            lead_in,
            half_range,
        }
    }

    /// Validate the half range.
    ///
    /// # Errors
    ///
    /// Returns an error if `half_range` is not finite or not positive.
    pub fn validate(&self) -> CleanerResult<()> {
        check_range("half_range", self.half_range, f32::MIN_POSITIVE, f32::MAX / 2.0)
    }
}

/// Complete cleaner configuration.
///
/// # Example
///
/// ```
/// use points_cleaner::CleanerConfig;
///
/// let config = CleanerConfig::default()
///     .with_window_size(5)
///     .with_match_fraction(0.6);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanerConfig {
    /// Delta window length
    pub window_size: usize,
    /// Deltas larger than this (radians) pass straight through
    pub threshold1: f32,
    /// Corrections no larger than this (radians) are dropped
    pub threshold2: f32,
    /// Fraction of the window that must agree with the current delta's sign
    pub match_fraction: f32,
    /// Share of the agreeing deltas' mean that is applied
    pub reaction_speed: f32,
    /// Startup auto-centering, disabled when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_center: Option<AutoCenterConfig>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            threshold1: DEFAULT_THRESHOLD1,
            threshold2: DEFAULT_THRESHOLD2,
            match_fraction: DEFAULT_MATCH_FRACTION,
            reaction_speed: DEFAULT_REACTION_SPEED,
            auto_center: None,
        }
    }
}

impl CleanerConfig {
    /// Set the window length.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set both thresholds.
    pub fn with_thresholds(mut self, threshold1: f32, threshold2: f32) -> Self {
        self.threshold1 = threshold1;
        self.threshold2 = threshold2;
        self
    }

    /// Set the match fraction.
    pub fn with_match_fraction(mut self, match_fraction: f32) -> Self {
        self.match_fraction = match_fraction;
        self
    }

    /// Set the reaction speed.
    pub fn with_reaction_speed(mut self, reaction_speed: f32) -> Self {
        self.reaction_speed = reaction_speed;
        self
    }

    /// Enable auto-centering.
    pub fn with_auto_center(mut self, lead_in: u32, half_range: f32) -> Self {
        self.auto_center = Some(AutoCenterConfig::new(lead_in, half_range));
        self
    }

    /// Check every parameter.
    ///
    /// # Errors
    ///
    /// Returns the first violation found:
    /// - `window_size` is zero
    /// - a threshold is negative or not finite
    /// - `match_fraction` or `reaction_speed` is outside `[0, 1]`
    /// - the auto-center half range is not positive
    pub fn validate(&self) -> CleanerResult<()> {
        if self.window_size == 0 {
            return Err(CleanerError::InvalidWindowSize(self.window_size));
        }
        check_non_negative("threshold1", self.threshold1)?;
        check_non_negative("threshold2", self.threshold2)?;
        check_range("match_fraction", self.match_fraction, 0.0, 1.0)?;
        check_range("reaction_speed", self.reaction_speed, 0.0, 1.0)?;
        if let Some(auto_center) = &self.auto_center {
            auto_center.validate()?;
        }
        Ok(())
    }
}
