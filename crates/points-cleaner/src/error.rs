//! Error types for the points cleaner.
//!
//! Configuration errors are reported when a parameter is set; sample errors
//! are reported by [`PointsCleaner::process_sample`](crate::PointsCleaner::process_sample)
//! before any filter state is touched.

use core::fmt;

/// Errors produced while configuring or driving a cleaner.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CleanerError {
    /// The delta window must hold at least one entry
    #[error("window size must be at least 1, got {0}")]
    InvalidWindowSize(usize),

    /// Parameter outside its accepted range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Parameter name
        field: &'static str,
        /// The rejected value
        value: String,
        /// Minimum accepted value
        min: String,
        /// Maximum accepted value
        max: String,
    },

    /// Parameter is NaN or infinite
    #[error("{field} must be finite")]
    NonFiniteParameter {
        /// Parameter name
        field: &'static str,
    },

    /// Sample is NaN or infinite and was not fed to the filter
    #[error("sample {0} is not finite")]
    NonFiniteSample(f32),

    /// Sample is finite but leaves the `f32` range once auto-centered
    #[error("sample {0} overflows after auto-centering")]
    CenteredOverflow(f32),
}

impl CleanerError {
    /// Create an out of range error for a numeric parameter.
    pub fn out_of_range<T: fmt::Debug>(field: &'static str, value: T, min: T, max: T) -> Self {
        CleanerError::OutOfRange {
            field,
            value: format!("{value:?}"),
            min: format!("{min:?}"),
            max: format!("{max:?}"),
        }
    }

    /// Whether the error concerns a single sample rather than configuration.
    ///
    /// Sample errors leave the cleaner untouched, so callers may skip the
    /// sample and keep going.
    pub fn is_sample_error(&self) -> bool {
        matches!(
            self,
            CleanerError::NonFiniteSample(_) | CleanerError::CenteredOverflow(_)
        )
    }
}

/// A specialized `Result` type for cleaner operations.
pub type CleanerResult<T> = Result<T, CleanerError>;

/// Ensure `value` is finite and within `[min, max]`.
pub(crate) fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> CleanerResult<()> {
    if !value.is_finite() {
        return Err(CleanerError::NonFiniteParameter { field });
    }
    if !(min..=max).contains(&value) {
        return Err(CleanerError::out_of_range(field, value, min, max));
    }
    Ok(())
}

/// Ensure `value` is finite and not negative.
pub(crate) fn check_non_negative(field: &'static str, value: f32) -> CleanerResult<()> {
    check_range(field, value, 0.0, f32::MAX)
}
