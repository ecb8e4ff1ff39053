//! Consensus-Gated Noise Filter for Scalar Sensor Signals
//!
//! This crate cleans a noisy, periodically sampled scalar signal (typically an
//! orientation angle in radians) one sample at a time. Each
//! [`PointsCleaner`] owns the state for exactly one signal channel.
//!
//! # Overview
//!
//! Every sample passes through up to three stages:
//! - **Auto-Center**: optional startup calibration that learns a zero offset
//!   and wraps output into a symmetric range
//! - **Threshold Gate**: jumps larger than `threshold1` are trusted and
//!   accepted immediately, without touching the window statistics
//! - **Consensus Smoother**: small deltas are recorded in a fixed circular
//!   window; the output moves only when enough of the window agrees in sign,
//!   and then by a damped share of the agreeing deltas' mean
//!
//! # RT Safety
//!
//! - The delta window is allocated once, at construction
//! - No heap allocations or I/O in [`PointsCleaner::process_sample`]
//! - Non-finite samples are rejected before they can reach the window
//!
//! # Example
//!
//! ```
//! use points_cleaner::prelude::*;
//!
//! let config = CleanerConfig::default()
//!     .with_window_size(5)
//!     .with_auto_center(2, std::f32::consts::PI);
//! let mut cleaner = PointsCleaner::from_config(&config)?;
//!
//! assert_eq!(cleaner.process_sample(0.8)?, Reading::Pending);
//! assert_eq!(cleaner.process_sample(0.8)?, Reading::Pending);
//! // Calibrating sample becomes the zero point
//! assert_eq!(cleaner.process_sample(0.8)?, Reading::Clean(0.0));
//! # Ok::<(), CleanerError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod auto_center;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod prelude;
pub mod window;

pub use auto_center::{AutoCenter, CenterPhase, SymmetricRange};
pub use cleaner::{Decision, PointsCleaner, Reading};
pub use config::{AutoCenterConfig, CleanerConfig};
pub use error::{CleanerError, CleanerResult};
pub use window::{Consensus, DeltaWindow};
