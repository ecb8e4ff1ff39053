//! Prelude for the points cleaner crate.
//!
//! # Example
//!
//! ```
//! use points_cleaner::prelude::*;
//!
//! let mut cleaner = PointsCleaner::new(4)?;
//! assert_eq!(cleaner.process_sample(0.5)?, Reading::Clean(0.5));
//! # Ok::<(), CleanerError>(())
//! ```

pub use crate::auto_center::AutoCenter;
pub use crate::cleaner::{Decision, PointsCleaner, Reading};
pub use crate::config::{AutoCenterConfig, CleanerConfig};
pub use crate::error::{CleanerError, CleanerResult};
