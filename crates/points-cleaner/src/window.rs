//! Circular Delta Window
//!
//! Fixed-capacity ring of the most recent accepted-range deltas, used by the
//! consensus smoother to vote on the direction of change.

use crate::error::{CleanerError, CleanerResult};

/// Fixed-size circular buffer of recent deltas.
///
/// The buffer is allocated once at construction and never grows. Every slot
/// starts at zero; unwritten slots count as non-positive deltas in votes
/// until they are overwritten.
///
/// # RT Safety
///
/// - No heap allocations after construction
/// - O(n) in the window length for [`consensus`](Self::consensus), O(1) otherwise
#[derive(Clone, Debug)]
pub struct DeltaWindow {
    slots: Box<[f32]>,
    cursor: usize,
}

/// Result of a polarity vote over the window.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Consensus {
    /// Entries whose polarity matches the probe delta
    pub matches: usize,
    /// Sum of the matching entries
    pub sum: f32,
}

impl Consensus {
    /// Mean of the matching entries, or 0.0 when nothing matched.
    pub fn average(&self) -> f32 {
        if self.matches == 0 {
            return 0.0;
        }
        self.sum / self.matches as f32
    }
}

/// Strict positive test; zero counts as non-positive.
#[inline]
fn is_positive(value: f32) -> bool {
    value > 0.0
}

impl DeltaWindow {
    /// Create a zero-filled window with `len` slots.
    ///
    /// # Errors
    ///
    /// Returns [`CleanerError::InvalidWindowSize`] when `len` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use points_cleaner::DeltaWindow;
    ///
    /// let window = DeltaWindow::new(4)?;
    /// assert_eq!(window.len(), 4);
    /// assert!(window.as_slice().iter().all(|d| *d == 0.0));
    /// # Ok::<(), points_cleaner::CleanerError>(())
    /// ```
    pub fn new(len: usize) -> CleanerResult<Self> {
        if len == 0 {
            return Err(CleanerError::InvalidWindowSize(len));
        }
        Ok(Self {
            slots: vec![0.0; len].into_boxed_slice(),
            cursor: 0,
        })
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the window has no slots.
    ///
    /// Pairs with [`len`](Self::len); [`DeltaWindow::new`] rejects zero-length
    /// windows, so this is false for any constructed window.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Index of the most recently written slot (0 before the first push).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Advance the cursor and overwrite the slot under it, evicting the oldest delta.
    #[inline]
    pub fn push(&mut self, delta: f32) {
        self.cursor = (self.cursor + 1) % self.slots.len();
        if let Some(slot) = self.slots.get_mut(self.cursor) {
            *slot = delta;
        }
    }

    /// Vote over every slot for entries sharing the polarity of `delta`.
    #[inline]
    pub fn consensus(&self, delta: f32) -> Consensus {
        let polarity = is_positive(delta);
        self.slots
            .iter()
            .filter(|entry| is_positive(**entry) == polarity)
            .fold(Consensus { matches: 0, sum: 0.0 }, |acc, entry| Consensus {
                matches: acc.matches + 1,
                sum: acc.sum + entry,
            })
    }

    /// Zero every slot and rewind the cursor.
    pub fn clear(&mut self) {
        self.slots.fill(0.0);
        self.cursor = 0;
    }

    /// Read-only view of the slots in storage order.
    pub fn as_slice(&self) -> &[f32] {
        &self.slots
    }
}
