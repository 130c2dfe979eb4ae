use std::collections::TryReserveError;

use thiserror::Error;

/// Errors raised by [`TreeMap`](crate::TreeMap).
///
/// A missing key is not an error: lookups return `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeMapError {
    /// Node storage could not grow. The map is left as it was.
    #[error("node allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
    /// Every `u32` slot index is taken.
    #[error("node storage full at {slots} slots")]
    Full { slots: usize },
    /// The cursor names a node that has since been removed.
    ///
    /// Only the slot and its generation are checked. A cursor taken from a
    /// different map is caught only when that slot is vacant or at another
    /// generation here; otherwise it reads whatever entry this map keeps
    /// in the slot.
    #[error("stale cursor (slot {index}, generation {generation})")]
    StaleCursor { index: u32, generation: u32 },
    /// A structural check failed.
    #[error("tree invariant violated: {0}")]
    Invariant(String),
}
