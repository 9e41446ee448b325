//! Error types for trellis-topology.

use thiserror::Error;

/// Result type for topology operations.
pub type Result<T> = std::result::Result<T, TopologyError>;

/// Errors raised by index arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// The count (or index) lies beyond the 256³ elements a list can hold.
    #[error("{total} elements exceed the list capacity of {max}", max = crate::MAX_ELEMENTS)]
    OutOfCapacity { total: u64 },
}
