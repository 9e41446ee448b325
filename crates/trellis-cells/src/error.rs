//! Error types for trellis-cells.

use thiserror::Error;
use trellis_topology::TopologyError;

/// Result type for cell operations.
pub type Result<T> = std::result::Result<T, CellError>;

/// Errors that can occur while addressing, planning or mutating cells.
#[derive(Debug, Error)]
pub enum CellError {
    /// Path segment outside `0..=255`.
    #[error("path segment {segment} is out of range (max 255)")]
    InvalidPathSegment { segment: u32 },

    /// More than two path segments were supplied.
    #[error("path depth {depth} exceeds the leaf depth of 2")]
    PathTooDeep { depth: usize },

    /// List id is empty or too long to be used as a seed.
    #[error("invalid list id: {0}")]
    InvalidListId(String),

    /// A cell would hold more than 256 entries.
    #[error("cell holds {len} entries, appending {incoming} exceeds capacity")]
    CellOverflow { len: usize, incoming: usize },

    /// Cell bytes could not be encoded or decoded.
    #[error("cell encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    /// Count arithmetic failed.
    #[error(transparent)]
    Topology(#[from] TopologyError),
}
