//! Trellis List Topology
//!
//! Index arithmetic for an append-only list stored as a three-level tree of
//! fixed-capacity cells.
//!
//! # Shape
//!
//! Every cell holds at most [`CELL_CAPACITY`] entries:
//! - 1 root cell, whose entries are the occupied middle cells
//! - up to 256 middle cells, whose entries are the occupied leaf cells
//! - up to 256 leaf cells per middle cell, holding the stored elements
//!
//! A list therefore holds at most [`MAX_ELEMENTS`] = 256³ elements.
//!
//! # Positions
//!
//! A [`TreePosition`] is the `(root, middle, leaf)` index triple of one
//! element slot. [`decompose`] maps an element count to the slot of the most
//! recently inserted element; [`locate`] maps a zero-based element index to
//! its slot. No directory is consulted: positions are pure arithmetic.

mod error;
mod position;

pub use error::{Result, TopologyError};
pub use position::{decompose, insertion_point, leaf_remaining, locate, TreePosition};

/// Maximum number of entries held by any single cell.
pub const CELL_CAPACITY: u32 = 256;

/// Number of elements spanned by one middle cell (256 leaves of 256).
pub const MIDDLE_SPAN: u32 = CELL_CAPACITY * CELL_CAPACITY;

/// Largest representable element count.
pub const MAX_ELEMENTS: u32 = MIDDLE_SPAN * CELL_CAPACITY;

// Capacity must fit the u8 segment indices used by cell paths
const _: () = assert!(CELL_CAPACITY - 1 == u8::MAX as u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_invariant() {
        assert_eq!(MIDDLE_SPAN, 65_536);
        assert_eq!(MAX_ELEMENTS, 16_777_216);
    }
}
