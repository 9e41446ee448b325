//! Tree positions and count decomposition.
//!
//! Counts are taken as `u64` so that `current + incoming` never wraps before
//! it can be checked against [`MAX_ELEMENTS`].

use std::fmt;

use crate::error::{Result, TopologyError};
use crate::{CELL_CAPACITY, MAX_ELEMENTS, MIDDLE_SPAN};

/// The `(root, middle, leaf)` index triple of one element slot.
///
/// Ordering is lexicographic, which matches insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreePosition {
    /// Index of the middle cell within the root cell.
    pub root: u8,
    /// Index of the leaf cell within its middle cell.
    pub middle: u8,
    /// Index of the element within its leaf cell.
    pub leaf: u8,
}

impl TreePosition {
    /// The first slot of the list.
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    /// Create from raw indices.
    #[inline]
    pub const fn new(root: u8, middle: u8, leaf: u8) -> Self {
        Self { root, middle, leaf }
    }

    /// As a tuple, `(root, middle, leaf)`.
    #[inline]
    pub const fn as_tuple(&self) -> (u8, u8, u8) {
        (self.root, self.middle, self.leaf)
    }

    /// Zero-based element index of this slot.
    #[inline]
    pub const fn element_index(&self) -> u32 {
        self.root as u32 * MIDDLE_SPAN + self.middle as u32 * CELL_CAPACITY + self.leaf as u32
    }

    /// Whether both positions live in the same leaf cell.
    #[inline]
    pub const fn same_leaf(&self, other: &Self) -> bool {
        self.root == other.root && self.middle == other.middle
    }
}

impl fmt::Display for TreePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.root, self.middle, self.leaf)
    }
}

impl From<TreePosition> for (u8, u8, u8) {
    fn from(value: TreePosition) -> Self {
        value.as_tuple()
    }
}

/// Decompose an element count into the slot of the most recently inserted
/// element.
///
/// `decompose(k)` points at element index `k - 1`, not at the next free
/// slot. An empty list decomposes to the origin.
///
/// # Examples
///
/// ```
/// use trellis_topology::{decompose, TreePosition};
///
/// assert_eq!(decompose(0).unwrap(), TreePosition::new(0, 0, 0));
/// assert_eq!(decompose(256).unwrap(), TreePosition::new(0, 0, 255));
/// assert_eq!(decompose(257).unwrap(), TreePosition::new(0, 1, 0));
/// assert!(decompose(16_777_217).is_err());
/// ```
pub fn decompose(total: u64) -> Result<TreePosition> {
    if total == 0 {
        return Ok(TreePosition::ORIGIN);
    }
    if total > MAX_ELEMENTS as u64 {
        return Err(TopologyError::OutOfCapacity { total });
    }

    let n = (total - 1) as u32;
    Ok(TreePosition::new(
        (n / MIDDLE_SPAN) as u8,
        ((n % MIDDLE_SPAN) / CELL_CAPACITY) as u8,
        (n % CELL_CAPACITY) as u8,
    ))
}

/// Slot of the zero-based element `index`.
pub fn locate(index: u64) -> Result<TreePosition> {
    if index >= MAX_ELEMENTS as u64 {
        return Err(TopologyError::OutOfCapacity {
            total: index.saturating_add(1),
        });
    }
    decompose(index + 1)
}

/// Slot the next appended element would occupy in a list of `total`.
pub fn insertion_point(total: u64) -> Result<TreePosition> {
    locate(total)
}

/// Free entries left in the leaf holding the last element of a list of
/// `total`. An empty list reports a whole empty leaf.
pub fn leaf_remaining(total: u64) -> Result<u32> {
    if total == 0 {
        return Ok(CELL_CAPACITY);
    }
    let last = decompose(total)?;
    Ok(CELL_CAPACITY - 1 - last.leaf as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decompose_known_counts() {
        let cases = [
            (0, (0, 0, 0)),
            (1, (0, 0, 0)),
            (255, (0, 0, 254)),
            (256, (0, 0, 255)),
            (257, (0, 1, 0)),
            (10_000, (0, 39, 15)),
            (65_536, (0, 255, 255)),
            (65_537, (1, 0, 0)),
            (16_777_216, (255, 255, 255)),
        ];

        for (total, expected) in cases {
            assert_eq!(
                decompose(total).unwrap().as_tuple(),
                expected,
                "decompose({}) should be {:?}",
                total,
                expected
            );
        }
    }

    #[test]
    fn decompose_rejects_overflow() {
        assert_eq!(
            decompose(16_777_217),
            Err(TopologyError::OutOfCapacity { total: 16_777_217 })
        );
        assert!(decompose(u64::MAX).is_err());
    }

    #[test]
    fn locate_is_zero_based() {
        assert_eq!(locate(0).unwrap(), TreePosition::ORIGIN);
        assert_eq!(locate(255).unwrap(), TreePosition::new(0, 0, 255));
        assert_eq!(locate(256).unwrap(), TreePosition::new(0, 1, 0));
        assert!(locate(MAX_ELEMENTS as u64).is_err());
    }

    #[test]
    fn locate_rejects_largest_index() {
        assert_eq!(
            locate(u64::MAX),
            Err(TopologyError::OutOfCapacity { total: u64::MAX })
        );
        assert!(insertion_point(u64::MAX).is_err());
    }

    #[test]
    fn insertion_point_follows_last_slot() {
        assert_eq!(insertion_point(0).unwrap(), TreePosition::ORIGIN);
        assert_eq!(insertion_point(256).unwrap(), TreePosition::new(0, 1, 0));
        assert!(insertion_point(MAX_ELEMENTS as u64).is_err());
    }

    #[test]
    fn leaf_remaining_counts_free_entries() {
        assert_eq!(leaf_remaining(0).unwrap(), 256);
        assert_eq!(leaf_remaining(1).unwrap(), 255);
        assert_eq!(leaf_remaining(254).unwrap(), 2);
        assert_eq!(leaf_remaining(256).unwrap(), 0);
        assert_eq!(leaf_remaining(257).unwrap(), 255);
    }

    #[test]
    fn same_leaf_ignores_leaf_index() {
        let a = TreePosition::new(0, 3, 1);
        assert!(a.same_leaf(&TreePosition::new(0, 3, 200)));
        assert!(!a.same_leaf(&TreePosition::new(0, 4, 1)));
        assert!(!a.same_leaf(&TreePosition::new(1, 3, 1)));
    }

    proptest! {
        #[test]
        fn decompose_matches_element_index(total in 1u64..=MAX_ELEMENTS as u64) {
            let pos = decompose(total).unwrap();
            prop_assert_eq!(pos.element_index() as u64, total - 1);
        }

        #[test]
        fn decompose_is_monotonic(total in 0u64..MAX_ELEMENTS as u64) {
            let here = decompose(total).unwrap();
            let next = decompose(total + 1).unwrap();
            prop_assert!(next >= here);
        }

        #[test]
        fn locate_inverts_element_index(index in 0u64..MAX_ELEMENTS as u64) {
            prop_assert_eq!(locate(index).unwrap().element_index() as u64, index);
        }
    }
}
