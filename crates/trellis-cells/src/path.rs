//! Cell paths.

use std::fmt;

use serde::{Deserialize, Serialize};
use trellis_topology::TreePosition;

use crate::cell::CellDepth;
use crate::error::{CellError, Result};

/// Position of a cell in the tree: zero, one or two segment indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellPath {
    /// The root cell, one per list.
    Root,
    /// Middle cell `j`.
    Middle(u8),
    /// Leaf cell `k` under middle cell `j`.
    Leaf(u8, u8),
}

impl CellPath {
    pub const fn root() -> Self {
        Self::Root
    }

    pub const fn middle(j: u8) -> Self {
        Self::Middle(j)
    }

    pub const fn leaf(j: u8, k: u8) -> Self {
        Self::Leaf(j, k)
    }

    /// Build a path from untyped segments, rejecting out-of-range values.
    pub fn from_segments(segments: &[u32]) -> Result<Self> {
        let mut typed = [0u8; 2];
        if segments.len() > typed.len() {
            return Err(CellError::PathTooDeep {
                depth: segments.len(),
            });
        }
        for (slot, &segment) in typed.iter_mut().zip(segments) {
            *slot = u8::try_from(segment).map_err(|_| CellError::InvalidPathSegment { segment })?;
        }
        Ok(match segments.len() {
            0 => Self::Root,
            1 => Self::Middle(typed[0]),
            _ => Self::Leaf(typed[0], typed[1]),
        })
    }

    /// The middle cell containing `pos`.
    pub const fn middle_of(pos: TreePosition) -> Self {
        Self::Middle(pos.root)
    }

    /// The leaf cell containing `pos`.
    pub const fn leaf_of(pos: TreePosition) -> Self {
        Self::Leaf(pos.root, pos.middle)
    }

    /// Segments in root-to-leaf order.
    pub fn segments(&self) -> Vec<u8> {
        match *self {
            Self::Root => vec![],
            Self::Middle(j) => vec![j],
            Self::Leaf(j, k) => vec![j, k],
        }
    }

    pub const fn depth(&self) -> CellDepth {
        match self {
            Self::Root => CellDepth::Root,
            Self::Middle(_) => CellDepth::Middle,
            Self::Leaf(..) => CellDepth::Leaf,
        }
    }

    /// Index of this cell within its parent (0 for the root).
    pub const fn index(&self) -> u8 {
        match *self {
            Self::Root => 0,
            Self::Middle(j) => j,
            Self::Leaf(_, k) => k,
        }
    }
}

impl fmt::Display for CellPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "[]"),
            Self::Middle(j) => write!(f, "[{}]", j),
            Self::Leaf(j, k) => write!(f, "[{},{}]", j, k),
        }
    }
}
