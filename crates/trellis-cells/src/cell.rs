//! Cell state.

use serde::{Deserialize, Serialize};
use trellis_topology::CELL_CAPACITY;

use crate::error::{CellError, Result};
use crate::identity::{Address, Authority};

/// Current cell layout version.
pub const CELL_VERSION: u8 = 0;

/// Tree depth of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellDepth {
    Root,
    Middle,
    Leaf,
}

impl CellDepth {
    pub const fn as_u8(&self) -> u8 {
        match self {
            Self::Root => 0,
            Self::Middle => 1,
            Self::Leaf => 2,
        }
    }
}

/// One storage cell.
///
/// Root entries are the ids of occupied middle cells, middle entries the ids
/// of occupied leaf cells, and leaf entries the stored elements.
/// `total_elements` counts every element below the cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub version: u8,
    pub depth: CellDepth,
    /// Index within the parent cell.
    pub index: u8,
    pub authority: Authority,
    pub total_elements: u32,
    pub entries: Vec<Address>,
    /// Unix timestamp in milliseconds.
    pub created_at: u64,
}

impl Cell {
    /// Encoded size of a cell with no entries: version (1), depth tag (4),
    /// index (1), authority (32), total_elements (4), entries length
    /// prefix (8), created_at (8).
    pub const HEADER_LEN: usize = 1 + 4 + 1 + 32 + 4 + 8 + 8;

    /// Storage footprint of a cell holding `items` entries.
    pub const fn encoded_size(items: usize) -> usize {
        Self::HEADER_LEN + items * 32
    }

    /// Create an empty cell, optionally seeded with its first entry.
    pub fn new(
        depth: CellDepth,
        index: u8,
        authority: Authority,
        created_at: u64,
        first_entry: Option<Address>,
    ) -> Self {
        Self {
            version: CELL_VERSION,
            depth,
            index,
            authority,
            total_elements: 0,
            entries: first_entry.into_iter().collect(),
            created_at,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that can still be pushed.
    pub fn remaining(&self) -> usize {
        (CELL_CAPACITY as usize).saturating_sub(self.entries.len())
    }

    pub fn is_full(&self) -> bool {
        self.remaining() == 0
    }

    /// Append entries, failing without modification if capacity would be
    /// exceeded.
    pub fn push_entries(&mut self, entries: &[Address]) -> Result<()> {
        if entries.len() > self.remaining() {
            return Err(CellError::CellOverflow {
                len: self.entries.len(),
                incoming: entries.len(),
            });
        }
        self.entries.extend_from_slice(entries);
        Ok(())
    }

    /// Encode to bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
