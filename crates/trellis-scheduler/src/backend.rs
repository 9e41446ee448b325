//! Contracts for the external store and transaction layer.
//!
//! The store owns cell contents and applies each mutation atomically. The
//! scheduler only decides which cells a mutation touches and in which shape.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use trellis_cells::{Address, Cell, CellId, CellPlan, ListKey};

use crate::error::Result;

/// Read access to list cells.
#[async_trait]
pub trait ListReader: Send + Sync {
    /// Authoritative element count held by the root cell.
    ///
    /// Fails with `NotFound` if the list was never initialized.
    async fn read_total_elements(&self, root: &CellId) -> Result<u32>;

    /// Fetch a cell by id.
    async fn read_cell(&self, id: &CellId) -> Result<Cell>;
}

/// Mutation submission for list cells.
#[async_trait]
pub trait ListSubmitter: Send + Sync {
    /// Create the root, middle and leaf cells of a new list.
    async fn initialize(&self, list: &ListKey, capacity_hint: usize, plan: &CellPlan) -> Result<Receipt>;

    /// Append to the current leaf and bump counts on the insertion path.
    ///
    /// `plan` carries no next cells. Fails if the leaf would overflow.
    async fn append(&self, list: &ListKey, elements: &[Address], plan: &CellPlan) -> Result<Receipt>;

    /// Append while creating the next leaf (and middle) named in `plan`.
    async fn append_with_rollover(
        &self,
        list: &ListKey,
        elements: &[Address],
        plan: &CellPlan,
    ) -> Result<Receipt>;
}

/// Success value of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Receipt {
    pub signature: String,
}

impl Receipt {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
        }
    }
}

impl From<SubmissionKey> for Receipt {
    fn from(key: SubmissionKey) -> Self {
        Self::new(key.to_hex())
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature)
    }
}

/// Idempotency key of a batch: Blake3 over `(list, current total, batch)`.
///
/// Two submissions with the same key are the same logical append, so a
/// retrying transaction layer can deduplicate on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionKey(pub [u8; 32]);

impl SubmissionKey {
    pub fn new(list: &ListKey, current_total: u32, elements: &[Address]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(list.authority.as_bytes());
        hasher.update(&(list.id.as_bytes().len() as u32).to_le_bytes());
        hasher.update(list.id.as_bytes());
        hasher.update(&current_total.to_le_bytes());
        hasher.update(&(elements.len() as u32).to_le_bytes());
        for element in elements {
            hasher.update(element.as_bytes());
        }
        Self(*hasher.finalize().as_bytes())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}
