//! List identity types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CellError, Result};
use crate::key::CellId;
use crate::path::CellPath;

/// Longest list id accepted as a derivation seed.
pub const MAX_LIST_ID_LEN: usize = 32;

/// The writer identity that owns a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Authority(pub [u8; 32]);

impl Authority {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}...", &self.to_hex()[..8])
    }
}

/// A stored list element: 32 opaque address bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<CellId> for Address {
    fn from(id: CellId) -> Self {
        Self(id.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Validated list name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ListId(String);

impl ListId {
    /// Validate and wrap a list name.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(CellError::InvalidListId("list id is empty".to_string()));
        }
        if id.len() > MAX_LIST_ID_LEN {
            return Err(CellError::InvalidListId(format!(
                "{} bytes exceeds {} byte limit",
                id.len(),
                MAX_LIST_ID_LEN
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl TryFrom<String> for ListId {
    type Error = CellError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ListId> for String {
    fn from(value: ListId) -> Self {
        value.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A list's full identity: owning authority plus list name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListKey {
    pub authority: Authority,
    pub id: ListId,
}

impl ListKey {
    pub fn new(authority: Authority, id: ListId) -> Self {
        Self { authority, id }
    }

    /// Derive the id of the cell at `path`.
    pub fn cell_id(&self, path: &CellPath) -> CellId {
        crate::derive::derive_cell_id(&self.authority, &self.id, path)
    }

    /// Id of the root cell, which holds the authoritative element count.
    pub fn root_id(&self) -> CellId {
        self.cell_id(&CellPath::root())
    }
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.authority, self.id)
    }
}
