//! Trellis Cells
//!
//! Content-addressed storage cells for three-level append-only lists.
//!
//! # Design
//!
//! A list is identified by an [`Authority`] and a [`ListId`]. Each of its
//! cells is named by a [`CellPath`] of zero, one or two segment indices, and
//! the cell's storage key is a 32-byte Blake3 derivation over
//! `(reversed path, list id, authority)`. Parents never store pointers to
//! children: given the list's element count, any client recomputes the
//! cells currently in play.
//!
//! # Planning
//!
//! [`plan`] compares the cells holding the last element before and after an
//! append. When the leaf (or middle) cell changes, the plan names the next
//! cell and the append must be submitted in the rollover shape, creating
//! that cell in the same mutation.

mod cell;
mod derive;
mod error;
mod identity;
mod key;
mod path;
mod plan;

pub use cell::{Cell, CellDepth, CELL_VERSION};
pub use derive::{derive_cell_id, derive_cell_id_from_segments};
pub use error::{CellError, Result};
pub use identity::{Address, Authority, ListId, ListKey, MAX_LIST_ID_LEN};
pub use key::CellId;
pub use path::CellPath;
pub use plan::{plan, CellPlan, PlanShape};

pub use trellis_topology::{TreePosition, CELL_CAPACITY, MAX_ELEMENTS};
