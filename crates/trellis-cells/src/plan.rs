//! Boundary planning for appends.
//!
//! A plan names the cells holding the last element before the append
//! (`current`) and after it (`target`). When the target falls in a different
//! leaf or middle cell, that cell does not exist yet and the plan carries its
//! id as `leaf_next` / `middle_next`.
//!
//! Only the two endpoints are compared. An append that skips over a whole
//! empty leaf is not detected, so callers must keep batches well below one
//! leaf's capacity.

use serde::{Deserialize, Serialize};
use trellis_topology::{decompose, TreePosition};

use crate::error::Result;
use crate::identity::ListKey;
use crate::key::CellId;
use crate::path::CellPath;

/// Submission shape required by a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanShape {
    /// Appends into the current leaf only.
    Append,
    /// Creates the next leaf (and possibly the next middle) in the same
    /// mutation.
    Rollover,
}

/// Cells relevant to a pending mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPlan {
    pub root: CellId,
    pub middle_current: CellId,
    pub leaf_current: CellId,
    /// Present only when the append moves into a new middle cell.
    pub middle_next: Option<CellId>,
    /// Present only when the append moves into a new leaf cell.
    pub leaf_next: Option<CellId>,
    /// Slot of the last element before the append.
    pub current: TreePosition,
    /// Slot of the last element after the append.
    pub target: TreePosition,
}

impl CellPlan {
    pub fn shape(&self) -> PlanShape {
        if self.is_rollover() {
            PlanShape::Rollover
        } else {
            PlanShape::Append
        }
    }

    /// Whether new cells must be created alongside the append.
    pub fn is_rollover(&self) -> bool {
        self.leaf_next.is_some() || self.middle_next.is_some()
    }

    /// This plan with the next cells dropped, as used by plain appends.
    pub fn without_next(&self) -> Self {
        Self {
            middle_next: None,
            leaf_next: None,
            ..self.clone()
        }
    }

    /// Every cell the mutation touches, root first.
    pub fn cells(&self) -> Vec<CellId> {
        [
            Some(self.root),
            Some(self.middle_current),
            Some(self.leaf_current),
            self.middle_next,
            self.leaf_next,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Plan an append of `incoming` elements to a list currently holding
/// `current_total`.
///
/// Pure: performs no I/O. With `incoming == 0` the plan only names the
/// current cells, which is what initialization and reads use.
pub fn plan(list: &ListKey, current_total: u64, incoming: u64) -> Result<CellPlan> {
    let current = decompose(current_total)?;
    let target = decompose(current_total.saturating_add(incoming))?;

    let root = list.root_id();
    let middle_current = list.cell_id(&CellPath::middle_of(current));
    let leaf_current = list.cell_id(&CellPath::leaf_of(current));
    let middle_next = list.cell_id(&CellPath::middle_of(target));
    let leaf_next = list.cell_id(&CellPath::leaf_of(target));

    Ok(CellPlan {
        root,
        middle_current,
        leaf_current,
        middle_next: (middle_next != middle_current).then_some(middle_next),
        leaf_next: (leaf_next != leaf_current).then_some(leaf_next),
        current,
        target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{Authority, ListId};
    use crate::CellError;
    use trellis_topology::TopologyError;

    fn list() -> ListKey {
        ListKey::new(Authority::from_bytes([5; 32]), ListId::new("my_big_list").unwrap())
    }

    #[test]
    fn zero_growth_has_no_next_cells() {
        let p = plan(&list(), 0, 0).unwrap();
        assert_eq!(p.middle_next, None);
        assert_eq!(p.leaf_next, None);
        assert_eq!(p.shape(), PlanShape::Append);
        assert_eq!(p.leaf_current, list().cell_id(&CellPath::leaf(0, 0)));
    }

    #[test]
    fn growth_within_leaf_is_plain_append() {
        let p = plan(&list(), 28, 25).unwrap();
        assert!(!p.is_rollover());
        assert_eq!(p.cells().len(), 3);
    }

    #[test]
    fn filling_leaf_exactly_is_plain_append() {
        let p = plan(&list(), 231, 25).unwrap();
        assert_eq!(p.target, TreePosition::new(0, 0, 255));
        assert_eq!(p.shape(), PlanShape::Append);
    }

    #[test]
    fn ending_on_last_slot_is_plain_append() {
        // (0,0,253) -> (0,0,255): both ends in leaf (0,0).
        let p = plan(&list(), 254, 2).unwrap();
        assert_eq!(p.target, TreePosition::new(0, 0, 255));
        assert_eq!(p.leaf_next, None);
        assert_eq!(p.shape(), PlanShape::Append);
    }

    #[test]
    fn crossing_leaf_boundary_names_next_leaf() {
        let p = plan(&list(), 255, 2).unwrap();
        let next = p.leaf_next.expect("leaf_next");
        assert_ne!(next, p.leaf_current);
        assert_eq!(next, list().cell_id(&CellPath::leaf(0, 1)));
        assert_eq!(p.middle_next, None);
        assert_eq!(p.shape(), PlanShape::Rollover);
    }

    #[test]
    fn full_leaf_rolls_over_on_next_append() {
        let p = plan(&list(), 256, 25).unwrap();
        assert_eq!(p.current, TreePosition::new(0, 0, 255));
        assert_eq!(p.leaf_next, Some(list().cell_id(&CellPath::leaf(0, 1))));
    }

    #[test]
    fn crossing_middle_boundary_names_both() {
        let p = plan(&list(), 65_534, 4).unwrap();
        let middle_next = p.middle_next.expect("middle_next");
        let leaf_next = p.leaf_next.expect("leaf_next");
        assert_ne!(middle_next, p.middle_current);
        assert_ne!(leaf_next, p.leaf_current);
        assert_eq!(middle_next, list().cell_id(&CellPath::middle(1)));
        assert_eq!(leaf_next, list().cell_id(&CellPath::leaf(1, 0)));
        assert_eq!(p.cells().len(), 5);
    }

    #[test]
    fn without_next_drops_next_cells() {
        let p = plan(&list(), 65_534, 4).unwrap().without_next();
        assert!(!p.is_rollover());
        assert_eq!(p.target, TreePosition::new(1, 0, 1));
    }

    #[test]
    fn plan_beyond_capacity_fails() {
        assert!(matches!(
            plan(&list(), 16_777_200, 17),
            Err(CellError::Topology(TopologyError::OutOfCapacity { total: 16_777_217 }))
        ));
        assert!(plan(&list(), 16_777_200, 16).is_ok());
    }

    #[test]
    fn plan_is_pure() {
        assert_eq!(plan(&list(), 1000, 25).unwrap(), plan(&list(), 1000, 25).unwrap());
    }
}
