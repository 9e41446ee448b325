//! In-memory list store.
//!
//! Holds bincode-encoded cells keyed by [`CellId`] and implements both
//! [`ListReader`] and [`ListSubmitter`]. Every mutation decodes the cells it
//! touches, validates against the store's own count, and only then writes
//! them back, all under one write lock.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, trace};
use trellis_cells::{plan, Address, Cell, CellDepth, CellId, CellPath, CellPlan, ListKey};

use crate::backend::{ListReader, ListSubmitter, Receipt, SubmissionKey};
use crate::error::{Error, Result};

#[derive(Debug, Default)]
struct Inner {
    /// Encoded cells.
    cells: HashMap<CellId, Vec<u8>>,
    /// Submissions received, successful or not.
    submissions: u64,
    /// Submission number that will be rejected.
    fail_at: Option<u64>,
    /// Reads and submissions fail while set.
    unavailable: bool,
}

impl Inner {
    fn load(&self, id: &CellId) -> Result<Cell> {
        let bytes = self
            .cells
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("cell {}", id)))?;
        Ok(Cell::decode(bytes)?)
    }

    fn store(&mut self, id: CellId, cell: &Cell) -> Result<()> {
        let bytes = cell.encode()?;
        self.cells.insert(id, bytes);
        Ok(())
    }

    /// Count a submission and apply any injected fault.
    fn admit(&mut self) -> Result<()> {
        if self.unavailable {
            return Err(Error::BackendUnavailable("store offline".to_string()));
        }
        self.submissions += 1;
        if self.fail_at == Some(self.submissions) {
            self.fail_at = None;
            return Err(Error::SubmissionFailed(format!(
                "injected failure on submission {}",
                self.submissions
            )));
        }
        Ok(())
    }

    /// Recompute the plan from the stored count and check it against the
    /// submitted one.
    fn expected_plan(&self, list: &ListKey, incoming: usize) -> Result<(u32, CellPlan)> {
        let root = self.load(&list.root_id())?;
        let expected = plan(list, root.total_elements as u64, incoming as u64)?;
        Ok((root.total_elements, expected))
    }
}

/// Reference implementation of the list store.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    inner: RwLock<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n`-th (1-based) following submission fail.
    pub async fn fail_submission(&self, n: u64) {
        let mut inner = self.inner.write().await;
        inner.fail_at = Some(inner.submissions + n);
    }

    /// Toggle simulated unavailability.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.inner.write().await.unavailable = unavailable;
    }

    /// Submissions received so far, including failed ones.
    pub async fn submission_count(&self) -> u64 {
        self.inner.read().await.submissions
    }

    /// Number of stored cells.
    pub async fn cell_count(&self) -> usize {
        self.inner.read().await.cells.len()
    }

    fn now_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}

#[async_trait]
impl ListReader for MemoryBackend {
    async fn read_total_elements(&self, root: &CellId) -> Result<u32> {
        let inner = self.inner.read().await;
        if inner.unavailable {
            return Err(Error::BackendUnavailable("store offline".to_string()));
        }
        let cell = inner.load(root)?;
        if cell.depth != CellDepth::Root {
            return Err(Error::NotFound(format!("{} is not a root cell", root)));
        }
        Ok(cell.total_elements)
    }

    async fn read_cell(&self, id: &CellId) -> Result<Cell> {
        let inner = self.inner.read().await;
        if inner.unavailable {
            return Err(Error::BackendUnavailable("store offline".to_string()));
        }
        inner.load(id)
    }
}

#[async_trait]
impl ListSubmitter for MemoryBackend {
    async fn initialize(&self, list: &ListKey, capacity_hint: usize, plan: &CellPlan) -> Result<Receipt> {
        let mut inner = self.inner.write().await;
        inner.admit()?;

        if inner.cells.contains_key(&plan.root) {
            return Err(Error::AlreadyInitialized(list.to_string()));
        }
        let expected = trellis_cells::plan(list, 0, 0)?;
        if &expected != plan {
            return Err(Error::StalePlan(format!("initialization plan for {} does not match", list)));
        }

        let now = Self::now_millis();
        let root = Cell::new(CellDepth::Root, 0, list.authority, now, Some(plan.middle_current.into()));
        let middle = Cell::new(CellDepth::Middle, 0, list.authority, now, Some(plan.leaf_current.into()));
        let leaf = Cell::new(CellDepth::Leaf, 0, list.authority, now, None);

        inner.store(plan.root, &root)?;
        inner.store(plan.middle_current, &middle)?;
        inner.store(plan.leaf_current, &leaf)?;

        debug!(list = %list, capacity_hint, "initialized list");
        Ok(SubmissionKey::new(list, 0, &[]).into())
    }

    async fn append(&self, list: &ListKey, elements: &[Address], plan: &CellPlan) -> Result<Receipt> {
        let mut inner = self.inner.write().await;
        inner.admit()?;

        let (total, expected) = inner.expected_plan(list, elements.len())?;
        if expected.is_rollover() {
            return Err(Error::StalePlan(format!(
                "appending {} to {} requires a rollover",
                elements.len(),
                total
            )));
        }
        if expected != plan.without_next() {
            return Err(Error::StalePlan(format!("plan does not match count {}", total)));
        }

        let mut root = inner.load(&plan.root)?;
        let mut middle = inner.load(&plan.middle_current)?;
        let mut leaf = inner.load(&plan.leaf_current)?;

        leaf.push_entries(elements)?;
        let added = elements.len() as u32;
        root.total_elements += added;
        middle.total_elements += added;
        leaf.total_elements += added;

        inner.store(plan.root, &root)?;
        inner.store(plan.middle_current, &middle)?;
        inner.store(plan.leaf_current, &leaf)?;

        trace!(list = %list, total = root.total_elements, "plain append");
        Ok(SubmissionKey::new(list, total, elements).into())
    }

    async fn append_with_rollover(
        &self,
        list: &ListKey,
        elements: &[Address],
        plan: &CellPlan,
    ) -> Result<Receipt> {
        let mut inner = self.inner.write().await;
        inner.admit()?;

        let (total, expected) = inner.expected_plan(list, elements.len())?;
        if &expected != plan {
            return Err(Error::StalePlan(format!("plan does not match count {}", total)));
        }
        let leaf_next_id = plan
            .leaf_next
            .ok_or_else(|| Error::StalePlan("rollover plan names no next leaf".to_string()))?;
        if inner.cells.contains_key(&leaf_next_id) {
            return Err(Error::StalePlan(format!("next leaf {} already exists", leaf_next_id)));
        }

        let mut root = inner.load(&plan.root)?;
        let mut middle = inner.load(&plan.middle_current)?;
        let mut leaf = inner.load(&plan.leaf_current)?;

        let split = leaf.remaining().min(elements.len());
        let (head, tail) = elements.split_at(split);
        let now = Self::now_millis();

        leaf.push_entries(head)?;
        leaf.total_elements += head.len() as u32;
        root.total_elements += elements.len() as u32;

        let leaf_path = CellPath::leaf_of(plan.target);
        let mut leaf_next = Cell::new(CellDepth::Leaf, leaf_path.index(), list.authority, now, None);
        leaf_next.push_entries(tail)?;
        leaf_next.total_elements = tail.len() as u32;

        let middle_next = match plan.middle_next {
            Some(middle_next_id) => {
                if inner.cells.contains_key(&middle_next_id) {
                    return Err(Error::StalePlan(format!(
                        "next middle {} already exists",
                        middle_next_id
                    )));
                }
                middle.total_elements += head.len() as u32;
                let mut cell = Cell::new(
                    CellDepth::Middle,
                    CellPath::middle_of(plan.target).index(),
                    list.authority,
                    now,
                    Some(leaf_next_id.into()),
                );
                cell.total_elements = tail.len() as u32;
                root.push_entries(&[middle_next_id.into()])?;
                Some((middle_next_id, cell))
            }
            None => {
                middle.total_elements += elements.len() as u32;
                middle.push_entries(&[leaf_next_id.into()])?;
                None
            }
        };

        inner.store(plan.root, &root)?;
        inner.store(plan.middle_current, &middle)?;
        inner.store(plan.leaf_current, &leaf)?;
        inner.store(leaf_next_id, &leaf_next)?;
        if let Some((id, cell)) = middle_next {
            inner.store(id, &cell)?;
        }

        debug!(
            list = %list,
            total = root.total_elements,
            leaf = %leaf_path,
            new_middle = plan.middle_next.is_some(),
            "rollover append"
        );
        Ok(SubmissionKey::new(list, total, elements).into())
    }
}
