//! Sequential batch scheduling.
//!
//! A large append is split into fixed-size batches submitted strictly one at
//! a time. Before each batch the element count is re-read from the store,
//! because the plan for batch `i + 1` depends on batch `i` having landed.
//! Two batches of the same list must never be in flight together: both
//! would plan the same next leaf.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use trellis_cells::{plan, Address, Cell, ListKey, PlanShape};

use crate::backend::{ListReader, ListSubmitter, Receipt};
use crate::config::SchedulerConfig;
use crate::error::{AppendHalted, Error, Result};

/// Result of one applied batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Zero-based batch number within the run.
    pub batch: usize,
    /// Offsets of the batch's elements in the caller's input.
    pub range: Range<usize>,
    pub shape: PlanShape,
    pub receipt: Receipt,
    /// Element count of the list once the batch landed.
    pub total_after: u32,
}

/// Submits appends to one store in capacity-bounded batches.
pub struct BatchScheduler<'a, R: ?Sized, S: ?Sized> {
    reader: &'a R,
    submitter: &'a S,
    config: SchedulerConfig,
}

impl<'a, R, S> BatchScheduler<'a, R, S>
where
    R: ListReader + ?Sized,
    S: ListSubmitter + ?Sized,
{
    /// Create a scheduler, validating the configuration.
    pub fn new(reader: &'a R, submitter: &'a S, config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            reader,
            submitter,
            config,
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Create the root, middle and leaf cells of a new list.
    pub async fn initialize_list(&self, list: &ListKey) -> Result<Receipt> {
        let initial = plan(list, 0, 0)?;
        match self.reader.read_total_elements(&initial.root).await {
            Ok(_) => return Err(Error::AlreadyInitialized(list.to_string())),
            Err(Error::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let receipt = self
            .submitter
            .initialize(list, Cell::encoded_size(1), &initial)
            .await?;
        info!(list = %list, root = %initial.root, "list initialized");
        Ok(receipt)
    }

    /// Append `elements` in order, one batch at a time.
    ///
    /// Stops at the first failed batch; the error carries the outcomes of
    /// every batch applied before it.
    pub async fn append_many(
        &self,
        list: &ListKey,
        elements: &[Address],
    ) -> std::result::Result<Vec<BatchOutcome>, AppendHalted> {
        self.run(list, elements, None).await
    }

    /// Like [`append_many`](Self::append_many), checking `cancel` between
    /// batches. Batches already submitted are not rolled back.
    pub async fn append_many_until(
        &self,
        list: &ListKey,
        elements: &[Address],
        cancel: &watch::Receiver<bool>,
    ) -> std::result::Result<Vec<BatchOutcome>, AppendHalted> {
        self.run(list, elements, Some(cancel)).await
    }

    async fn run(
        &self,
        list: &ListKey,
        elements: &[Address],
        cancel: Option<&watch::Receiver<bool>>,
    ) -> std::result::Result<Vec<BatchOutcome>, AppendHalted> {
        let batch_size = self.config.batch_size;
        let mut completed = Vec::with_capacity(elements.len().div_ceil(batch_size));

        for (batch, chunk) in elements.chunks(batch_size).enumerate() {
            if cancel.is_some_and(|rx| *rx.borrow()) {
                warn!(list = %list, batch, "append cancelled");
                return Err(AppendHalted {
                    completed,
                    failed_batch: batch,
                    source: Error::Cancelled { next_batch: batch },
                });
            }

            let start = batch * batch_size;
            match self.submit_batch(list, chunk).await {
                Ok((shape, receipt, total_after)) => completed.push(BatchOutcome {
                    batch,
                    range: start..start + chunk.len(),
                    shape,
                    receipt,
                    total_after,
                }),
                Err(source) => {
                    warn!(list = %list, batch, error = %source, "batch failed, halting");
                    return Err(AppendHalted {
                        completed,
                        failed_batch: batch,
                        source,
                    });
                }
            }
        }

        info!(list = %list, batches = completed.len(), elements = elements.len(), "append complete");
        Ok(completed)
    }

    async fn submit_batch(&self, list: &ListKey, chunk: &[Address]) -> Result<(PlanShape, Receipt, u32)> {
        let current_total = self.reader.read_total_elements(&list.root_id()).await?;
        let cells = plan(list, current_total as u64, chunk.len() as u64)?;
        let shape = cells.shape();

        debug!(
            list = %list,
            total = current_total,
            len = chunk.len(),
            ?shape,
            leaf = %cells.leaf_current,
            "submitting batch"
        );

        let receipt = match shape {
            PlanShape::Rollover => self.submitter.append_with_rollover(list, chunk, &cells).await?,
            PlanShape::Append => self.submitter.append(list, chunk, &cells.without_next()).await?,
        };
        Ok((shape, receipt, current_total + chunk.len() as u32))
    }
}
