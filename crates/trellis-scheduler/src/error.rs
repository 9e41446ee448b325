//! Error types for trellis-scheduler.

use thiserror::Error;
use trellis_cells::CellError;

use crate::scheduler::BatchOutcome;

/// Result type for scheduler and backend operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading, planning or submitting.
#[derive(Debug, Error)]
pub enum Error {
    /// The list (or one of its cells) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The list's root cell already exists.
    #[error("list already initialized: {0}")]
    AlreadyInitialized(String),

    /// The backend could not be reached.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The transaction layer rejected or lost a submission.
    #[error("submission failed: {0}")]
    SubmissionFailed(String),

    /// The submitted plan does not match the backend's current count.
    #[error("stale plan: {0}")]
    StalePlan(String),

    /// A cancellation signal stopped the run between batches.
    #[error("cancelled before batch {next_batch}")]
    Cancelled { next_batch: usize },

    /// Invalid scheduler configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Addressing, planning or cell mutation error.
    #[error(transparent)]
    Cell(#[from] CellError),
}

impl Error {
    /// Whether a retry of the same batch could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::BackendUnavailable(_) | Error::SubmissionFailed(_) | Error::StalePlan(_)
        )
    }
}

/// A multi-batch append that stopped before its last batch.
///
/// Batches in `completed` were applied by the backend; nothing from
/// `failed_batch` onwards was.
#[derive(Debug, Error)]
#[error(
    "append halted at batch {failed_batch} after {} completed: {source}",
    .completed.len()
)]
pub struct AppendHalted {
    pub completed: Vec<BatchOutcome>,
    pub failed_batch: usize,
    pub source: Error,
}
