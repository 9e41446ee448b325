//! Trellis Scheduler - sequential batch appends over an external store
//!
//! This crate drives appends to a Trellis list through two external
//! collaborators:
//!
//! - a [`ListReader`], the store holding the authoritative element count in
//!   the list's root cell
//! - a [`ListSubmitter`], the transaction layer applying one mutation per
//!   submission, either a plain append or a rollover that creates the next
//!   leaf (and middle) cell
//!
//! # Ordering
//!
//! Batches of one list are submitted strictly in sequence. The count is
//! re-read before every batch and the plan is recomputed from it, so a
//! partial failure never leaves the scheduler working from a stale count.
//! Different lists share nothing and may be driven concurrently.
//!
//! # Example
//!
//! ```no_run
//! use trellis_cells::{Address, Authority, ListId, ListKey};
//! use trellis_scheduler::{BatchScheduler, MemoryBackend, SchedulerConfig};
//!
//! async fn run() -> trellis_scheduler::Result<()> {
//!     let list = ListKey::new(Authority::from_bytes([1; 32]), ListId::new("my_list")?);
//!     let addresses = vec![Address::from_bytes([2; 32]); 100];
//!
//!     let store = MemoryBackend::new();
//!     let scheduler = BatchScheduler::new(&store, &store, SchedulerConfig::default())?;
//!     scheduler.initialize_list(&list).await?;
//!
//!     match scheduler.append_many(&list, &addresses).await {
//!         Ok(outcomes) => println!("{} batches applied", outcomes.len()),
//!         Err(halted) => eprintln!("stopped at batch {}: {}", halted.failed_batch, halted.source),
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod cursor;
pub mod error;
pub mod memory;
pub mod read;
pub mod scheduler;

pub use backend::{ListReader, ListSubmitter, Receipt, SubmissionKey};
pub use config::{SchedulerConfig, DEFAULT_BATCH_SIZE, MAX_BATCH_SIZE};
pub use cursor::{BatchCursor, CursorStatus};
pub use error::{AppendHalted, Error, Result};
pub use memory::MemoryBackend;
pub use read::{read_element, read_range};
pub use scheduler::{BatchOutcome, BatchScheduler};
