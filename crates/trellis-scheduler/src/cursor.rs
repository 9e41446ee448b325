//! Resumable batch walks over stored elements.
//!
//! A [`BatchCursor`] hands out the list's elements in fixed-size chunks,
//! remembering how far it got so a periodic job can process a growing list
//! without re-reading what it already consumed.

use serde::{Deserialize, Serialize};
use tracing::debug;
use trellis_cells::{Address, ListKey, TreePosition};
use trellis_topology::decompose;

use crate::backend::ListReader;
use crate::config::MAX_BATCH_SIZE;
use crate::error::{Error, Result};
use crate::read::read_range;

/// Progress state of a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorStatus {
    /// Nothing consumed yet.
    Ready,
    /// Chunks are being handed out.
    Processing,
    /// Caught up with the list; a later append makes it resume.
    Done,
}

/// Walks a list in chunks of at most `chunk_size` elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchCursor {
    list: ListKey,
    chunk_size: usize,
    status: CursorStatus,
    total_processed: u64,
    position: TreePosition,
}

impl BatchCursor {
    pub fn new(list: ListKey, chunk_size: usize) -> Result<Self> {
        Self::resume(list, chunk_size, 0)
    }

    /// Resume a walk that already processed `total_processed` elements.
    pub fn resume(list: ListKey, chunk_size: usize, total_processed: u64) -> Result<Self> {
        if chunk_size == 0 || chunk_size > MAX_BATCH_SIZE {
            return Err(Error::InvalidConfig(format!(
                "chunk_size {} must be in 1..={}",
                chunk_size, MAX_BATCH_SIZE
            )));
        }
        let position = decompose(total_processed).map_err(trellis_cells::CellError::from)?;
        let status = if total_processed == 0 {
            CursorStatus::Ready
        } else {
            CursorStatus::Processing
        };
        Ok(Self {
            list,
            chunk_size,
            status,
            total_processed,
            position,
        })
    }

    /// Fetch the next chunk, or `None` when caught up.
    pub async fn next_batch<R>(&mut self, reader: &R) -> Result<Option<Vec<Address>>>
    where
        R: ListReader + ?Sized,
    {
        let batch = read_range(reader, &self.list, self.total_processed, self.chunk_size as u64).await?;
        if batch.is_empty() {
            self.status = CursorStatus::Done;
            return Ok(None);
        }

        self.status = CursorStatus::Processing;
        self.total_processed += batch.len() as u64;
        self.position = decompose(self.total_processed).map_err(trellis_cells::CellError::from)?;
        debug!(list = %self.list, processed = self.total_processed, position = %self.position, "cursor advanced");
        Ok(Some(batch))
    }

    pub fn status(&self) -> CursorStatus {
        self.status
    }

    pub fn total_processed(&self) -> u64 {
        self.total_processed
    }

    /// Slot of the last processed element.
    pub fn position(&self) -> TreePosition {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BatchScheduler, MemoryBackend, SchedulerConfig};
    use trellis_cells::{Authority, ListId};

    fn list() -> ListKey {
        ListKey::new(Authority::from_bytes([8; 32]), ListId::new("walk").unwrap())
    }

    fn addresses(n: usize, offset: usize) -> Vec<Address> {
        (offset..offset + n)
            .map(|i| {
                let mut bytes = [0u8; 32];
                bytes[..8].copy_from_slice(&(i as u64).to_be_bytes());
                Address::from_bytes(bytes)
            })
            .collect()
    }

    #[tokio::test]
    async fn walks_in_chunks_and_resumes_after_growth() {
        let backend = MemoryBackend::new();
        let scheduler = BatchScheduler::new(&backend, &backend, SchedulerConfig::default()).unwrap();
        scheduler.initialize_list(&list()).await.unwrap();
        scheduler.append_many(&list(), &addresses(45, 0)).await.unwrap();

        let mut cursor = BatchCursor::new(list(), 20).unwrap();
        assert_eq!(cursor.status(), CursorStatus::Ready);

        let mut seen = Vec::new();
        while let Some(batch) = cursor.next_batch(&backend).await.unwrap() {
            seen.extend(batch);
        }
        assert_eq!(seen, addresses(45, 0));
        assert_eq!(cursor.status(), CursorStatus::Done);
        assert_eq!(cursor.position(), TreePosition::new(0, 0, 44));

        scheduler.append_many(&list(), &addresses(250, 45)).await.unwrap();
        let mut rest = Vec::new();
        while let Some(batch) = cursor.next_batch(&backend).await.unwrap() {
            rest.extend(batch);
        }
        assert_eq!(rest, addresses(250, 45));
        assert_eq!(cursor.total_processed(), 295);
        assert_eq!(cursor.position(), TreePosition::new(0, 1, 38));
    }

    #[test]
    fn rejects_bad_chunk_size() {
        assert!(BatchCursor::new(list(), 0).is_err());
        assert!(BatchCursor::new(list(), MAX_BATCH_SIZE + 1).is_err());
    }

    #[test]
    fn resume_restores_position() {
        let cursor = BatchCursor::resume(list(), 20, 257).unwrap();
        assert_eq!(cursor.status(), CursorStatus::Processing);
        assert_eq!(cursor.position(), TreePosition::new(0, 1, 0));
    }
}
