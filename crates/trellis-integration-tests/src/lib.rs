//! Shared fixtures for Trellis end-to-end tests.

use trellis_cells::{Address, Authority, ListId, ListKey};
use trellis_scheduler::{BatchScheduler, MemoryBackend, SchedulerConfig};

/// A list owned by a fixed test authority.
pub fn list(name: &str) -> ListKey {
    ListKey::new(
        Authority::from_bytes([0x11; 32]),
        ListId::new(name).expect("test list names are valid"),
    )
}

/// `n` distinct addresses numbered from `offset`.
pub fn addresses(n: usize, offset: usize) -> Vec<Address> {
    (offset..offset + n)
        .map(|i| {
            let mut bytes = [0xaa; 32];
            bytes[..8].copy_from_slice(&(i as u64).to_be_bytes());
            Address::from_bytes(bytes)
        })
        .collect()
}

/// A fresh store with `list` initialized through a default scheduler.
pub async fn initialized_store(list: &ListKey) -> MemoryBackend {
    trellis_logging::init_test();
    let store = MemoryBackend::new();
    BatchScheduler::new(&store, &store, SchedulerConfig::default())
        .expect("default config is valid")
        .initialize_list(list)
        .await
        .expect("fresh store accepts initialization");
    store
}
