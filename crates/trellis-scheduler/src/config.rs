//! Scheduler configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default number of elements submitted per batch.
pub const DEFAULT_BATCH_SIZE: usize = 25;

/// Largest accepted batch: half a leaf, so one batch rolls over at most once.
pub const MAX_BATCH_SIZE: usize = 128;

/// Environment variable overriding the batch size.
pub const BATCH_SIZE_ENV: &str = "TRELLIS_BATCH_SIZE";

/// Configuration for a [`BatchScheduler`](crate::BatchScheduler).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Elements per submitted batch, in `1..=MAX_BATCH_SIZE`.
    pub batch_size: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl SchedulerConfig {
    /// Create a config with a custom batch size.
    #[must_use]
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self { batch_size }
    }

    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let config = match std::env::var(BATCH_SIZE_ENV) {
            Ok(raw) => {
                let batch_size = raw.trim().parse().map_err(|_| {
                    Error::InvalidConfig(format!("{BATCH_SIZE_ENV}={raw:?} is not a number"))
                })?;
                Self { batch_size }
            }
            Err(_) => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(Error::InvalidConfig(format!(
                "batch_size {} must be in 1..={}",
                self.batch_size, MAX_BATCH_SIZE
            )));
        }
        Ok(())
    }
}
