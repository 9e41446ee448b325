//! Tracing subscriber setup.
//!
//! Installs a registry with an `EnvFilter` read from `RUST_LOG`, falling back
//! to [`DEFAULT_FILTER`], and a formatting layer.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "trellis_scheduler=info,trellis_cells=info";

/// Install the global subscriber. Later calls are ignored.
pub fn init() {
    let _ = try_init();
}

/// Install the global subscriber, failing if one is already set.
pub fn try_init() -> Result<(), TryInitError> {
    try_init_with(DEFAULT_FILTER)
}

/// Install the global subscriber with a fallback filter of `default_filter`.
pub fn try_init_with(default_filter: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

/// Subscriber for tests: output captured by the test harness.
pub fn init_test() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_fails() {
        init_test();
        assert!(try_init().is_err());
        tracing::info!("subscriber installed");
    }
}
