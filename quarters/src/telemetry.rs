//! Telemetry initialization (tracing fmt subscriber with env filtering).
//!
//! Log verbosity is controlled with the standard `RUST_LOG` environment
//! variable, e.g. `RUST_LOG=quarters=debug,sqlx=warn`.

use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the tracing subscriber.
///
/// Defaults to `info` level when `RUST_LOG` is unset. Safe to call once at
/// startup; tests use `test_log` instead.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    info!("Telemetry initialized");
    Ok(())
}
