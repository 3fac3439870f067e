//! Log output for the host binary.

use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber.
///
/// The library crates log through the `log` facade, so its records are
/// forwarded into `tracing` before the subscriber is set.
pub fn init() -> anyhow::Result<()> {
    LogTracer::init()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_level(true));
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
