//! Logging bootstrap for the catalog service.

use catalog_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::{fmt, EnvFilter};

/// Build the event filter: `RUST_LOG` when set, the configured directive otherwise.
pub fn env_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.filter)
            .map_err(|e| anyhow::anyhow!("invalid log filter '{}': {e}", settings.filter)),
    }
}

/// Install the global tracing subscriber.
///
/// Calling this more than once is harmless; later calls keep the first
/// subscriber.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = env_filter(settings)?;

    let installed = match settings.log_format {
        LogFormat::Pretty => fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .is_ok(),
        LogFormat::Json => fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .is_ok(),
    };

    if installed {
        tracing::info!(
            target: "catalog-telemetry",
            format = ?settings.log_format,
            "telemetry initialized"
        );
    }

    Ok(())
}
