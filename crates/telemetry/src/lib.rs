//! Logging bootstrap for Bookstall binaries.

use anyhow::anyhow;
use tracing_subscriber::{fmt, EnvFilter};

use bookstall_kernel::settings::{LogFormat, TelemetrySettings};

/// Build the event filter: `RUST_LOG` wins over the configured filter.
pub fn env_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.filter)
            .map_err(|err| anyhow!("invalid telemetry.filter '{}': {}", settings.filter, err)),
    }
}

/// Install the global tracing subscriber. Calling it twice is harmless; the
/// first subscriber stays in place.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = env_filter(settings)?;

    let installed = match settings.log_format {
        LogFormat::Pretty => fmt().with_env_filter(filter).with_target(true).try_init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .try_init(),
    };

    if installed.is_ok() {
        tracing::info!(
            target: "bookstall-telemetry",
            format = ?settings.log_format,
            "telemetry initialized"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_filter() {
        let settings = TelemetrySettings {
            filter: "bookstall=loud".to_string(),
            ..TelemetrySettings::default()
        };
        if std::env::var("RUST_LOG").is_err() {
            assert!(env_filter(&settings).is_err());
        }
    }

    #[test]
    fn init_twice_is_ok() {
        let settings = TelemetrySettings::default();
        assert!(init(&settings).is_ok());
        assert!(init(&settings).is_ok());
    }
}
