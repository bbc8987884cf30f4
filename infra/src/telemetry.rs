//! Tracing subscriber set-up
//!
//! `RUST_LOG` takes precedence over the configured level.

use scribe_shared::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::InfrastructureError;

/// Builds the filter from `RUST_LOG`, falling back to `config.level`
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, InfrastructureError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| InfrastructureError::Config(format!("Invalid log level '{}': {}", config.level, e)))
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let registry = tracing_subscriber::registry().with(env_filter(config)?);
    let with_source = config.source_location;

    let result = match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_file(with_source)
                    .with_line_number(with_source),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_file(with_source)
                    .with_line_number(with_source),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_target(false))
            .try_init(),
    };

    result.map_err(|e| InfrastructureError::Config(format!("Failed to install tracing subscriber: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_accepts_configured_level() {
        let config = LoggingConfig {
            level: "scribe_core=debug,info".to_string(),
            ..LoggingConfig::default()
        };
        assert!(env_filter(&config).is_ok());
    }
}
