//! Tracing subscriber setup

use crate::config::LoggingConfig;
use crate::error::ConfigResult;
use anyhow::Context;
use tracing_subscriber::EnvFilter;

/// Build the filter for `config`, preferring `RUST_LOG` when it is set.
pub fn build_filter(config: &LoggingConfig) -> ConfigResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    Ok(EnvFilter::try_new(&config.level)
        .with_context(|| format!("Invalid log filter: {}", config.level))?)
}

/// Install the global fmt subscriber, writing to stderr.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_logging(config: &LoggingConfig) -> ConfigResult<bool> {
    let filter = build_filter(config)?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(level = %config.level, "logging initialised");
    }
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_invalid_level_is_rejected() {
        let saved = std::env::var("RUST_LOG").ok();
        std::env::remove_var("RUST_LOG");

        let config = LoggingConfig {
            level: "notegraph=verbose".to_string(),
        };
        assert!(build_filter(&config).is_err());

        if let Some(value) = saved {
            std::env::set_var("RUST_LOG", value);
        }
    }

    #[test]
    #[serial]
    fn test_second_init_is_noop() {
        let config = LoggingConfig::default();
        init_logging(&config).unwrap();
        assert!(!init_logging(&config).unwrap());
    }
}
