//! Configuration for notegraph
//!
//! Loads the vault location and logging settings from defaults, an optional
//! TOML file, the environment and explicit arguments, and installs the
//! tracing subscriber.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{LoggingConfig, NotegraphConfig, VaultConfig, LOG_ENV, VAULT_PATH_ENV};
pub use error::{ConfigError, ConfigResult};
pub use logging::init_logging;
