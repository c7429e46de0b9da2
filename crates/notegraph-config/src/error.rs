use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No vault root was given by file, environment or argument
    #[error("Vault path not configured. Set OBSIDIAN_VAULT_PATH or pass a vault path")]
    MissingVaultPath,

    /// The configured vault root does not exist or is not a directory
    #[error("Vault path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Reading or parsing a config file failed
    #[error("Failed to load configuration: {0:#}")]
    Load(#[from] anyhow::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
