//! Configuration model and layered loading
//!
//! Precedence, lowest first: built-in defaults, TOML file, environment,
//! explicit arguments.

use crate::error::{ConfigError, ConfigResult};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the vault root
pub const VAULT_PATH_ENV: &str = "OBSIDIAN_VAULT_PATH";

/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "NOTEGRAPH_LOG";

/// When set, the user config file is not read
pub const TEST_MODE_ENV: &str = "NOTEGRAPH_TEST_MODE";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotegraphConfig {
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Vault location and layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Root directory holding the notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Subdirectory receiving deleted notes
    #[serde(default = "default_trash_dir")]
    pub trash_dir: String,

    /// Entries whose name starts with this prefix are never indexed
    #[serde(default = "default_reserved_prefix")]
    pub reserved_prefix: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: None,
            trash_dir: default_trash_dir(),
            reserved_prefix: default_reserved_prefix(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `notegraph_core=debug`
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_trash_dir() -> String {
    ".trash".to_string()
}

fn default_reserved_prefix() -> String {
    ".".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl NotegraphConfig {
    /// Load configuration with precedence: defaults < file < env < args
    pub fn load(config_file: Option<PathBuf>, vault_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::from_file_or_default(config_file)?;

        if let Ok(path) = std::env::var(VAULT_PATH_ENV) {
            if !path.is_empty() {
                config.vault.path = Some(PathBuf::from(path));
            }
        }
        if let Ok(level) = std::env::var(LOG_ENV) {
            config.logging.level = level;
        }

        if let Some(path) = vault_path {
            config.vault.path = Some(path);
        }

        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents).context("Failed to parse configuration TOML")?)
    }

    /// The configured vault root, which must be an existing directory
    pub fn vault_root(&self) -> ConfigResult<&Path> {
        let path = self
            .vault
            .path
            .as_deref()
            .ok_or(ConfigError::MissingVaultPath)?;
        if !path.is_dir() {
            return Err(ConfigError::NotADirectory(path.to_path_buf()));
        }
        Ok(path)
    }

    /// Get default config file path
    pub fn default_config_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("notegraph");
        Ok(config_dir.join("config.toml"))
    }

    /// Display the current configuration as TOML
    pub fn display_as_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self).context("Failed to serialize config as TOML")?)
    }

    /// Load config from file or return default
    fn from_file_or_default(config_file: Option<PathBuf>) -> anyhow::Result<Self> {
        if config_file.is_none() && std::env::var(TEST_MODE_ENV).is_ok() {
            return Ok(Self::default());
        }

        let path = config_file
            .or_else(|| Self::default_config_path().ok())
            .filter(|p| p.exists());

        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    struct EnvGuard {
        saved: Vec<(&'static str, Option<String>)>,
    }

    impl EnvGuard {
        fn new(keys: &[&'static str]) -> Self {
            let saved = keys.iter().map(|k| (*k, std::env::var(k).ok())).collect();
            for key in keys {
                std::env::remove_var(key);
            }
            std::env::set_var(TEST_MODE_ENV, "1");
            Self { saved }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            std::env::remove_var(TEST_MODE_ENV);
            for (key, value) in &self.saved {
                match value {
                    Some(v) => std::env::set_var(key, v),
                    None => std::env::remove_var(key),
                }
            }
        }
    }

    #[test]
    #[serial]
    fn test_load_defaults() {
        let _env = EnvGuard::new(&[VAULT_PATH_ENV, LOG_ENV]);

        let config = NotegraphConfig::load(None, None).unwrap();
        assert_eq!(config.vault.path, None);
        assert_eq!(config.vault.trash_dir, ".trash");
        assert_eq!(config.vault.reserved_prefix, ".");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    #[serial]
    fn test_missing_vault_path() {
        let _env = EnvGuard::new(&[VAULT_PATH_ENV, LOG_ENV]);

        let config = NotegraphConfig::load(None, None).unwrap();
        assert!(matches!(config.vault_root(), Err(ConfigError::MissingVaultPath)));
    }

    #[test]
    #[serial]
    fn test_env_overrides_file_and_args_override_env() {
        let _env = EnvGuard::new(&[VAULT_PATH_ENV, LOG_ENV]);
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("config.toml");
        std::fs::write(
            &file,
            "[vault]\npath = \"/from/file\"\ntrash_dir = \"bin\"\n\n[logging]\nlevel = \"warn\"\n",
        )
        .unwrap();

        let from_file = NotegraphConfig::load(Some(file.clone()), None).unwrap();
        assert_eq!(from_file.vault.path, Some(PathBuf::from("/from/file")));
        assert_eq!(from_file.vault.trash_dir, "bin");
        assert_eq!(from_file.logging.level, "warn");

        std::env::set_var(VAULT_PATH_ENV, "/from/env");
        std::env::set_var(LOG_ENV, "debug");
        let from_env = NotegraphConfig::load(Some(file.clone()), None).unwrap();
        assert_eq!(from_env.vault.path, Some(PathBuf::from("/from/env")));
        assert_eq!(from_env.logging.level, "debug");

        let from_args =
            NotegraphConfig::load(Some(file), Some(PathBuf::from("/from/args"))).unwrap();
        assert_eq!(from_args.vault.path, Some(PathBuf::from("/from/args")));
        assert_eq!(from_args.vault.trash_dir, "bin");
    }

    #[test]
    #[serial]
    fn test_vault_root_must_be_directory() {
        let _env = EnvGuard::new(&[VAULT_PATH_ENV, LOG_ENV]);
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("note.md");
        std::fs::write(&file, "x").unwrap();

        let config = NotegraphConfig::load(None, Some(file)).unwrap();
        assert!(matches!(config.vault_root(), Err(ConfigError::NotADirectory(_))));

        let config = NotegraphConfig::load(None, Some(temp.path().to_path_buf())).unwrap();
        assert_eq!(config.vault_root().unwrap(), temp.path());
    }

    #[test]
    fn test_invalid_toml_reports_load_error() {
        let err = NotegraphConfig::from_toml("[vault\npath = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
        assert!(err.to_string().starts_with("Failed to load configuration"));
    }

    #[test]
    fn test_toml_round_trip_keeps_layout_fields() {
        let config = NotegraphConfig::from_toml("[vault]\nreserved_prefix = \"_\"\n").unwrap();
        assert_eq!(config.vault.reserved_prefix, "_");
        assert_eq!(config.vault.trash_dir, ".trash");

        let rendered = config.display_as_toml().unwrap();
        assert_eq!(NotegraphConfig::from_toml(&rendered).unwrap(), config);
    }
}
