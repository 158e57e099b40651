//! Global configuration for cnab-deps.
//!
//! User-wide settings live in a TOML file outside any project:
//!
//! - **Unix/macOS**: `~/.cnab-deps/config.toml`
//! - **Windows**: `%LOCALAPPDATA%\cnab-deps\config.toml`
//!
//! A missing file is not an error; every setting has a default.
//!
//! ```toml
//! # Sort dependencies by name when a bundle's sequence cannot be used
//! sort_unsequenced = true
//!
//! # Default tracing filter when neither --verbose/--quiet nor RUST_LOG is set
//! log_level = "info"
//!
//! # Parent installation used to derive prerequisite installation names
//! installation = "prod-app"
//! ```

use crate::core::DepsError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// User-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Sort `list` output by dependency name when the bundle's sequence is
    /// missing or does not cover every required bundle.
    ///
    /// Library ordering is unaffected; this only changes CLI output.
    #[serde(default)]
    pub sort_unsequenced: bool,

    /// Default tracing filter directive, e.g. `info` or `cnab_deps=debug`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Default parent installation name for `list`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation: Option<String>,
}

impl GlobalConfig {
    /// Load from `path` if given, otherwise from [`default_path`](Self::default_path).
    ///
    /// Returns the default configuration when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not valid
    /// configuration TOML.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => match Self::default_path() {
                Ok(path) => path,
                Err(e) => {
                    debug!("No default config location: {e}");
                    return Ok(Self::default());
                }
            },
        };

        if path.exists() {
            Self::load_from(&path).await
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error wrapping [`DepsError::ConfigError`] if the file cannot
    /// be read or parsed.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await.map_err(|e| DepsError::ConfigError {
            message: format!("failed to read {}: {e}", path.display()),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| DepsError::ConfigError {
            message: format!("failed to parse {}: {e}", path.display()),
        })?;

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save as pretty TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file cannot be
    /// written.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize global config")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write global config to {}", path.display()))
    }

    /// Platform-specific location of the global configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home (or local data) directory is unknown.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("cnab-deps")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".cnab-deps")
        };

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config =
            GlobalConfig::load_with_optional(Some(temp.path().join("config.toml"))).await.unwrap();
        assert_eq!(config, GlobalConfig::default());
        assert!(!config.sort_unsequenced);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let config = GlobalConfig {
            sort_unsequenced: true,
            log_level: Some("debug".to_string()),
            installation: Some("prod-app".to_string()),
        };
        config.save_to(&path).await.unwrap();

        let loaded = GlobalConfig::load_from(&path).await.unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_invalid_toml_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "sort_unsequenced = \"maybe\"").unwrap();

        let err = GlobalConfig::load_from(&path).await.unwrap_err();
        let deps_error = err.downcast_ref::<DepsError>().unwrap();
        assert!(matches!(deps_error, DepsError::ConfigError { .. }));
    }

    #[tokio::test]
    async fn test_unknown_keys_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "sort_unsequenced = true\ncolour = \"never\"\n").unwrap();

        assert!(GlobalConfig::load_from(&path).await.is_err());
    }

    #[test]
    fn test_default_path() {
        let path = GlobalConfig::default_path().unwrap();
        assert!(path.ends_with("config.toml"));
    }
}
