//! Configuration management for Docflow.
//!
//! Handles loading configuration from TOML files.

use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::document::DEFAULT_TIMESTAMP_FORMAT;
use super::persist::DEFAULT_DATA_FILE;

/// Name of the per-directory config file.
pub const LOCAL_CONFIG_FILE: &str = ".docflow.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document file settings
    pub storage: StorageConfig,

    /// Export settings
    pub export: ExportConfig,

    /// Display settings
    pub display: DisplayConfig,
}

/// Document file settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the JSON document file (`~` is expanded)
    pub data_file: String,
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory export files are written to (`~` is expanded)
    pub directory: String,
}

/// Display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// strftime format for created/updated timestamps
    pub timestamp_format: String,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.docflow.toml` in current directory
    /// 2. `~/.config/docflow/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Config file [`Config::load`] would read, if any exists.
    pub fn find_config_file() -> Option<PathBuf> {
        // Try local config first
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        // Try global config
        Self::global_config_path().filter(|path| path.exists())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {e}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
        config.validate().map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> anyhow::Result<()> {
        let format = &self.display.timestamp_format;
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            anyhow::bail!("display.timestamp_format {format:?} is not a valid strftime format");
        }
        Ok(())
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("docflow"))
    }

    /// Path of the global config file.
    pub fn global_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Resolved path of the document file.
    pub fn data_file_path(&self) -> PathBuf {
        expand_path(&self.storage.data_file)
    }

    /// Resolved export directory.
    pub fn export_dir(&self) -> PathBuf {
        expand_path(&self.export.directory)
    }

    /// Override the document file location.
    pub fn with_data_file(mut self, path: impl Into<String>) -> Self {
        self.storage.data_file = path.into();
        self
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_file: DEFAULT_DATA_FILE.to_string() }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { directory: ".".to_string() }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string() }
    }
}

/// Expand `~` and environment variables, leaving the path as-is on failure.
fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => PathBuf::from(shellexpand::tilde(path).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage.data_file, "documents.json");
        assert_eq!(config.export.directory, ".");
        assert_eq!(config.display.timestamp_format, "%Y-%m-%d %H:%M");
        assert_eq!(config.data_file_path(), PathBuf::from("documents.json"));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("[storage]"));
        assert!(toml_str.contains("[export]"));
        assert!(toml_str.contains("[display]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [storage]
            data_file = "/var/lib/docflow/docs.json"

            [display]
            timestamp_format = "%d.%m.%Y"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data_file_path(), PathBuf::from("/var/lib/docflow/docs.json"));
        assert_eq!(config.display.timestamp_format, "%d.%m.%Y");
        // Missing sections fall back to defaults
        assert_eq!(config.export, ExportConfig::default());
    }

    #[test]
    fn test_tilde_expansion() {
        let config = Config::default().with_data_file("~/docs.json");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.data_file_path(), home.join("docs.json"));
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[export]\ndirectory = \"exports\"\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.export_dir(), PathBuf::from("exports"));
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn test_invalid_timestamp_format_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\ntimestamp_format = \"%Q\"\n").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("timestamp_format"));

        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage\n").unwrap();

        assert!(Config::load_from_file(&path).is_err());
    }
}
