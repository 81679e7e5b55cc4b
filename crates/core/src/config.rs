//! Client configuration
//!
//! Loaded from `config.toml` in the data directory, then overridden by
//! `INVENTORY_*` environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::pagination::DEFAULT_PAGE_SIZE;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

pub const ENV_API_URL: &str = "INVENTORY_API_URL";
pub const ENV_DATA_DIR: &str = "INVENTORY_DATA_DIR";
pub const ENV_PAGE_SIZE: &str = "INVENTORY_PAGE_SIZE";

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "inventory.db";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL
    pub api_url: String,
    /// Rows per page in listings
    pub page_size: usize,
    /// Where the local database lives; platform data dir when unset
    pub data_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            data_dir: None,
        }
    }
}

impl ClientConfig {
    /// Load from the default location plus the process environment
    pub fn load() -> Result<Self> {
        let lookup = |key: &str| env::var(key).ok();
        let data_dir = match lookup(ENV_DATA_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };
        let mut config = Self::from_file_or_default(&data_dir.join(CONFIG_FILE))?;
        if config.data_dir.is_none() {
            config.data_dir = Some(data_dir);
        }
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Parse a config file; a missing file yields the defaults
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn from_file_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(size) = lookup(ENV_PAGE_SIZE) {
            self.page_size = size
                .parse()
                .map_err(|_| Error::Config(format!("{} must be a number, got '{}'", ENV_PAGE_SIZE, size)))?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::Config("page_size must be at least 1".into()));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "api_url must start with http:// or https://, got '{}'",
                self.api_url
            )));
        }
        Ok(())
    }

    /// Path of the local database file
    pub fn database_path(&self) -> Result<PathBuf> {
        let dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => default_data_dir()?,
        };
        Ok(dir.join(DATABASE_FILE))
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("dev", "inventory", "inventory-client").ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine data directory",
        ))
    })?;
    Ok(dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ClientConfig::from_file_or_default(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.page_size, 5);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_url = \"https://inventory.example.com\"\n").unwrap();

        let config = ClientConfig::from_file_or_default(&path).unwrap();
        assert_eq!(config.api_url, "https://inventory.example.com");
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_bad_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "page_size = \"lots\"").unwrap();

        let err = ClientConfig::from_file_or_default(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "http://10.0.0.2:9000"),
            (ENV_PAGE_SIZE, "10"),
            (ENV_DATA_DIR, "/tmp/inventory"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api_url, "http://10.0.0.2:9000");
        assert_eq!(config.page_size, 10);
        assert_eq!(
            config.database_path().unwrap(),
            PathBuf::from("/tmp/inventory/inventory.db")
        );
    }

    #[test]
    fn test_invalid_overrides_rejected() {
        let mut config = ClientConfig::default();
        assert!(config
            .apply_overrides(|key| (key == ENV_PAGE_SIZE).then(|| "0".to_string()))
            .is_err());

        let mut config = ClientConfig::default();
        assert!(config
            .apply_overrides(|key| (key == ENV_API_URL).then(|| "localhost".to_string()))
            .is_err());
    }
}
