// ⚙️ Configuration - JSON file plus environment overrides

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::names::MAX_SELECTABLE;

pub const CONFIG_ENV: &str = "ITEM_RESOLVER_CONFIG";
pub const DB_ENV: &str = "ITEM_RESOLVER_DB";
pub const MAX_SELECTABLE_ENV: &str = "ITEM_RESOLVER_MAX_SELECTABLE";
pub const ADDR_ENV: &str = "ITEM_RESOLVER_ADDR";
pub const LOG_ENV: &str = "ITEM_RESOLVER_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite catalog file
    pub database_path: PathBuf,

    /// Result count at which callers stop listing and ask for a narrower query
    pub max_selectable: usize,

    /// env_logger filter, e.g. "info" or "item_resolver=debug"
    pub log_level: String,

    /// Bind address for the HTTP server
    pub server_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: PathBuf::from("catalog.db"),
            max_selectable: MAX_SELECTABLE,
            log_level: "info".to_string(),
            server_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Config {
    /// Load from a JSON file; missing keys fall back to defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config JSON: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Optional file named by ITEM_RESOLVER_CONFIG, then per-key env overrides
    pub fn load() -> Result<Self> {
        let mut config = match env::var(CONFIG_ENV) {
            Ok(path) => Config::from_file(&path)?,
            Err(_) => Config::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from any key lookup (the environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(DB_ENV) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(value) = lookup(MAX_SELECTABLE_ENV) {
            self.max_selectable = value
                .trim()
                .parse()
                .with_context(|| format!("{} must be a positive integer, got '{}'", MAX_SELECTABLE_ENV, value))?;
        }
        if let Some(addr) = lookup(ADDR_ENV) {
            self.server_addr = addr;
        }
        if let Some(level) = lookup(LOG_ENV) {
            self.log_level = level;
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.max_selectable < 2 {
            anyhow::bail!(
                "max_selectable must be at least 2 (got {})",
                self.max_selectable
            );
        }
        Ok(())
    }
}

/// Initialize env_logger once; RUST_LOG wins over the configured level
pub fn init_logging(config: &Config) {
    let env = env_logger::Env::default().default_filter_or(config.log_level.as_str());
    // A second call (tests, embedding) is harmless
    let _ = env_logger::Builder::from_env(env).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_selectable, 30);
        assert_eq!(config.database_path, PathBuf::from("catalog.db"));
    }

    #[test]
    fn test_from_file_partial_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"database_path": "/tmp/items.db", "max_selectable": 10}}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/items.db"));
        assert_eq!(config.max_selectable, 10);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_from_file_rejects_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(Config::from_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = Config::from_file("/nonexistent/item-resolver.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (DB_ENV, "other.db"),
            (MAX_SELECTABLE_ENV, " 12 "),
            (ADDR_ENV, "0.0.0.0:8080"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.database_path, PathBuf::from("other.db"));
        assert_eq!(config.max_selectable, 12);
        assert_eq!(config.server_addr, "0.0.0.0:8080");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let mut config = Config::default();
        assert!(config
            .apply_overrides(|key| (key == MAX_SELECTABLE_ENV).then(|| "lots".to_string()))
            .is_err());
        assert!(config
            .apply_overrides(|key| (key == MAX_SELECTABLE_ENV).then(|| "1".to_string()))
            .is_err());
    }
}
