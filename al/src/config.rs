//! Configuration for the attempt ledger

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite database file
    #[serde(rename = "db-path", default = "default_db_path")]
    pub db_path: PathBuf,
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("muster")
        .join("attempts.db")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl Config {
    /// Load configuration, trying several locations in order:
    /// 1. Explicit path if provided
    /// 2. ~/.config/attemptledger/config.yml
    /// 3. ./attemptledger.yml
    /// 4. Default configuration
    pub fn load(explicit_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = explicit_path {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("attemptledger").join("config.yml");
            if path.exists() {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                let config: Config = serde_yaml::from_str(&content)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
                return Ok(config);
            }
        }

        let local = PathBuf::from("attemptledger.yml");
        if local.exists() {
            let content = fs::read_to_string(&local).context("Failed to read attemptledger.yml")?;
            let config: Config =
                serde_yaml::from_str(&content).context("Failed to parse attemptledger.yml")?;
            return Ok(config);
        }

        Ok(Config::default())
    }

    /// Save configuration to the given path
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.db_path.ends_with("attempts.db"));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "db-path: /tmp/custom/ledger.db\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/custom/ledger.db"));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let path = PathBuf::from("/nonexistent/config.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        let config = Config {
            db_path: PathBuf::from("/var/lib/muster/attempts.db"),
        };
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.db_path, config.db_path);
    }
}
