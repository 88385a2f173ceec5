//! Optional defaults for the import command

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Defaults merged underneath the command-line flags
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Destination database file
    pub database: Option<PathBuf>,
    /// Destination table name
    pub table: Option<String>,
}

impl Config {
    /// Load from `<config_dir>/histload/config.toml`.
    ///
    /// A missing file just means no defaults; a malformed one is an error
    /// the operator should hear about.
    pub fn load() -> Result<Config> {
        let Some(path) = config_file_path() else {
            return Ok(Config::default());
        };
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("histload").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: Config =
            toml::from_str("database = \"/data/manual.db\"\ntable = \"Manual_Data_Plant\"\n")
                .unwrap();
        assert_eq!(config.database, Some(PathBuf::from("/data/manual.db")));
        assert_eq!(config.table.as_deref(), Some("Manual_Data_Plant"));
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.database.is_none());
        assert!(config.table.is_none());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(toml::from_str::<Config>("server = \"db01\"").is_err());
    }
}
