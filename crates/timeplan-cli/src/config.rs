//! Optional `timeplan.toml` configuration
//!
//! ```toml
//! [storage]
//! path = "TimePlan.xlsx"
//!
//! [log]
//! filter = "timeplan_store=debug"
//! ```
//!
//! Every key is optional. A `--file` argument (or `TIMEPLAN_FILE`) wins over
//! `storage.path`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "timeplan.toml";

/// Project file used when neither the command line nor the config names one
pub const DEFAULT_STORAGE_FILE: &str = "TimePlan.xlsx";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub storage: StorageConfig,
    pub log: LogConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORAGE_FILE),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `EnvFilter` directive, used when `RUST_LOG` is unset
    pub filter: Option<String>,
}

impl Config {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Read `path`; a relative `storage.path` is resolved against the
    /// config file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config =
            Self::parse(&text).with_context(|| format!("in {}", path.display()))?;

        if config.storage.path.is_relative() {
            if let Some(dir) = path.parent() {
                config.storage.path = dir.join(&config.storage.path);
            }
        }
        Ok(config)
    }

    /// Explicit path must exist; otherwise fall back to `timeplan.toml` in
    /// the working directory, then defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    Self::from_file(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.storage.path, PathBuf::from("TimePlan.xlsx"));
        assert_eq!(config.log.filter, None);
    }

    #[test]
    fn parses_all_keys() {
        let config = Config::parse(
            r#"
            [storage]
            path = "plans/work.xlsx"

            [log]
            filter = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.path, PathBuf::from("plans/work.xlsx"));
        assert_eq!(config.log.filter.as_deref(), Some("debug"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("[storage]\nfile = \"x.xlsx\"").is_err());
    }

    #[test]
    fn relative_storage_path_follows_config_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timeplan.toml");
        std::fs::write(&path, "[storage]\npath = \"plan.xlsx\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.storage.path, dir.path().join("plan.xlsx"));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::discover(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
