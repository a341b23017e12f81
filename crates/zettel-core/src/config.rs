// crates/zettel-core/src/config.rs - configuration knobs for the storage core
//
// Grounded on the teacher's `ConfigManager` (global -> vault -> env
// hierarchy, validate-after-load, serde-derived defaults); fields replaced
// with the knobs spec.md §6 actually names instead of the teacher's
// vault/note/template/editor sections, which belong to layers out of scope
// here.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::zid::{Zid, ZidError};

fn default_reload_interval_secs() -> u64 {
    600
}

fn default_file_worker_count() -> usize {
    17
}

fn default_list_page_size() -> usize {
    0 // 0 means unbounded, matching "no explicit eviction/limit" unless configured
}

fn default_syntax() -> String {
    "zmk".to_string()
}

fn default_role() -> String {
    "zettel".to_string()
}

fn default_url_prefix() -> String {
    "/".to_string()
}

/// Environment/config knobs produced by an external loader and consumed by
/// the storage core (spec.md §6): reload interval, file-worker count,
/// list-page size, default syntax/role, URL prefix, and the owner Zid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_reload_interval_secs")]
    pub reload_interval_secs: u64,

    #[serde(default = "default_file_worker_count")]
    pub file_worker_count: usize,

    #[serde(default = "default_list_page_size")]
    pub list_page_size: usize,

    #[serde(default = "default_syntax")]
    pub default_syntax: String,

    #[serde(default = "default_role")]
    pub default_role: String,

    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,

    #[serde(default)]
    pub owner_zid: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            reload_interval_secs: default_reload_interval_secs(),
            file_worker_count: default_file_worker_count(),
            list_page_size: default_list_page_size(),
            default_syntax: default_syntax(),
            default_role: default_role(),
            url_prefix: default_url_prefix(),
            owner_zid: None,
        }
    }
}

impl StoreConfig {
    pub fn reload_interval(&self) -> Duration {
        Duration::from_secs(self.reload_interval_secs)
    }

    pub fn list_page_size(&self) -> Option<usize> {
        if self.list_page_size == 0 {
            None
        } else {
            Some(self.list_page_size)
        }
    }

    pub fn owner(&self) -> Result<Option<Zid>, ZidError> {
        match &self.owner_zid {
            Some(s) => Zid::parse(s).map(Some),
            None => Ok(None),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.file_worker_count == 0 {
            return Err(ConfigError::Invalid(
                "file_worker_count must be at least 1".to_string(),
            ));
        }
        if let Some(owner) = &self.owner_zid {
            Zid::parse(owner).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("i/o error reading config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Loads a [`StoreConfig`], honoring the teacher's
/// defaults -> global -> vault -> env layering (`config.rs`'s `load_config`),
/// generalized to this spec's knob set.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config starting from defaults, overlaying a TOML file at
    /// `vault_path/.zettel/config.toml` if present, then overlaying
    /// `ZETTEL_*` environment variables.
    pub fn load(vault_path: &Path) -> Result<StoreConfig, ConfigError> {
        let mut config = StoreConfig::default();

        let config_path = vault_path.join(".zettel").join("config.toml");
        if config_path.exists() {
            config = Self::load_file(&config_path)?;
        }

        Self::apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn load_file(path: &Path) -> Result<StoreConfig, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env_overrides(config: &mut StoreConfig) {
        if let Ok(v) = std::env::var("ZETTEL_RELOAD_INTERVAL_SECS") {
            if let Ok(n) = v.parse() {
                config.reload_interval_secs = n;
            }
        }
        if let Ok(v) = std::env::var("ZETTEL_FILE_WORKER_COUNT") {
            if let Ok(n) = v.parse() {
                config.file_worker_count = n;
            }
        }
        if let Ok(v) = std::env::var("ZETTEL_OWNER_ZID") {
            config.owner_zid = Some(v);
        }
    }

    /// Render a commented starter TOML file, used by `zettel init`
    /// (grounds the teacher's `generate_default_config`).
    pub fn generate_default_toml() -> String {
        let defaults = StoreConfig::default();
        format!(
            "# Zettel store configuration\n\
             \n\
             # Seconds between full directory resyncs.\n\
             reload_interval_secs = {}\n\
             \n\
             # Number of sharded file-worker threads.\n\
             file_worker_count = {}\n\
             \n\
             # 0 means unbounded.\n\
             list_page_size = {}\n\
             \n\
             default_syntax = \"{}\"\n\
             default_role = \"{}\"\n\
             url_prefix = \"{}\"\n",
            defaults.reload_interval_secs,
            defaults.file_worker_count,
            defaults.list_page_size,
            defaults.default_syntax,
            defaults.default_role,
            defaults.url_prefix,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.file_worker_count, 17);
        assert_eq!(config.reload_interval(), Duration::from_secs(600));
        assert_eq!(config.list_page_size(), None);
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let mut config = StoreConfig::default();
        config.file_worker_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_owner_zid() {
        let mut config = StoreConfig::default();
        config.owner_zid = Some("not-a-zid".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let zettel_dir = dir.path().join(".zettel");
        fs::create_dir_all(&zettel_dir).unwrap();
        fs::write(
            zettel_dir.join("config.toml"),
            "reload_interval_secs = 60\nfile_worker_count = 4\n",
        )
        .unwrap();

        let config = ConfigLoader::load(dir.path()).unwrap();
        assert_eq!(config.reload_interval_secs, 60);
        assert_eq!(config.file_worker_count, 4);
        // unspecified fields keep their defaults
        assert_eq!(config.default_syntax, "zmk");
    }

    #[test]
    fn test_load_with_no_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config = ConfigLoader::load(dir.path()).unwrap();
        assert_eq!(config.file_worker_count, default_file_worker_count());
    }

    #[test]
    fn test_generate_default_toml_parses_back() {
        let text = ConfigLoader::generate_default_toml();
        let parsed: StoreConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.file_worker_count, 17);
    }
}
