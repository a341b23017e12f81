// crates/zettel-cli/src/services/vault.rs - owns the running storage stack
//
// Grounded on the teacher's VaultService as the "data access layer" that
// commands talk to instead of the storage core directly, but the storage
// itself is now delegated entirely to zettel-core: this service's only job
// is to assemble a ChainPlace of a DirectoryPlace over writable ZIds and a
// ConstantPlace for the builtin Zids, start it, and stop it on drop.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as AnyhowContext, Result};
use zettel_core::config::{ConfigLoader, StoreConfig};
use zettel_core::uri::build_places;
use zettel_core::{ChainPlace, Place};

/// Owns the running place stack for one vault directory.
///
/// `place()` is the single entry point commands use; everything else
/// (filenames, workers, the change-observer bus) lives behind it.
pub struct VaultService {
    vault_path: PathBuf,
    place: Arc<dyn Place>,
}

impl VaultService {
    /// Assemble and start the place stack for `vault_path`, loading
    /// `.zettel/config.toml` if present.
    pub fn open(vault_path: PathBuf) -> Result<Self> {
        let config = ConfigLoader::load(&vault_path)
            .with_context(|| format!("failed to load config for {}", vault_path.display()))?;
        Self::open_with_config(vault_path, config)
    }

    pub fn open_with_config(vault_path: PathBuf, config: StoreConfig) -> Result<Self> {
        let dir_uri = format!("dir:{}", vault_path.display());
        let children = build_places(&[&dir_uri, "const:"], config)
            .with_context(|| format!("failed to parse place URIs for {}", vault_path.display()))?;
        let chain: Arc<dyn Place> = Arc::new(ChainPlace::new(children));
        chain
            .start()
            .with_context(|| format!("failed to start vault at {}", vault_path.display()))?;
        Ok(VaultService {
            vault_path,
            place: chain,
        })
    }

    pub fn place(&self) -> &Arc<dyn Place> {
        &self.place
    }

    pub fn vault_path(&self) -> &Path {
        &self.vault_path
    }

    /// Initialize a new vault directory: create it, write a starter
    /// `.zettel/config.toml`, but never overwrite an existing one.
    pub fn init_vault(vault_path: &Path) -> Result<()> {
        std::fs::create_dir_all(vault_path).with_context(|| {
            format!("failed to create vault directory: {}", vault_path.display())
        })?;

        let zettel_dir = vault_path.join(".zettel");
        std::fs::create_dir_all(&zettel_dir)
            .with_context(|| format!("failed to create {}", zettel_dir.display()))?;

        let config_path = zettel_dir.join("config.toml");
        if !config_path.exists() {
            std::fs::write(&config_path, ConfigLoader::generate_default_toml())
                .with_context(|| format!("failed to write {}", config_path.display()))?;
        }

        Ok(())
    }
}

impl Drop for VaultService {
    fn drop(&mut self) {
        let _ = self.place.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_then_open() {
        let dir = tempdir().unwrap();
        let vault_path = dir.path().join("vault");
        VaultService::init_vault(&vault_path).unwrap();
        assert!(vault_path.join(".zettel/config.toml").exists());

        let service = VaultService::open(vault_path).unwrap();
        // the builtin Configuration zettel is reachable through the chain
        let config_zid = zettel_core::Zid::parse("00000000000001").unwrap();
        assert_eq!(service.place().get_meta(config_zid).unwrap().title(), "Configuration");
    }

    #[test]
    fn test_init_is_idempotent() {
        let dir = tempdir().unwrap();
        let vault_path = dir.path().join("vault");
        VaultService::init_vault(&vault_path).unwrap();
        VaultService::init_vault(&vault_path).unwrap();
    }
}
