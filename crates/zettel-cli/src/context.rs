// crates/zettel-cli/src/context.rs - Application Context and Dependency Injection
//
// This module implements the application context pattern, which is Rust's approach
// to dependency injection. Instead of having global state or services that create
// their own dependencies, we bundle related services and configuration into a
// context object that gets passed to command handlers.
//
// DESIGN PATTERNS:
// - Dependency Injection: Services are provided to commands, not created by them
// - Service Locator: Context acts as a registry of available services
// - Configuration Management: Centralized configuration loading and validation
// - Resource Management: Handles vault paths, file access, etc.

use anyhow::{Context as AnyhowContext, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use zettel_core::config::StoreConfig;
use zettel_core::Place;

use crate::services::VaultService;

/// Application context that gets passed to command handlers.
///
/// Owns the running place stack for the vault and the config it was
/// loaded with; commands reach the storage core only through
/// [`Context::place`].
pub struct Context {
    vault_service: VaultService,
    config: StoreConfig,
}

impl Context {
    /// Resolve the vault path (explicit flag, then `ZETTEL_VAULT`, then
    /// the current directory), load its config, and start the place
    /// stack.
    pub fn new(vault_path: Option<PathBuf>) -> Result<Self> {
        let vault_path = vault_path
            .or_else(|| env::var("ZETTEL_VAULT").ok().map(PathBuf::from))
            .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        if !vault_path.exists() {
            return Err(anyhow::anyhow!(
                "Vault directory does not exist: {}\n\nTry:\n  zettel init {}",
                vault_path.display(),
                vault_path.display()
            ));
        }
        if !vault_path.is_dir() {
            return Err(anyhow::anyhow!(
                "Vault path is not a directory: {}",
                vault_path.display()
            ));
        }

        let config = zettel_core::config::ConfigLoader::load(&vault_path)
            .with_context(|| format!("Failed to load configuration from {}", vault_path.display()))?;

        let vault_service = VaultService::open_with_config(vault_path, config.clone())
            .with_context(|| "Failed to start vault storage")?;

        Ok(Self {
            vault_service,
            config,
        })
    }

    /// The running storage core commands operate through.
    pub fn place(&self) -> &Arc<dyn Place> {
        self.vault_service.place()
    }

    pub fn vault_path(&self) -> &Path {
        self.vault_service.vault_path()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}
