// crates/zettel-cli/src/commands/init.rs - Vault Initialization Command
//
// The init command is special because it doesn't require an existing vault.
// It creates the vault structure from scratch, so it can't use the normal
// Context-based approach that assumes a vault already exists.

use anyhow::Result;
use std::env;
use std::path::PathBuf;

use crate::services::VaultService;

/// Initialize a new vault.
///
/// Creates the directory structure and configuration file needed for a
/// new vault. Safe (won't overwrite an existing config.toml) and gives
/// feedback about what was created.
///
/// EXAMPLES:
/// ```bash
/// zettel init                    # Initialize in current directory
/// zettel init ~/my-notes         # Initialize in specific location
/// ```
pub fn handle(path: Option<PathBuf>) -> Result<()> {
    let vault_path = path.unwrap_or_else(|| env::current_dir().unwrap());

    VaultService::init_vault(&vault_path)?;

    println!("Initialized zettel vault at: {}", vault_path.display());
    println!("Created .zettel/config.toml");
    println!();
    println!("Next steps:");
    println!("   zettel new \"My First Note\"");
    println!("   zettel list");
    println!("   zettel --help");

    Ok(())
}
