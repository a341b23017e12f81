// crates/zettel-cli/src/cli.rs - Command Line Interface Definitions
//
// This module contains pure data structures that define the CLI interface.
// It uses clap's derive API to declaratively specify commands and arguments.
//
// DESIGN PHILOSOPHY:
// - Declarative over imperative: We describe WHAT the interface looks like,
//   not HOW to parse it (clap handles the how)
// - No business logic: This module only defines the shape of commands
// - Documentation as code: Help text is embedded in the struct definitions
// - Type safety: Invalid command combinations are prevented at compile time
//
// RUST LEARNING NOTES:
// - `#[derive(Parser)]` is a procedural macro that generates parsing code
// - `#[command(...)]` attributes configure clap's behavior
// - `#[arg(...)]` attributes configure individual argument parsing
//
// CLAP PATTERNS:
// - Subcommands are represented as enum variants
// - Global options (like --vault) are defined on the main struct
// - Help text comes from doc comments and attribute descriptions
// - Argument types are inferred from struct field types

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure defining global options and subcommands
///
/// This uses clap's derive API for clean, declarative command definition.
/// The structure mirrors typical Unix tools where you have:
/// - Global options (like --vault) that apply to all commands
/// - Subcommands that implement specific functionality
///
/// EXAMPLE USAGE:
/// ```bash
/// zettel --vault ~/notes init                 # Global option before command
/// zettel new "My First Note"                  # Simple command with args
/// zettel list --json | jq '.[] | .id'         # Command option with piping
/// ZETTEL_VAULT=~/work zettel list             # Environment variable override
/// ```
///
/// DESIGN DECISIONS:
/// - Global --vault option allows working with multiple vaults
/// - Commands are grouped by functionality (id, template, etc.)
/// - Both short (-v) and long (--vault) options for usability
#[derive(Parser)]
#[command(name = "zettel")]
#[command(about = "A CLI for a Zettelkasten storage core")]
#[command(version = "0.1.0")]
#[command(long_about = "
A command-line tool for a Zettelkasten storage core built on flat,
time-ordered 14-digit Zettel identifiers (Zids).

Examples:
  zettel init                     Initialize new vault
  zettel new \"First Note\"         Create a note, minting its Zid
  zettel list --json              Machine-readable output
  zettel id parse 20240102030405.zettel   Extract the Zid from a filename
")]
pub struct Cli {
    /// Vault directory (overrides ZETTEL_VAULT environment variable)
    ///
    /// Following Unix conventions: CLI args > environment > defaults.
    /// If not specified, checks ZETTEL_VAULT environment variable,
    /// then falls back to current directory.
    #[arg(short, long, global = true)]
    #[arg(help = "Vault directory (overrides ZETTEL_VAULT env var)")]
    pub vault: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level command categories
///
/// COMMAND PHILOSOPHY:
/// - init: One-time setup (like `git init`)
/// - new/show/edit/rm/mv: the core zettel lifecycle
/// - id: Zid parsing/validation/minting, no hierarchy to walk
/// - template: rendering the new-zettel template
/// - list/search: discovery
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new vault
    ///
    /// Creates the directory structure and configuration files needed
    /// for a new vault. Safe: won't overwrite an existing config.toml.
    ///
    /// EXAMPLES:
    /// zettel init                Initialize in current directory
    /// zettel init ~/notes        Initialize in specific location
    Init {
        /// Path to create vault (defaults to current directory)
        path: Option<PathBuf>,
    },

    /// Create a new zettel
    ///
    /// Mints a fresh Zid from the current time, fills in a title and
    /// (optionally) syntax/role, and writes the zettel to the vault's
    /// DirectoryPlace.
    ///
    /// EXAMPLES:
    /// zettel new "First Note"
    /// zettel new "Draft" --syntax html --open
    New {
        /// Title for the new zettel
        title: String,

        /// Meta syntax (defaults to the vault's configured default)
        #[arg(long)]
        syntax: Option<String>,

        /// Meta role (defaults to the vault's configured default)
        #[arg(long)]
        role: Option<String>,

        /// Open the new zettel in $ZETTEL_EDITOR/$EDITOR after creation
        #[arg(long)]
        open: bool,
    },

    /// Display a zettel's meta and content to stdout
    ///
    /// EXAMPLES:
    /// zettel show 20240102030405 | less
    Show {
        /// Zid of the zettel to display
        zid: String,
    },

    /// Open a zettel's content in an editor, writing back on save
    ///
    /// Round-trips through a temporary file: reads the current content,
    /// hands it to $ZETTEL_EDITOR/$EDITOR, then calls update_zettel
    /// with whatever the editor left behind.
    Edit {
        /// Zid of the zettel to edit
        zid: String,
    },

    /// Delete a zettel
    ///
    /// Idempotent: deleting an absent Zid succeeds.
    Rm {
        /// Zid of the zettel to delete
        zid: String,
    },

    /// Rename (renumber) a zettel to a new Zid
    ///
    /// Fails if the destination Zid already exists.
    Mv {
        /// Current Zid
        current: String,
        /// Destination Zid
        new: String,
    },

    /// List zettels in the vault
    ///
    /// OUTPUT FORMATS:
    /// - Default: Zid and title for human reading
    /// - --json: Structured data for scripting
    ///
    /// EXAMPLES:
    /// zettel list
    /// zettel list --json | jq '.[].zid'
    /// zettel list --role zettel --tag rust
    List {
        /// Output as JSON for machine processing
        #[arg(long)]
        json: bool,

        /// Only list zettels with this role
        #[arg(long)]
        role: Option<String>,

        /// Only list zettels carrying this tag (without the leading #)
        #[arg(long)]
        tag: Option<String>,
    },

    /// Search zettels by title/content substring
    ///
    /// SEARCH STRATEGY:
    /// Case-insensitive substring match against each zettel's title and
    /// textual content.
    ///
    /// EXAMPLES:
    /// zettel search "machine learning"
    /// zettel search TODO
    Search {
        /// Search query string
        query: String,
    },

    /// Zid operations (parsing, validation, minting)
    #[command(subcommand)]
    Id(IdCommands),

    /// New-zettel template operations
    #[command(subcommand)]
    Template(TemplateCommands),

    /// Print a shell completion script to stdout
    ///
    /// EXAMPLES:
    /// zettel completions bash > /etc/bash_completion.d/zettel
    /// zettel completions zsh > ~/.zfunc/_zettel
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Zid-specific subcommands
///
/// Zids are flat 14-digit decimal timestamps with a collision-avoidance
/// high-water mark (spec.md §2) — there is no Luhmann-style parent/child
/// hierarchy to walk here, only parse/validate/mint.
#[derive(Subcommand)]
pub enum IdCommands {
    /// Parse a Zid out of a filename
    ///
    /// Filenames look like `<14 digits>` optionally followed by
    /// `.<extension>` (e.g. `20240102030405.zettel`, `20240102030405.meta`).
    ///
    /// EXAMPLES:
    /// zettel id parse "20240102030405.zettel"   # Output: 20240102030405
    /// zettel id parse "not-a-zid.md"             # Error
    Parse {
        /// Filename to extract a Zid from
        filename: String,
    },

    /// Validate a Zid string
    ///
    /// Checks that the string is exactly 14 decimal digits and not the
    /// all-zero invalid Zid.
    ///
    /// EXAMPLES:
    /// zettel id validate 20240102030405    # Shows: valid
    /// zettel id validate 00000000000000    # Shows: invalid (the zero Zid)
    /// zettel id validate abc               # Shows: invalid
    Validate {
        /// Zid string to validate
        zid: String,
    },

    /// Mint a fresh Zid from the current time
    ///
    /// Does not reserve or write anything; just prints what `new`/
    /// `create_zettel` would compute. Two calls in quick succession are
    /// still guaranteed strictly increasing (the minter's high-water
    /// mark persists only within one process).
    New,
}

/// New-zettel template subcommands
///
/// The storage core only exposes the pure placeholder-substitution
/// functions (`zettel_core::template::render`/`placeholders`); the
/// template's actual text lives in the constant place's
/// `00000000000027` builtin zettel.
#[derive(Subcommand)]
pub enum TemplateCommands {
    /// Print the raw new-zettel template content
    Show,

    /// Render the new-zettel template with a given title
    ///
    /// EXAMPLES:
    /// zettel template render "My New Note"
    Render {
        /// Title to substitute for `{{title}}`
        title: String,
    },
}
