// crates/zettel-cli/src/commands/id.rs - Zid Commands
//
// Zids are flat 14-digit decimal timestamps (spec.md §2), so there is no
// hierarchy to walk here: parsing, validation, and minting are the whole
// surface, in place of the Luhmann sibling/child commands this module
// used to implement.

use anyhow::Result;

use zettel_core::Zid;

use crate::cli::IdCommands;

/// Handle all Zid commands.
///
/// DESIGN PATTERN: Command Handler
/// Each command variant is handled separately. Output is a single line
/// to stdout on success, for piping; errors go to stderr with a
/// non-zero exit code.
pub fn handle(cmd: IdCommands) -> Result<()> {
    match cmd {
        IdCommands::Parse { filename } => handle_parse(&filename),
        IdCommands::Validate { zid } => handle_validate(&zid),
        IdCommands::New => handle_new(),
    }
}

/// Extract the Zid portion of a filename: the leading 14 digits before
/// an optional `.<extension>` (spec.md §4.3's filename grammar).
///
/// EXAMPLES:
/// ```bash
/// zettel id parse "20240102030405.zettel"   # Output: 20240102030405
/// zettel id parse "/vault/20240102030405.meta"
/// ```
fn handle_parse(filename: &str) -> Result<()> {
    let basename = std::path::Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    let stem = basename.split('.').next().unwrap_or(basename);

    match Zid::parse(stem) {
        Ok(zid) => {
            println!("{zid}");
            Ok(())
        }
        Err(e) => {
            eprintln!("No valid Zid found in filename: {filename}");
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Validate a Zid string and report whether it's usable.
///
/// A Zid is valid iff it is exactly 14 decimal digits and not the
/// reserved all-zero value (spec.md §2).
///
/// EXAMPLES:
/// ```bash
/// zettel id validate 20240102030405    # valid
/// zettel id validate 00000000000000    # invalid: reserved zero Zid
/// zettel id validate abc               # invalid: not 14 digits
/// ```
fn handle_validate(zid: &str) -> Result<()> {
    match Zid::parse(zid) {
        Ok(parsed) => {
            println!("valid: {parsed}");
            Ok(())
        }
        Err(e) => {
            eprintln!("invalid: {e}");
            std::process::exit(1);
        }
    }
}

/// Mint a fresh Zid from the current time, without reserving or writing
/// anything. Two calls in quick succession are still strictly
/// increasing within this process, courtesy of the high-water mark, but
/// this standalone command starts a fresh minter each time it runs, so
/// repeated invocations across processes only guarantee ordering by
/// wall-clock second.
fn handle_new() -> Result<()> {
    println!("{}", Zid::from_now());
    Ok(())
}
