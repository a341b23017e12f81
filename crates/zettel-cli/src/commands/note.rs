// crates/zettel-cli/src/commands/note.rs - Zettel Lifecycle Commands
//
// These commands handle the high-level workflow of creating, viewing,
// editing, renaming and deleting zettels. Everything here is a thin
// wrapper over the Place trait; the storage core does the actual work.

use anyhow::Result;
use std::fs;

use zettel_core::{Content, Meta, Zettel, Zid};

use crate::context::Context;
use crate::services::EditorService;

/// Create a new zettel with a minted Zid, then optionally open it.
pub fn create(
    ctx: &Context,
    title: String,
    syntax: Option<String>,
    role: Option<String>,
    open: bool,
) -> Result<()> {
    let mut meta = Meta::new(Zid::INVALID);
    meta.set("title", &title)?;
    if let Some(syntax) = syntax {
        meta.set("syntax", syntax)?;
    }
    if let Some(role) = role {
        meta.set("role", role)?;
    }

    let zid = ctx
        .place()
        .create_zettel(Zettel::new(meta, Content::from(format!("# {title}\n\n"))))?;

    println!("Created zettel: {zid}");

    if open {
        edit(ctx, zid.to_string())?;
    }

    Ok(())
}

/// Print a zettel's meta and content to stdout.
pub fn show(ctx: &Context, zid: String) -> Result<()> {
    let zid = Zid::parse(&zid)?;
    let zettel = ctx.place().get_zettel(zid)?;

    println!("{}", zettel.meta.zid());
    for (key, value) in zettel.meta.pairs() {
        println!("{key}: {value}");
    }
    println!("{}", "-".repeat(40));
    if zettel.content.is_binary() {
        println!("<binary content, {} bytes>", zettel.content.len());
    } else {
        println!("{}", zettel.content.as_str_lossy());
    }

    Ok(())
}

/// Round-trip a zettel's content through the configured editor.
pub fn edit(ctx: &Context, zid: String) -> Result<()> {
    let zid = Zid::parse(&zid)?;
    let zettel = ctx.place().get_zettel(zid)?;

    let tmp = tempfile::Builder::new()
        .suffix(".zettel")
        .tempfile()
        .map_err(|e| anyhow::anyhow!("failed to create temporary file: {e}"))?;
    fs::write(tmp.path(), zettel.content.as_bytes())?;

    EditorService::open_file(tmp.path())?;

    let edited = fs::read(tmp.path())?;
    ctx.place()
        .update_zettel(Zettel::new(zettel.meta, Content::from(edited)))?;

    println!("Updated zettel: {zid}");
    Ok(())
}

/// Delete a zettel. Idempotent: absent Zids succeed.
pub fn remove(ctx: &Context, zid: String) -> Result<()> {
    let zid = Zid::parse(&zid)?;
    ctx.place().delete_zettel(zid)?;
    println!("Deleted zettel: {zid}");
    Ok(())
}

/// Rename (renumber) a zettel to a new Zid.
pub fn rename(ctx: &Context, current: String, new: String) -> Result<()> {
    let current = Zid::parse(&current)?;
    let new = Zid::parse(&new)?;
    ctx.place().rename_zettel(current, new)?;
    println!("Renamed {current} -> {new}");
    Ok(())
}
