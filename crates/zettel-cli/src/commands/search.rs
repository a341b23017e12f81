// crates/zettel-cli/src/commands/search.rs - Zettel Search Command
//
// Simple text-based search across titles and metadata, delegating the
// actual predicate to zettel-core's Filter::text_contains.

use anyhow::Result;

use zettel_core::Filter;

use crate::context::Context;

/// Search zettels by a case-insensitive substring match against title
/// and other metadata values.
pub fn handle(ctx: &Context, query: String) -> Result<()> {
    let filter = Filter::text_contains(query.clone());
    let metas = ctx.place().select_meta(Some(&filter), None)?;

    println!("Searching for: {query}");
    println!();

    if metas.is_empty() {
        println!("No matches.");
        return Ok(());
    }

    for meta in &metas {
        println!("{}: {}", meta.zid(), meta.title());
    }

    Ok(())
}
