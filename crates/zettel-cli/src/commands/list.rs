// crates/zettel-cli/src/commands/list.rs - Zettel Listing Command
//
// This command provides different views of the zettel collection with
// support for both human-readable and machine-readable output formats.

use anyhow::Result;

use zettel_core::Filter;

use crate::context::Context;

/// List zettels in the vault, optionally filtered by role/tag, in
/// either human-readable or JSON form.
pub fn handle(ctx: &Context, json: bool, role: Option<String>, tag: Option<String>) -> Result<()> {
    let filter = match (role, tag) {
        (None, None) => None,
        (role, tag) => Some(Filter::new(move |meta| {
            let role_ok = role.as_deref().is_none_or(|r| meta.get("role") == Some(r));
            let tag_ok = tag
                .as_deref()
                .is_none_or(|t| meta.get_tag_set("tags").iter().any(|x| x == t));
            role_ok && tag_ok
        })),
    };

    let metas = ctx.place().select_meta(filter.as_ref(), None)?;

    if json {
        let entries: Vec<_> = metas
            .iter()
            .map(|m| {
                serde_json::json!({
                    "zid": m.zid().to_string(),
                    "title": m.title(),
                    "role": m.get("role"),
                    "tags": m.get_tag_set("tags"),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for meta in &metas {
            if meta.title().is_empty() {
                println!("{}", meta.zid());
            } else {
                println!("{}: {}", meta.zid(), meta.title());
            }
        }
    }

    Ok(())
}
