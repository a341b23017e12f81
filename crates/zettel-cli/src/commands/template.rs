// crates/zettel-cli/src/commands/template.rs - New-Zettel Template Commands
//
// The storage core's template.rs only exposes pure placeholder
// substitution; the actual template text lives in the constant place's
// builtin new-zettel zettel (Zid 00000000000027). These commands just
// fetch that content and apply the substitution.

use anyhow::Result;

use zettel_core::{template, Zid};

use crate::cli::TemplateCommands;
use crate::context::Context;

const NEW_ZETTEL_TEMPLATE_ZID: &str = "00000000000027";

pub fn handle(ctx: &Context, cmd: TemplateCommands) -> Result<()> {
    match cmd {
        TemplateCommands::Show => handle_show(ctx),
        TemplateCommands::Render { title } => handle_render(ctx, title),
    }
}

fn template_content(ctx: &Context) -> Result<String> {
    let zid = Zid::parse(NEW_ZETTEL_TEMPLATE_ZID).expect("builtin template Zid is well-formed");
    let zettel = ctx.place().get_zettel(zid)?;
    Ok(zettel.content.as_str_lossy().into_owned())
}

fn handle_show(ctx: &Context) -> Result<()> {
    print!("{}", template_content(ctx)?);
    Ok(())
}

fn handle_render(ctx: &Context, title: String) -> Result<()> {
    let content = template_content(ctx)?;
    print!("{}", template::render(&content, &title));
    Ok(())
}
