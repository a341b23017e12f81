// crates/zettel-cli/src/main.rs - CLI Application Entry Point
//
// This is the main entry point for the zettel CLI tool. It implements a Unix-style command structure
// where each subcommand does one thing well and can be composed with other tools.
//
// ARCHITECTURE OVERVIEW:
// ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────────┐
// │   User Input    │───▶│   CLI Parser     │───▶│  Command Handlers   │
// │ (clap commands) │    │ (main function)  │    │ (commands/*.rs)     │
// └─────────────────┘    └──────────────────┘    └─────────────────────┘
//                                 │                        │
//                                 ▼                        ▼
//                        ┌──────────────────┐    ┌─────────────────────┐
//                        │     Context      │    │     Services        │
//                        │ (vault + config) │    │ (file I/O, editor)  │
//                        └──────────────────┘    └─────────────────────┘
//
// DESIGN PRINCIPLES:
// - Each command has a single responsibility (Unix philosophy)
// - Commands output machine-readable formats (JSON) for scripting
// - Context is passed explicitly (no global state)
// - Error handling follows Rust patterns (Result<T, E>)

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;

mod cli;
mod commands;
mod context;
mod services;
mod stdin;

use cli::Cli;
use context::Context;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    // init doesn't need an existing vault to build Context from.
    if let cli::Commands::Init { path } = &cli.command {
        return commands::init::handle(path.clone());
    }

    // completions are generated purely from the clap command tree, no vault required.
    if let cli::Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    let ctx = Context::new(cli.vault)?;

    match cli.command {
        cli::Commands::New { title, syntax, role, open } => {
            commands::note::create(&ctx, title, syntax, role, open)
        }
        cli::Commands::Show { zid } => commands::note::show(&ctx, zid),
        cli::Commands::Edit { zid } => commands::note::edit(&ctx, zid),
        cli::Commands::Rm { zid } => commands::note::remove(&ctx, zid),
        cli::Commands::Mv { current, new } => commands::note::rename(&ctx, current, new),
        cli::Commands::List { json, role, tag } => commands::list::handle(&ctx, json, role, tag),
        cli::Commands::Search { query } => commands::search::handle(&ctx, query),
        cli::Commands::Id(cmd) => commands::id::handle(cmd),
        cli::Commands::Template(cmd) => commands::template::handle(&ctx, cmd),
        cli::Commands::Init { .. } | cli::Commands::Completions { .. } => unreachable!(),
    }
}
