use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

mod catalog;
mod cli;
mod editor;
mod form;
mod preview;
mod report;

use cli::{CatalogArgs, Command, FillArgs, RootArgs};

fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the TUI or with
    // machine-readable stdout output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = RootArgs::parse();
    match args.command {
        Command::Fill(args) => cmd_fill(args),
        Command::Catalog(args) => cmd_catalog(args),
    }
}

fn resolve_catalog(path: Option<&Path>) -> Result<catalog::Catalog> {
    match path {
        Some(path) => catalog::Catalog::load(path),
        None => Ok(catalog::default_catalog()),
    }
}

fn cmd_fill(args: FillArgs) -> Result<()> {
    let catalog = resolve_catalog(args.catalog.as_deref())?;
    tracing::info!(out = %args.out.display(), "starting inspection session");
    editor::run(&catalog, &args.out)
}

fn cmd_catalog(args: CatalogArgs) -> Result<()> {
    let catalog = resolve_catalog(args.file.as_deref())?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }
    for section in &catalog.sections {
        println!("{}", section.title);
        for item in &section.items {
            let suffix = if item.repeatable { " (repeatable)" } else { "" };
            println!("  {}  {}{}", item.id, item.label, suffix);
        }
    }
    Ok(())
}
