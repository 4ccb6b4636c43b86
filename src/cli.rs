//! CLI argument parsing for the checklist editor.
//!
//! The CLI stays thin: it resolves the catalog and output locations, then
//! hands control to the editor or the catalog printer without embedding any
//! form logic of its own.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "saudit",
    version,
    about = "On-site inspection checklist editor",
    after_help = "Commands:\n  fill [--catalog <file>] [--out <file>]  Fill a checklist interactively\n  catalog [--file <file>] [--json]        Print the catalog that seeds a session\n\nExamples:\n  saudit fill --out report.json\n  saudit fill --catalog plant-b.json\n  saudit catalog --json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Fill(FillArgs),
    Catalog(CatalogArgs),
}

/// Interactive editor inputs.
#[derive(Parser, Debug)]
#[command(about = "Fill a checklist interactively and write the report on submit")]
pub struct FillArgs {
    /// Catalog JSON overriding the built-in section/item definitions
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Output path for the report artifact written on submit
    #[arg(long, value_name = "PATH", default_value = "inspection-report.json")]
    pub out: PathBuf,
}

/// Catalog printing inputs.
#[derive(Parser, Debug)]
#[command(about = "Print the catalog that would seed a session")]
pub struct CatalogArgs {
    /// Catalog JSON overriding the built-in section/item definitions
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Emit machine-readable JSON
    #[arg(long)]
    pub json: bool,
}
