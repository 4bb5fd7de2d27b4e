use crate::commands::Commands;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "dedupe")]
#[command(about = "Duplicate account email analysis and safe cleanup")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Database file (overrides the configured path)
    #[arg(long, global = true)]
    pub(crate) database: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(long, global = true)]
    pub(crate) quiet: bool,
}
