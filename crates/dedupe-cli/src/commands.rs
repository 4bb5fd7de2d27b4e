use crate::resolve_commands::ResolveCommands;

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Read-only duplicate email report
    Analyze {
        /// Show each group member, not just the summary line
        #[arg(long)]
        detailed: bool,

        /// Include activity columns and firing thresholds
        #[arg(long)]
        show_activity: bool,

        /// Only show groups with a high-activity account marked for deletion
        #[arg(long)]
        high_activity_only: bool,

        /// Write the detailed rows as CSV to this file
        #[arg(long, value_name = "FILE")]
        export_csv: Option<PathBuf>,
    },

    /// Remediation actions to clear safety-gate blocks
    Resolve {
        #[command(subcommand)]
        action: ResolveCommands,
    },

    /// Apply the safe migration and install the unique email index
    Migrate {
        /// Report what would be deleted without changing anything
        #[arg(long)]
        dry_run: bool,
    },
}
