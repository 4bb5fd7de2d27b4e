use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum ResolveCommands {
    /// Show duplicate groups with per-member activity scores
    List,

    /// Change a user's email address (fails if already taken)
    UpdateEmail {
        /// User ID
        id: i64,

        /// New email address
        email: String,
    },

    /// Reassign one account's records to another, then delete it
    MergeUsers {
        /// Source user ID (will be deleted)
        source: i64,

        /// Target user ID (receives the records)
        target: i64,
    },

    /// Emit a contact sheet for accounts blocking the migration
    ContactUsers {
        /// Write to FILE instead of stdout
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}
