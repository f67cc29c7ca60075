//! Command-line interface for the `egvr` application.

use std::path::PathBuf;

use clap::Parser;

/// Command-line interface definition
#[derive(Debug, Parser)]
#[command(name = "egvr")]
#[command(about = "ElectionGuard election record verifier")]
pub struct Cli {
    /// Cli subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Cli subcommands
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Verify an election record and print one line per predicate.
    ///
    /// Exits 0 when every predicate passes and 1 when any fails;
    /// unreadable or malformed record files are reported as errors.
    #[command(verbatim_doc_comment)]
    Verify {
        /// Path to the election record JSON file
        #[arg(env = "EGVR_RECORD_FILE")]
        record_file: PathBuf,
    },
    /// Print the JSON schema of the election record format
    Schema,
}
