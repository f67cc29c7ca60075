//! EGVR CLI Application

mod cli;

use std::fs::File;
use std::io::BufReader;

use clap::Parser as _;
use cli::{Cli, Commands};
use eyre::Context as _;
use egvr_record::{Record, record_schema_json};
use egvr_verifier::{LogRecorder, Recorder as _, Verifier};

fn init_tracing() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize tracing: {:?}", e))?;
    Ok(())
}

#[allow(
    clippy::print_stdout,
    reason = "The audit trail and schema are the command's output"
)]
fn main() -> eyre::Result<()> {
    init_tracing()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Verify { record_file } => {
            let file = File::open(&record_file)
                .with_context(|| format!("Failed to open record file {}", record_file.display()))?;
            let record = Record::from_json_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse record file {}", record_file.display()))?;

            let mut recorder = LogRecorder::new();
            Verifier::new(&record).verify(&mut recorder);

            if !recorder.all_passed() {
                tracing::error!("The election record failed verification");
                std::process::exit(1);
            }
            tracing::info!("The election record verified successfully");
        }
        Commands::Schema => {
            println!("{}", record_schema_json());
        }
    }

    Ok(())
}
