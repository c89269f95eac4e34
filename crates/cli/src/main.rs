// quorum CLI - reconcile crowd-sourced transcriptions from the shell

mod exit_codes;
mod output;
mod run;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::EXIT_SUCCESS;
use run::{ConfigArgs, RunArgs};

#[derive(Parser)]
#[command(name = "quorum")]
#[command(about = "Reconcile crowd-sourced transcriptions into best values")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile an input file into best values plus explanations
    #[command(after_help = "\
Examples:
  quorum run classifications.csv --column-types 'location:text,habitat:select'
  quorum run classifications.csv --config labels.recon.toml -r reconciled.csv
  quorum run dump.json -f json --user-weights 'aSmith:-50' --json
  quorum run classifications.csv --config labels.recon.toml --output result.json")]
    Run(RunArgs),

    /// Validate configuration without reconciling
    #[command(after_help = "\
Examples:
  quorum validate --config labels.recon.toml
  quorum validate --column-types 'location:text,count:mmr'")]
    Validate {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

/// Error carrying its exit code; `main` prints and maps it.
#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
}

impl CliError {
    pub fn new(code: u8, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quorum_cli=info")),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => run::cmd_run(&args),
        Commands::Validate { config } => run::cmd_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("error: {}", err.message);
            ExitCode::from(err.code)
        }
    }
}
