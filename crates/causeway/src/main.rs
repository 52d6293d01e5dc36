use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "causeway",
    version,
    about = "Causal-relation extraction over annotated document trees"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract causal statements from one or more annotated documents
    Extract {
        /// Input document files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
        /// Write output to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Parse a document and report its relation match counts
    Inspect {
        /// Input document file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            files,
            pretty,
            output,
        } => commands::extract::run(&files, pretty, output.as_deref()),
        Commands::Inspect { file } => commands::inspect::run(&file),
    }
}
