//! Herald CLI
//!
//! Command-line entry point for Herald sync runs.
//!
//! # Commands
//!
//! - `run` - Execute one sync run (or preview it with `--dry-run`)
//! - `status` - Display state-store contents
//! - `version` - Show version information
//!
//! The invoking scheduler reads the exit code: 0 for a completed run (even
//! with per-item failures), 1 for a run-level fatal failure.

mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Herald release-announcement sync tools.
#[derive(Parser)]
#[command(name = "herald")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one sync run
    Run {
        /// Fetch, filter, and dedupe, but publish nothing
        #[arg(short, long)]
        dry_run: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "json")]
        format: String,
    },

    /// Display state-store contents
    Status {
        /// Maximum number of records to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run { dry_run, format } => commands::run::run(dry_run, &format),
        Commands::Status { limit, format } => commands::status::run(limit, &format),
        Commands::Version => {
            println!("Herald v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
