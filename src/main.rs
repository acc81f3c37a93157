//! qlprof CLI
//!
//! A performance profiling tool for CodeQL evaluator logs.
//! Generates JSON profiles and Mermaid dependency diagrams without
//! re-running the query.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use qlprof::commands::{
    display_schema, display_version, execute_profile, validate_args, validate_profile_file,
    ProfileArgs,
};
use qlprof::utils::config::DEFAULT_TOP_N;

/// qlprof - Performance profiling for CodeQL evaluator logs
#[derive(Parser, Debug)]
#[command(name = "qlprof")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse an evaluator log into a performance profile
    Profile {
        /// Path to evaluator-log.jsonl or evaluator-log.summary.jsonl
        #[arg(short, long)]
        log: PathBuf,

        /// Directory for output artifacts (defaults to the log's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Number of most expensive predicates to highlight
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
    },

    /// Validate a profile JSON file
    Validate {
        /// Path to profile JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Profile {
            log,
            output_dir,
            top_n,
        } => {
            let args = ProfileArgs {
                log_path: log,
                output_dir,
                top_n,
            };

            // Validate args first
            validate_args(&args)?;

            // Execute profiling
            execute_profile(args)?;
        }

        Commands::Validate { file } => {
            validate_profile_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
