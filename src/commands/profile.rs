//! Profile command implementation.
//!
//! The profile command:
//! 1. Parses the evaluator log (format auto-detected)
//! 2. Writes the JSON profile artifact
//! 3. Writes the Mermaid diagram artifact
//! 4. Prints a text summary

use crate::metrics::calculate_duration_distribution;
use crate::output::{write_diagram, write_profile};
use crate::parser::parse_evaluator_log;
use crate::render::{render_mermaid, render_text_summary};
use crate::utils::config::{
    DEFAULT_TOP_N, MAX_TOP_N, PROFILE_DIAGRAM_FILENAME, PROFILE_JSON_FILENAME,
};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the profile command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ProfileArgs {
    /// Path to the evaluator log
    pub log_path: PathBuf,

    /// Directory for output artifacts (defaults to the log's directory)
    pub output_dir: Option<PathBuf>,

    /// Number of most expensive predicates to highlight
    pub top_n: usize,
}

impl Default for ProfileArgs {
    fn default() -> Self {
        Self {
            log_path: PathBuf::new(),
            output_dir: None,
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Validate profile arguments
///
/// **Public** - can be called before execute_profile for early validation
pub fn validate_args(args: &ProfileArgs) -> Result<()> {
    if args.log_path.as_os_str().is_empty() {
        anyhow::bail!("Evaluator log path cannot be empty");
    }

    if args.top_n == 0 {
        anyhow::bail!("top-n must be greater than 0");
    }

    if args.top_n > MAX_TOP_N {
        anyhow::bail!("top-n is too large (max {})", MAX_TOP_N);
    }

    Ok(())
}

/// Execute the profile command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Profile command arguments
///
/// # Returns
/// Ok if profiling succeeds, Err with context if any step fails
///
/// # Errors
/// * Evaluator log missing or unreadable
/// * File write errors
pub fn execute_profile(args: ProfileArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Profiling evaluator log: {}", args.log_path.display());

    // Step 1: Parse the log (fails fast if the file is missing; every
    // other malformation degrades to a partial profile)
    info!("Step 1/4: Parsing evaluator log...");
    let profile = parse_evaluator_log(&args.log_path).context("Failed to parse evaluator log")?;

    debug!(
        "Parsed profile: format {}, {} queries, {} events",
        profile.log_format,
        profile.queries.len(),
        profile.total_events
    );

    for query in &profile.queries {
        let distribution = calculate_duration_distribution(&query.predicates);
        info!(
            "{}: {}",
            query.query_name,
            distribution.summary()
        );
    }

    // Step 2: Resolve output directory
    info!("Step 2/4: Resolving output directory...");
    let output_dir = resolve_output_dir(&args);
    std::fs::create_dir_all(&output_dir).with_context(|| {
        format!("Failed to create output directory {}", output_dir.display())
    })?;

    // Step 3: Write JSON profile
    info!("Step 3/4: Writing JSON profile...");
    let json_path = output_dir.join(PROFILE_JSON_FILENAME);
    write_profile(&profile, &json_path).context("Failed to write profile JSON")?;

    info!("✓ Profile written to: {}", json_path.display());

    // Step 4: Write Mermaid diagram
    info!("Step 4/4: Writing Mermaid diagram...");
    let diagram = render_mermaid(&profile, args.top_n);
    let diagram_path = output_dir.join(PROFILE_DIAGRAM_FILENAME);
    write_diagram(&diagram, &diagram_path).context("Failed to write Mermaid diagram")?;

    info!("✓ Diagram written to: {}", diagram_path.display());

    // Text summary is the command's primary human-readable response
    let output_files = vec![
        format!("Profile JSON: {}", json_path.display()),
        format!("Profile Mermaid: {}", diagram_path.display()),
        format!("Evaluator Log: {}", args.log_path.display()),
    ];
    println!("{}", render_text_summary(&profile, args.top_n, &output_files));

    let elapsed = start_time.elapsed();
    info!("Profiling completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Output directory: explicit argument, else the log's own directory
///
/// **Private** - internal helper for execute_profile
fn resolve_output_dir(args: &ProfileArgs) -> PathBuf {
    match &args.output_dir {
        Some(dir) => dir.clone(),
        None => args
            .log_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}
