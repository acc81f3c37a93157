use crate::output::read_profile;
use anyhow::Result;
use std::path::PathBuf;

/// Validate a previously written profile JSON file
pub fn validate_profile_file(file_path: PathBuf) -> Result<()> {
    println!("Validating profile: {}", file_path.display());

    let profile = read_profile(&file_path)?;

    println!("✓ Valid profile JSON");
    println!("  Log Format: {}", profile.log_format);
    if let Some(version) = &profile.codeql_version {
        println!("  CodeQL Version: {}", version);
    }
    println!("  Total Events: {}", profile.total_events);
    println!("  Queries: {}", profile.queries.len());
    for query in &profile.queries {
        println!(
            "    {} ({:.2} ms, {} predicates)",
            query.query_name, query.total_duration_ms, query.predicate_count
        );
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("qlprof Profile Schema");
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  codeqlVersion: string?   - Engine version from the log header");
        println!("  logFormat: string        - 'raw' or 'summary'");
        println!("  totalEvents: number      - Successfully decoded records");
        println!("  queries: array           - One entry per query, in first-seen order");
        println!("    queryName: string      - Query display name");
        println!("    totalDurationMs: number - Wall time or predicate-duration sum");
        println!("    predicateCount: number - Number of predicates attributed");
        println!("    cacheHits: number      - Evaluator cache hits");
        println!("    predicates: array      - Per-predicate profiles");
        println!("      predicateName: string    - Predicate display name");
        println!("      position: string?        - Source location descriptor");
        println!("      durationMs: number       - Evaluation time in ms");
        println!("      resultSize: number?      - Tuples produced");
        println!("      pipelineCount: number?   - Evaluation passes observed");
        println!("      evaluationStrategy: string? - Engine-reported strategy");
        println!("      dependencies: array      - Predicate names, declared order");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("qlprof v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Performance profiling and dependency diagrams for CodeQL evaluator logs.");
}
