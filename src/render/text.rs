//! Plain-text profile summary.
//!
//! The at-a-glance rendering printed after a profile run: output files,
//! log format, engine version, event count, and a per-query breakdown
//! with the ranked most expensive predicates.

use crate::metrics::{calculate_duration_distribution, top_predicates};
use crate::parser::profile::ProfileData;
use std::path::Path;

/// Render the profile as a human-readable text summary
///
/// **Public** - printed to stdout by the profile command
///
/// # Arguments
/// * `profile` - Parsed profile data
/// * `top_n` - Number of most expensive predicates to list per query
/// * `output_files` - Descriptions of the artifacts that were written
pub fn render_text_summary(profile: &ProfileData, top_n: usize, output_files: &[String]) -> String {
    let mut sections: Vec<String> = Vec::new();

    sections.push("Query log profiling completed successfully!".to_string());
    sections.push(String::new());
    sections.push("Output Files:".to_string());
    for file in output_files {
        sections.push(format!("  - {}", file));
    }

    sections.push(String::new());
    sections.push(format!("Log Format: {}", profile.log_format));
    if let Some(version) = &profile.codeql_version {
        sections.push(format!("CodeQL Version: {}", version));
    }
    sections.push(format!("Total Events: {}", profile.total_events));
    sections.push(format!("Queries: {}", profile.queries.len()));

    for query in &profile.queries {
        sections.push(String::new());
        sections.push(format!("--- {} ---", base_name(&query.query_name)));
        sections.push(format!(
            "  Total Duration: {:.2} ms",
            query.total_duration_ms
        ));
        sections.push(format!("  Predicates Evaluated: {}", query.predicate_count));
        sections.push(format!("  Cache Hits: {}", query.cache_hits));

        let distribution = calculate_duration_distribution(&query.predicates);
        if distribution.is_highly_concentrated() {
            sections.push(format!(
                "  Note: top 10% of predicates account for {:.1}% of evaluation time",
                distribution.top_decile_percentage
            ));
        }

        let top = top_predicates(&query.predicates, top_n);
        if !top.is_empty() {
            sections.push(format!("  Top {} Most Expensive Predicates:", top.len()));
            for (idx, pred) in top.iter().enumerate() {
                let size_str = pred
                    .result_size
                    .map(|s| format!(", {} results", s))
                    .unwrap_or_default();
                sections.push(format!(
                    "    {}. {} ({:.2} ms{})",
                    idx + 1,
                    pred.predicate_name,
                    pred.duration_ms,
                    size_str
                ));
            }
        }
    }

    sections.join("\n")
}

fn base_name(query_name: &str) -> String {
    Path::new(query_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| query_name.to_string())
}
