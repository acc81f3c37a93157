//! Mermaid dependency diagram generation.
//!
//! Renders a profile as a `graph TD` document: a single query gets one
//! root node with its top-N predicates as children; a multi-query log
//! gets an umbrella root with one sub-tree per query.

use crate::metrics::top_predicates;
use crate::parser::profile::{PredicateProfile, ProfileData};
use crate::utils::config::MAX_LABEL_CHARS;
use log::debug;
use std::path::Path;

/// Render a profile as a Mermaid diagram document
///
/// **Public** - produces the `.md` artifact content
///
/// # Arguments
/// * `profile` - Parsed profile data
/// * `top_n` - Number of most expensive predicates to show per query
pub fn render_mermaid(profile: &ProfileData, top_n: usize) -> String {
    debug!(
        "Rendering Mermaid diagram for {} queries, top {}",
        profile.queries.len(),
        top_n
    );

    let mut lines: Vec<String> = Vec::new();

    lines.push("```mermaid".to_string());
    lines.push("graph TD".to_string());
    lines.push(String::new());

    if profile.queries.len() <= 1 {
        render_single_query(profile, top_n, &mut lines);
    } else {
        render_multi_query(profile, top_n, &mut lines);
    }

    lines.push(String::new());
    lines.push("  classDef default fill:#e1f5ff,stroke:#333,stroke-width:2px".to_string());
    lines.push("  classDef query fill:#ffe1e1,stroke:#333,stroke-width:3px".to_string());
    lines.push("  class QUERY query".to_string());
    lines.push("```".to_string());

    lines.join("\n")
}

/// Single query layout: one QUERY root, one child per top-N predicate
fn render_single_query(profile: &ProfileData, top_n: usize, lines: &mut Vec<String>) {
    let (name, total_ms, predicate_count, predicates): (&str, f64, usize, &[PredicateProfile]) =
        match profile.queries.first() {
            Some(q) => (
                &q.query_name,
                q.total_duration_ms,
                q.predicate_count,
                &q.predicates,
            ),
            None => ("unknown", 0.0, 0, &[]),
        };

    lines.push(format!(
        "  QUERY[\"{}<br/>Total: {:.2}ms<br/>Predicates: {}\"]",
        sanitize_label(&base_name(name)),
        total_ms,
        predicate_count
    ));
    lines.push(String::new());

    let top = top_predicates(predicates, top_n);
    for (idx, pred) in top.iter().enumerate() {
        lines.push(format!("  P{}[\"{}\"]", idx, predicate_label(pred)));
    }

    lines.push(String::new());

    for idx in 0..top.len() {
        lines.push(format!("  QUERY --> P{}", idx));
    }
}

/// Multi query layout: umbrella ROOT, one sub-tree per query
fn render_multi_query(profile: &ProfileData, top_n: usize, lines: &mut Vec<String>) {
    lines.push(format!(
        "  ROOT[\"Evaluation Log<br/>{} queries\"]",
        profile.queries.len()
    ));
    lines.push(String::new());

    for (q_idx, query) in profile.queries.iter().enumerate() {
        lines.push(format!(
            "  Q{}[\"{}<br/>{:.2}ms<br/>Predicates: {}\"]",
            q_idx,
            sanitize_label(&base_name(&query.query_name)),
            query.total_duration_ms,
            query.predicate_count
        ));
        lines.push(format!("  ROOT --> Q{}", q_idx));

        let top = top_predicates(&query.predicates, top_n);
        for (p_idx, pred) in top.iter().enumerate() {
            lines.push(format!("  Q{}P{}[\"{}\"]", q_idx, p_idx, predicate_label(pred)));
            lines.push(format!("  Q{} --> Q{}P{}", q_idx, q_idx, p_idx));
        }
        lines.push(String::new());
    }
}

/// Build a predicate node label: name, duration, result size
fn predicate_label(pred: &PredicateProfile) -> String {
    let name: String = sanitize_label(&pred.predicate_name)
        .chars()
        .take(MAX_LABEL_CHARS)
        .collect();
    let size = pred
        .result_size
        .map(|s| s.to_string())
        .unwrap_or_else(|| "?".to_string());
    format!("{}<br/>{:.2}ms | {} results", name, pred.duration_ms, size)
}

/// Strip characters Mermaid reserves for its own markup
fn sanitize_label(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '<' | '>' | '"')).collect()
}

/// Base file name of a query path, for compact node labels
fn base_name(query_name: &str) -> String {
    Path::new(query_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| query_name.to_string())
}
