//! Ranking and distribution statistics over predicate profiles.
//!
//! The most expensive predicates are the primary optimization targets;
//! the distribution statistics tell whether evaluation time is spread
//! out or concentrated in a few predicates.

use crate::parser::profile::PredicateProfile;
use log::debug;
use std::cmp::Ordering;

/// Select the top-N most expensive predicates
///
/// **Public** - used by both renderers
///
/// # Arguments
/// * `predicates` - A query's predicate profiles, in completion order
/// * `top_n` - Number of predicates to return
///
/// # Returns
/// References sorted by duration descending. The sort is stable, so
/// predicates with equal durations keep their input order.
pub fn top_predicates(predicates: &[PredicateProfile], top_n: usize) -> Vec<&PredicateProfile> {
    let mut ranked: Vec<&PredicateProfile> = predicates.iter().collect();
    ranked.sort_by(|a, b| {
        b.duration_ms
            .partial_cmp(&a.duration_ms)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(top_n);
    ranked
}

/// Duration distribution statistics
///
/// **Public** - returned from calculate_duration_distribution
#[derive(Debug, Clone, Default)]
pub struct DurationDistribution {
    /// Total milliseconds across all predicates
    pub total_ms: f64,

    /// Number of predicates
    pub predicate_count: usize,

    /// Mean milliseconds per predicate
    pub mean_ms: f64,

    /// Median milliseconds per predicate
    pub median_ms: f64,

    /// Milliseconds consumed by the top 10% of predicates
    pub top_decile_ms: f64,

    /// Percentage of total time in the top 10%
    pub top_decile_percentage: f64,
}

/// Calculate duration distribution statistics
///
/// **Public** - provides summary statistics for logging and the text
/// summary
pub fn calculate_duration_distribution(predicates: &[PredicateProfile]) -> DurationDistribution {
    if predicates.is_empty() {
        return DurationDistribution::default();
    }

    let mut durations: Vec<f64> = predicates.iter().map(|p| p.duration_ms).collect();
    durations.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let total: f64 = durations.iter().sum();
    let count = durations.len();
    let mean = total / count as f64;
    let median = durations[count / 2];

    let top_decile_count = ((count as f64) * 0.1).ceil() as usize;
    let top_decile: f64 = durations.iter().rev().take(top_decile_count).sum();

    debug!(
        "Duration distribution over {} predicates: total {:.2}ms",
        count, total
    );

    DurationDistribution {
        total_ms: total,
        predicate_count: count,
        mean_ms: mean,
        median_ms: median,
        top_decile_ms: top_decile,
        top_decile_percentage: if total > 0.0 {
            (top_decile / total) * 100.0
        } else {
            0.0
        },
    }
}

impl DurationDistribution {
    /// Check whether evaluation time is highly concentrated
    ///
    /// **Public** - returns true if the top 10% of predicates consume
    /// more than 80% of the time
    pub fn is_highly_concentrated(&self) -> bool {
        self.top_decile_percentage > 80.0
    }

    /// Get human-readable summary
    ///
    /// **Public** - for logging
    pub fn summary(&self) -> String {
        format!(
            "Total: {:.2}ms | Predicates: {} | Mean: {:.2}ms | Median: {:.2}ms | Top 10%: {:.1}%",
            self.total_ms, self.predicate_count, self.mean_ms, self.median_ms,
            self.top_decile_percentage
        )
    }
}
