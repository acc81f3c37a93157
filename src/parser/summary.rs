//! Aggregator for the summary evaluator log format.
//!
//! Summary records are already aggregated by the engine: each predicate
//! entry carries a millisecond duration and names its owning query as a
//! string. There is no start/complete pairing; the aggregator groups
//! entries by query name, sums durations, and counts cache hits.

use crate::parser::event::{dependency_names, SummaryRecord};
use crate::parser::profile::{LogFormat, PredicateProfile, ProfileData, QueryProfile};
use crate::utils::config::{CACHE_HIT_STRATEGY, SENTINEL_EMPTY_STRATEGY};
use log::debug;
use serde_json::Value;
use std::collections::HashMap;

/// Running aggregate for one query, one per distinct queryCausingWork
struct QueryBucket {
    name: String,
    predicates: Vec<PredicateProfile>,
    total_ms: f64,
    cache_hits: u64,
}

/// Parse a decoded record sequence as a summary evaluator log
///
/// **Public** - dispatched to by the auto-detect entry point
///
/// # Arguments
/// * `records` - All successfully decoded records, in file order
///
/// # Returns
/// `ProfileData` tagged `summary`, with one `QueryProfile` per distinct
/// owning-query name in first-seen order. Query totals are the running
/// sum of predicate millis; in this format they are not computed any
/// other way.
pub fn parse_summary_log(records: &[Value]) -> ProfileData {
    let mut codeql_version: Option<String> = None;
    let mut buckets: Vec<QueryBucket> = Vec::new();
    let mut bucket_index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let Ok(entry) = serde_json::from_value::<SummaryRecord>(record.clone()) else {
            debug!("Record did not match the summary schema, ignoring");
            continue;
        };

        // Header record: capture the engine version and move on.
        if entry.summary_log_version.is_some() {
            codeql_version = entry.codeql_version;
            continue;
        }

        // Sentinel entries carry no timing signal.
        if entry.evaluation_strategy.as_deref() == Some(SENTINEL_EMPTY_STRATEGY) {
            continue;
        }

        // Records without millis are non-predicate control records.
        let Some(millis) = entry.millis else {
            continue;
        };

        let query_name = entry
            .query_causing_work
            .unwrap_or_else(|| "unknown".to_string());

        let is_cache_hit = entry.is_cached == Some(true)
            || entry.evaluation_strategy.as_deref() == Some(CACHE_HIT_STRATEGY);

        let profile = PredicateProfile {
            predicate_name: entry
                .predicate_name
                .unwrap_or_else(|| "unknown".to_string()),
            position: entry.position,
            // Verbatim: summary durations are already in milliseconds
            duration_ms: millis,
            result_size: entry.result_size,
            pipeline_count: entry.pipeline_runs,
            evaluation_strategy: entry.evaluation_strategy,
            dependencies: dependency_names(&entry.dependencies),
        };

        let idx = match bucket_index.get(&query_name) {
            Some(&idx) => idx,
            None => {
                bucket_index.insert(query_name.clone(), buckets.len());
                buckets.push(QueryBucket {
                    name: query_name,
                    predicates: Vec::new(),
                    total_ms: 0.0,
                    cache_hits: 0,
                });
                buckets.len() - 1
            }
        };

        let bucket = &mut buckets[idx];
        if is_cache_hit {
            bucket.cache_hits += 1;
        }
        bucket.total_ms += millis;
        bucket.predicates.push(profile);
    }

    debug!(
        "Aggregated {} queries from {} summary records",
        buckets.len(),
        records.len()
    );

    let queries = buckets
        .into_iter()
        .map(|bucket| QueryProfile {
            query_name: bucket.name,
            total_duration_ms: bucket.total_ms,
            predicate_count: bucket.predicates.len(),
            predicates: bucket.predicates,
            cache_hits: bucket.cache_hits,
        })
        .collect();

    ProfileData {
        codeql_version,
        log_format: LogFormat::Summary,
        queries,
        total_events: records.len(),
    }
}
