//! Output JSON schema definitions for profile data.
//!
//! This module defines the structure of the profile JSON we write to disk.
//! Field names are camelCase so the artifact matches the evaluator's own
//! naming in the logs.

use serde::{Deserialize, Serialize};

/// Which of the two evaluator log schemas a file was parsed as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Event-stream schema: records tagged with a `type` discriminator,
    /// linked by numeric event ids and nanosecond timestamps
    Raw,
    /// Pre-aggregated schema: records already carry millisecond durations
    /// and a string query-name reference
    Summary,
}

impl LogFormat {
    /// The lowercase tag used in serialized profiles and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Raw => "raw",
            LogFormat::Summary => "summary",
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Performance profile for a single evaluated predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredicateProfile {
    /// Predicate display name
    pub predicate_name: String,

    /// Source location descriptor, if the log carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    /// Evaluation time in milliseconds
    pub duration_ms: f64,

    /// Number of tuples the predicate produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_size: Option<u64>,

    /// Number of pipeline invocations observed for this predicate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_count: Option<u64>,

    /// Engine-reported evaluation strategy/category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation_strategy: Option<String>,

    /// Names of predicates this one depends on, in declared order.
    /// Duplicates are not removed.
    pub dependencies: Vec<String>,
}

/// Performance profile for a single query within a log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryProfile {
    /// Query display name (usually a .ql path)
    pub query_name: String,

    /// Wall time from start/complete pairing when available, else the sum
    /// of predicate durations
    pub total_duration_ms: f64,

    /// Number of predicates attributed to this query
    pub predicate_count: usize,

    /// Per-predicate profiles, in completion order
    pub predicates: Vec<PredicateProfile>,

    /// Number of evaluator cache hits attributed to this query
    pub cache_hits: u64,
}

/// Top-level result of parsing one evaluator log file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    /// CodeQL version reported by the log header, if present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codeql_version: Option<String>,

    /// Which schema the log was parsed as
    pub log_format: LogFormat,

    /// Per-query profiles, in first-seen order
    pub queries: Vec<QueryProfile>,

    /// Count of successfully decoded records, whether or not they
    /// contributed to a profile
    pub total_events: usize,
}

impl ProfileData {
    /// The well-formed result for a log with zero decodable records.
    ///
    /// Raw is the declared format tag for the impossible-to-classify
    /// empty case.
    pub fn empty() -> Self {
        Self {
            codeql_version: None,
            log_format: LogFormat::Raw,
            queries: Vec::new(),
            total_events: 0,
        }
    }
}
