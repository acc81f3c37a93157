//! Typed record schemas for the two evaluator log formats.
//!
//! Raw events always tag themselves with a `type` discriminator, so the
//! event-stream schema is a closed, internally tagged enum: each handler
//! in the correlator becomes an exhaustive match arm. Summary records
//! never carry a discriminator; they are a single struct of optional
//! fields whose presence drives the aggregation rules.

use crate::parser::profile::LogFormat;
use serde::Deserialize;
use serde_json::Value;

/// One record from the raw (event-stream) evaluator log
///
/// Unknown JSON fields are ignored. A record whose `type` is not one of
/// the documented kinds, or whose required fields are missing, fails to
/// convert and is skipped by the correlator.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum RawEvent {
    /// First record of the log; carries the engine version
    #[serde(rename = "LOG_HEADER", rename_all = "camelCase")]
    LogHeader { codeql_version: Option<String> },

    /// A query began evaluating
    #[serde(rename = "QUERY_STARTED", rename_all = "camelCase")]
    QueryStarted {
        event_id: u64,
        query_name: Option<String>,
        nano_time: u64,
    },

    /// A query finished; references its start event
    #[serde(rename = "QUERY_COMPLETED", rename_all = "camelCase")]
    QueryCompleted { start_event: u64, nano_time: u64 },

    /// A predicate began evaluating
    #[serde(rename = "PREDICATE_STARTED", rename_all = "camelCase")]
    PredicateStarted {
        event_id: u64,
        predicate_name: Option<String>,
        predicate_type: Option<String>,
        position: Option<String>,
        /// Dependency name -> RA hash, in declared order
        dependencies: Option<serde_json::Map<String, Value>>,
        /// Event id of the owning query's start event
        query_causing_work: Option<u64>,
        nano_time: u64,
    },

    /// One evaluation pass of a predicate began
    #[serde(rename = "PIPELINE_STARTED", rename_all = "camelCase")]
    PipelineStarted {
        event_id: u64,
        predicate_start_event: u64,
    },

    /// One evaluation pass finished; references its pipeline start
    #[serde(rename = "PIPELINE_COMPLETED", rename_all = "camelCase")]
    PipelineCompleted { start_event: u64 },

    /// A predicate finished; references its start event
    #[serde(rename = "PREDICATE_COMPLETED", rename_all = "camelCase")]
    PredicateCompleted {
        start_event: u64,
        nano_time: u64,
        result_size: Option<u64>,
    },

    /// The evaluator consulted its predicate cache
    #[serde(rename = "CACHE_LOOKUP", rename_all = "camelCase")]
    CacheLookup { query_causing_work: Option<u64> },

    /// Marks the end of the log; no profile effect
    #[serde(rename = "LOG_FOOTER")]
    LogFooter {},
}

/// One record from the summary evaluator log
///
/// The header carries `summaryLogVersion`; predicate entries carry
/// `millis` and a string `queryCausingWork`. All fields are optional so
/// that control records deserialize cleanly and are filtered by the
/// aggregation rules instead of failing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecord {
    /// Present only on the header record; the value's type varies across
    /// engine versions, so only its presence is inspected
    pub summary_log_version: Option<Value>,
    pub codeql_version: Option<String>,
    pub predicate_name: Option<String>,
    pub position: Option<String>,
    /// Duration in milliseconds, already aggregated by the engine
    pub millis: Option<f64>,
    pub evaluation_strategy: Option<String>,
    /// Owning query as a display name, unlike the raw format's event id
    pub query_causing_work: Option<String>,
    /// Dependency name -> RA hash, in declared order
    pub dependencies: Option<serde_json::Map<String, Value>>,
    pub pipeline_runs: Option<u64>,
    pub result_size: Option<u64>,
    pub is_cached: Option<bool>,
}

/// Auto-detect which log schema a decoded record belongs to
///
/// **Public** - called on the first decoded record only; later records
/// are assumed to share the same schema.
///
/// Raw events always carry a string-typed `type` field. Summary records
/// never do; their header instead carries `summaryLogVersion`.
pub fn detect_log_format(first_record: &Value) -> LogFormat {
    if first_record.get("type").map(Value::is_string).unwrap_or(false) {
        LogFormat::Raw
    } else {
        LogFormat::Summary
    }
}

/// Extract dependency names from a name -> hash map, in declared order
pub fn dependency_names(dependencies: &Option<serde_json::Map<String, Value>>) -> Vec<String> {
    dependencies
        .as_ref()
        .map(|deps| deps.keys().cloned().collect())
        .unwrap_or_default()
}
