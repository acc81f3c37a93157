//! Correlator for the raw (event-stream) evaluator log format.
//!
//! Pairs asynchronous started/completed events across queries, predicates
//! and pipelines using the engine-assigned event ids, computes durations
//! from nanosecond timestamps, and groups predicates by the query that
//! caused the work. Correlation is best-effort: a completion referencing
//! an unknown start id is dropped, never an error, so truncated or
//! reordered logs still produce a partial, honest profile.

use crate::parser::event::{dependency_names, RawEvent};
use crate::parser::profile::{LogFormat, PredicateProfile, ProfileData, QueryProfile};
use crate::utils::config::NANOS_PER_MILLI;
use log::debug;
use serde_json::Value;
use std::collections::HashMap;

/// Open query registration, one per QUERY_STARTED
struct QuerySlot {
    name: String,
    start_nano: u64,
    end_nano: Option<u64>,
    predicates: Vec<PredicateProfile>,
    cache_hits: u64,
}

/// Open predicate registration, one per PREDICATE_STARTED
struct PredicateSlot {
    name: String,
    position: Option<String>,
    evaluation_strategy: Option<String>,
    dependencies: Vec<String>,
    query_causing_work: Option<u64>,
    start_nano: u64,
    pipeline_count: u64,
}

/// Single-pass correlation state.
///
/// Arenas keep slots in first-seen order; the index tables map the
/// engine's event ids to arena slots, making the unknown-reference ⇒
/// drop policy an explicit lookup-miss branch.
#[derive(Default)]
struct Correlator {
    codeql_version: Option<String>,
    query_slots: Vec<QuerySlot>,
    query_index: HashMap<u64, usize>,
    predicate_slots: Vec<PredicateSlot>,
    predicate_index: HashMap<u64, usize>,
    /// Pipeline start event id -> owning predicate start event id
    pipeline_owner: HashMap<u64, u64>,
    /// Fallback owner for predicates that omit queryCausingWork
    first_query_id: Option<u64>,
}

/// Parse a decoded record sequence as a raw evaluator log
///
/// **Public** - dispatched to by the auto-detect entry point
///
/// # Arguments
/// * `records` - All successfully decoded records, in file order
///
/// # Returns
/// `ProfileData` tagged `raw`, with one `QueryProfile` per QUERY_STARTED
/// in the order the start records were first seen.
pub fn parse_raw_log(records: &[Value]) -> ProfileData {
    let mut correlator = Correlator::default();

    for record in records {
        // Records that match no known event kind still count toward
        // totalEvents but have no profile effect.
        match serde_json::from_value::<RawEvent>(record.clone()) {
            Ok(event) => correlator.handle(event),
            Err(e) => debug!("Record matched no raw event kind, ignoring: {}", e),
        }
    }

    debug!(
        "Correlated {} queries, {} predicate starts from {} records",
        correlator.query_slots.len(),
        correlator.predicate_slots.len(),
        records.len()
    );

    correlator.finish(records.len())
}

impl Correlator {
    fn handle(&mut self, event: RawEvent) {
        match event {
            RawEvent::LogHeader { codeql_version } => {
                self.codeql_version = codeql_version;
            }

            RawEvent::QueryStarted {
                event_id,
                query_name,
                nano_time,
            } => {
                let slot = QuerySlot {
                    name: query_name.unwrap_or_else(|| "unknown".to_string()),
                    start_nano: nano_time,
                    end_nano: None,
                    predicates: Vec::new(),
                    cache_hits: 0,
                };
                self.query_index.insert(event_id, self.query_slots.len());
                self.query_slots.push(slot);
                if self.first_query_id.is_none() {
                    self.first_query_id = Some(event_id);
                }
            }

            RawEvent::QueryCompleted {
                start_event,
                nano_time,
            } => {
                match self.query_index.get(&start_event) {
                    Some(&idx) => self.query_slots[idx].end_nano = Some(nano_time),
                    None => debug!(
                        "Dropping QUERY_COMPLETED with unknown start event {}",
                        start_event
                    ),
                }
            }

            RawEvent::PredicateStarted {
                event_id,
                predicate_name,
                predicate_type,
                position,
                dependencies,
                query_causing_work,
                nano_time,
            } => {
                let slot = PredicateSlot {
                    name: predicate_name.unwrap_or_else(|| "unknown".to_string()),
                    position,
                    evaluation_strategy: predicate_type,
                    dependencies: dependency_names(&dependencies),
                    query_causing_work,
                    start_nano: nano_time,
                    pipeline_count: 0,
                };
                self.predicate_index
                    .insert(event_id, self.predicate_slots.len());
                self.predicate_slots.push(slot);
            }

            RawEvent::PipelineStarted {
                event_id,
                predicate_start_event,
            } => {
                self.pipeline_owner.insert(event_id, predicate_start_event);
            }

            RawEvent::PipelineCompleted { start_event } => {
                let owner = self
                    .pipeline_owner
                    .get(&start_event)
                    .and_then(|pred_id| self.predicate_index.get(pred_id));
                match owner {
                    Some(&idx) => self.predicate_slots[idx].pipeline_count += 1,
                    None => debug!(
                        "Dropping PIPELINE_COMPLETED with unknown start event {}",
                        start_event
                    ),
                }
            }

            RawEvent::PredicateCompleted {
                start_event,
                nano_time,
                result_size,
            } => {
                self.complete_predicate(start_event, nano_time, result_size);
            }

            RawEvent::CacheLookup { query_causing_work } => {
                let owner = query_causing_work.or(self.first_query_id);
                if let Some(&idx) = owner.and_then(|id| self.query_index.get(&id)) {
                    self.query_slots[idx].cache_hits += 1;
                }
            }

            RawEvent::LogFooter {} => {}
        }
    }

    fn complete_predicate(&mut self, start_event: u64, nano_time: u64, result_size: Option<u64>) {
        let Some(&pred_idx) = self.predicate_index.get(&start_event) else {
            debug!(
                "Dropping PREDICATE_COMPLETED with unknown start event {}",
                start_event
            );
            return;
        };
        let slot = &self.predicate_slots[pred_idx];

        // Timestamps are documented monotonic; saturate rather than go
        // negative if a log violates that.
        let duration_ms = nano_time.saturating_sub(slot.start_nano) as f64 / NANOS_PER_MILLI;

        let profile = PredicateProfile {
            predicate_name: slot.name.clone(),
            position: slot.position.clone(),
            duration_ms,
            result_size,
            pipeline_count: (slot.pipeline_count > 0).then_some(slot.pipeline_count),
            evaluation_strategy: slot.evaluation_strategy.clone(),
            dependencies: slot.dependencies.clone(),
        };

        // Predicates without a recorded owner fall back to the first
        // query seen. Known heuristic carried over from the engine's
        // log consumers, not a guess at corrected intent.
        let owner = slot.query_causing_work.or(self.first_query_id);
        match owner.and_then(|id| self.query_index.get(&id)) {
            Some(&query_idx) => self.query_slots[query_idx].predicates.push(profile),
            None => debug!(
                "Dropping completed predicate '{}' with no resolvable owning query",
                profile.predicate_name
            ),
        }
    }

    fn finish(self, total_events: usize) -> ProfileData {
        let queries = self
            .query_slots
            .into_iter()
            .map(|slot| {
                // Paired start/complete timestamps when available, else
                // the sum of predicate durations. Fallback policy, not
                // an error.
                let total_duration_ms = match slot.end_nano {
                    Some(end) => end.saturating_sub(slot.start_nano) as f64 / NANOS_PER_MILLI,
                    None => slot.predicates.iter().map(|p| p.duration_ms).sum(),
                };

                QueryProfile {
                    query_name: slot.name,
                    total_duration_ms,
                    predicate_count: slot.predicates.len(),
                    predicates: slot.predicates,
                    cache_hits: slot.cache_hits,
                }
            })
            .collect();

        ProfileData {
            codeql_version: self.codeql_version,
            log_format: LogFormat::Raw,
            queries,
            total_events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_predicate_duration_from_nano_diff() {
        let records = vec![
            json!({ "type": "QUERY_STARTED", "eventId": 2, "nanoTime": 200000000u64, "queryName": "Q.ql" }),
            json!({ "type": "PREDICATE_STARTED", "eventId": 3, "nanoTime": 300000000u64,
                    "predicateName": "P#1", "queryCausingWork": 2 }),
            json!({ "type": "PREDICATE_COMPLETED", "eventId": 4, "nanoTime": 350100000u64,
                    "startEvent": 3, "resultSize": 100 }),
        ];

        let profile = parse_raw_log(&records);
        let pred = &profile.queries[0].predicates[0];
        assert!((pred.duration_ms - 50.1).abs() < 0.1);
        assert_eq!(pred.result_size, Some(100));
    }

    #[test]
    fn test_query_duration_from_start_complete_pair() {
        let records = vec![
            json!({ "type": "QUERY_STARTED", "eventId": 2, "nanoTime": 200000000u64, "queryName": "Q.ql" }),
            json!({ "type": "QUERY_COMPLETED", "eventId": 9, "nanoTime": 400000000u64, "startEvent": 2 }),
        ];

        let profile = parse_raw_log(&records);
        assert_eq!(profile.queries[0].total_duration_ms, 200.0);
    }

    #[test]
    fn test_query_duration_falls_back_to_predicate_sum() {
        // No QUERY_COMPLETED: total is the sum of predicate durations.
        let records = vec![
            json!({ "type": "QUERY_STARTED", "eventId": 2, "nanoTime": 0u64, "queryName": "Q.ql" }),
            json!({ "type": "PREDICATE_STARTED", "eventId": 3, "nanoTime": 0u64,
                    "predicateName": "A", "queryCausingWork": 2 }),
            json!({ "type": "PREDICATE_COMPLETED", "eventId": 4, "nanoTime": 10000000u64, "startEvent": 3 }),
            json!({ "type": "PREDICATE_STARTED", "eventId": 5, "nanoTime": 0u64,
                    "predicateName": "B", "queryCausingWork": 2 }),
            json!({ "type": "PREDICATE_COMPLETED", "eventId": 6, "nanoTime": 30000000u64, "startEvent": 5 }),
        ];

        let profile = parse_raw_log(&records);
        assert_eq!(profile.queries[0].total_duration_ms, 40.0);
    }

    #[test]
    fn test_unknown_start_references_dropped() {
        let records = vec![
            json!({ "type": "QUERY_STARTED", "eventId": 2, "nanoTime": 0u64, "queryName": "Q.ql" }),
            json!({ "type": "PREDICATE_COMPLETED", "eventId": 4, "nanoTime": 100u64, "startEvent": 99 }),
            json!({ "type": "PIPELINE_COMPLETED", "eventId": 5, "nanoTime": 100u64, "startEvent": 77 }),
            json!({ "type": "QUERY_COMPLETED", "eventId": 6, "nanoTime": 100u64, "startEvent": 55 }),
        ];

        let profile = parse_raw_log(&records);
        assert_eq!(profile.queries.len(), 1);
        assert_eq!(profile.queries[0].predicates.len(), 0);
        assert_eq!(profile.total_events, 4);
    }

    #[test]
    fn test_ownerless_predicate_attributed_to_first_query() {
        let records = vec![
            json!({ "type": "QUERY_STARTED", "eventId": 1, "nanoTime": 0u64, "queryName": "First.ql" }),
            json!({ "type": "QUERY_STARTED", "eventId": 2, "nanoTime": 0u64, "queryName": "Second.ql" }),
            json!({ "type": "PREDICATE_STARTED", "eventId": 3, "nanoTime": 0u64, "predicateName": "Orphan" }),
            json!({ "type": "PREDICATE_COMPLETED", "eventId": 4, "nanoTime": 1000000u64, "startEvent": 3 }),
        ];

        let profile = parse_raw_log(&records);
        assert_eq!(profile.queries[0].query_name, "First.ql");
        assert_eq!(profile.queries[0].predicates.len(), 1);
        assert_eq!(profile.queries[1].predicates.len(), 0);
    }

    #[test]
    fn test_pipeline_count_attached_to_predicate() {
        let records = vec![
            json!({ "type": "QUERY_STARTED", "eventId": 1, "nanoTime": 0u64, "queryName": "Q.ql" }),
            json!({ "type": "PREDICATE_STARTED", "eventId": 2, "nanoTime": 0u64,
                    "predicateName": "P", "queryCausingWork": 1 }),
            json!({ "type": "PIPELINE_STARTED", "eventId": 3, "nanoTime": 0u64, "predicateStartEvent": 2 }),
            json!({ "type": "PIPELINE_COMPLETED", "eventId": 4, "nanoTime": 100u64, "startEvent": 3 }),
            json!({ "type": "PIPELINE_STARTED", "eventId": 5, "nanoTime": 0u64, "predicateStartEvent": 2 }),
            json!({ "type": "PIPELINE_COMPLETED", "eventId": 6, "nanoTime": 200u64, "startEvent": 5 }),
            json!({ "type": "PREDICATE_COMPLETED", "eventId": 7, "nanoTime": 300u64, "startEvent": 2 }),
        ];

        let profile = parse_raw_log(&records);
        assert_eq!(profile.queries[0].predicates[0].pipeline_count, Some(2));
    }

    #[test]
    fn test_cache_lookups_counted_per_query() {
        let records = vec![
            json!({ "type": "QUERY_STARTED", "eventId": 1, "nanoTime": 0u64, "queryName": "A.ql" }),
            json!({ "type": "QUERY_STARTED", "eventId": 2, "nanoTime": 0u64, "queryName": "B.ql" }),
            json!({ "type": "CACHE_LOOKUP", "eventId": 3, "nanoTime": 0u64, "queryCausingWork": 2 }),
            json!({ "type": "CACHE_LOOKUP", "eventId": 4, "nanoTime": 0u64, "queryCausingWork": 2 }),
            // No owner: falls back to the first query
            json!({ "type": "CACHE_LOOKUP", "eventId": 5, "nanoTime": 0u64 }),
        ];

        let profile = parse_raw_log(&records);
        assert_eq!(profile.queries[0].cache_hits, 1);
        assert_eq!(profile.queries[1].cache_hits, 2);
    }

    #[test]
    fn test_header_version_captured() {
        let records = vec![
            json!({ "type": "LOG_HEADER", "eventId": 1, "nanoTime": 0u64, "codeqlVersion": "2.24.1" }),
            json!({ "type": "LOG_FOOTER", "eventId": 2, "nanoTime": 1u64 }),
        ];

        let profile = parse_raw_log(&records);
        assert_eq!(profile.codeql_version.as_deref(), Some("2.24.1"));
        assert_eq!(profile.log_format, LogFormat::Raw);
        assert_eq!(profile.total_events, 2);
        assert!(profile.queries.is_empty());
    }

    #[test]
    fn test_out_of_order_completion_saturates_to_zero() {
        let records = vec![
            json!({ "type": "QUERY_STARTED", "eventId": 1, "nanoTime": 500u64, "queryName": "Q.ql" }),
            json!({ "type": "PREDICATE_STARTED", "eventId": 2, "nanoTime": 900u64,
                    "predicateName": "P", "queryCausingWork": 1 }),
            json!({ "type": "PREDICATE_COMPLETED", "eventId": 3, "nanoTime": 100u64, "startEvent": 2 }),
        ];

        let profile = parse_raw_log(&records);
        assert_eq!(profile.queries[0].predicates[0].duration_ms, 0.0);
    }
}
