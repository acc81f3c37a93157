//! End-to-end parsing tests over synthetic evaluator logs.

use pretty_assertions::assert_eq;
use qlprof::parser::{parse_evaluator_log, LogFormat, ProfileData};
use qlprof::utils::error::ParseError;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Join events the way the evaluator writes them: pretty-printed objects
/// separated by blank lines.
fn pretty_log(events: &[Value]) -> String {
    events
        .iter()
        .map(|e| serde_json::to_string_pretty(e).unwrap())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn write_log(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn single_query_raw_log() -> String {
    pretty_log(&[
        json!({
            "time": "2026-02-17T00:00:00Z",
            "type": "LOG_HEADER",
            "eventId": 1,
            "nanoTime": 100000000u64,
            "codeqlVersion": "2.24.1",
            "logVersion": "0.5.0"
        }),
        json!({
            "type": "QUERY_STARTED",
            "eventId": 2,
            "nanoTime": 200000000u64,
            "queryName": "TestQuery.ql"
        }),
        json!({
            "type": "PREDICATE_STARTED",
            "eventId": 3,
            "nanoTime": 300000000u64,
            "raHash": "abc123",
            "predicateName": "TestPredicate#1",
            "predicateType": "COMPUTED",
            "position": "TestQuery.ql:5:1:10:1",
            "dependencies": {},
            "queryCausingWork": 2
        }),
        json!({
            "type": "PIPELINE_STARTED",
            "eventId": 4,
            "nanoTime": 300100000u64,
            "predicateStartEvent": 3
        }),
        json!({
            "type": "PIPELINE_COMPLETED",
            "eventId": 5,
            "nanoTime": 350000000u64,
            "startEvent": 4,
            "resultSize": 100
        }),
        json!({
            "type": "PREDICATE_COMPLETED",
            "eventId": 6,
            "nanoTime": 350100000u64,
            "startEvent": 3,
            "resultSize": 100
        }),
        json!({
            "type": "PREDICATE_STARTED",
            "eventId": 7,
            "nanoTime": 360000000u64,
            "predicateName": "TestPredicate#2",
            "predicateType": "COMPUTED",
            "position": "TestQuery.ql:12:1:18:1",
            "dependencies": { "TestPredicate#1": "abc123" },
            "queryCausingWork": 2
        }),
        json!({
            "type": "PREDICATE_COMPLETED",
            "eventId": 8,
            "nanoTime": 380000000u64,
            "startEvent": 7,
            "resultSize": 50
        }),
        json!({
            "type": "QUERY_COMPLETED",
            "eventId": 9,
            "nanoTime": 400000000u64,
            "startEvent": 2,
            "terminationType": "NORMAL"
        }),
        json!({
            "type": "LOG_FOOTER",
            "eventId": 10,
            "nanoTime": 500000000u64
        }),
    ])
}

fn multi_query_raw_log() -> String {
    pretty_log(&[
        json!({ "type": "LOG_HEADER", "eventId": 1, "nanoTime": 100000000u64,
                "codeqlVersion": "2.24.1" }),
        json!({ "type": "QUERY_STARTED", "eventId": 10, "nanoTime": 200000000u64,
                "queryName": "QueryA.ql" }),
        json!({ "type": "PREDICATE_STARTED", "eventId": 11, "nanoTime": 300000000u64,
                "predicateName": "PredicateA#1", "dependencies": {}, "queryCausingWork": 10 }),
        json!({ "type": "PREDICATE_COMPLETED", "eventId": 12, "nanoTime": 310000000u64,
                "startEvent": 11, "resultSize": 200 }),
        json!({ "type": "QUERY_COMPLETED", "eventId": 13, "nanoTime": 350000000u64,
                "startEvent": 10 }),
        json!({ "type": "QUERY_STARTED", "eventId": 20, "nanoTime": 400000000u64,
                "queryName": "QueryB.ql" }),
        json!({ "type": "PREDICATE_STARTED", "eventId": 21, "nanoTime": 500000000u64,
                "predicateName": "PredicateB#1", "dependencies": {}, "queryCausingWork": 20 }),
        json!({ "type": "PREDICATE_COMPLETED", "eventId": 22, "nanoTime": 550000000u64,
                "startEvent": 21, "resultSize": 300 }),
        json!({ "type": "PREDICATE_STARTED", "eventId": 23, "nanoTime": 560000000u64,
                "predicateName": "PredicateB#2",
                "dependencies": { "PredicateB#1": "bbb222" }, "queryCausingWork": 20 }),
        json!({ "type": "PREDICATE_COMPLETED", "eventId": 24, "nanoTime": 600000000u64,
                "startEvent": 23, "resultSize": 75 }),
        json!({ "type": "QUERY_COMPLETED", "eventId": 25, "nanoTime": 650000000u64,
                "startEvent": 20 }),
        json!({ "type": "LOG_FOOTER", "eventId": 30, "nanoTime": 700000000u64 }),
    ])
}

fn summary_log() -> String {
    pretty_log(&[
        json!({ "summaryLogVersion": "0.4.0", "codeqlVersion": "2.24.1",
                "startTime": "2026-02-17T00:00:00Z" }),
        json!({ "predicateName": "SentinelPred", "evaluationStrategy": "SENTINEL_EMPTY",
                "sentinelRaHash": "sss" }),
        json!({ "predicateName": "TestPredicate#1", "evaluationStrategy": "COMPUTED",
                "dependencies": { "dep1": "dep1hash" }, "millis": 50, "pipelineRuns": 1,
                "position": "TestQuery.ql:5:1:10:1", "queryCausingWork": "TestQuery.ql",
                "resultSize": 100 }),
        json!({ "predicateName": "TestPredicate#2", "evaluationStrategy": "COMPUTED",
                "dependencies": { "TestPredicate#1": "abc123" }, "millis": 120,
                "pipelineRuns": 2, "position": "TestQuery.ql:12:1:18:1",
                "queryCausingWork": "TestQuery.ql", "resultSize": 50 }),
    ])
}

// ---------------------------------------------------------------------------
// Raw format
// ---------------------------------------------------------------------------

#[test]
fn test_raw_single_query() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "evaluator-log.jsonl", &single_query_raw_log());

    let profile = parse_evaluator_log(&path).unwrap();

    assert_eq!(profile.log_format, LogFormat::Raw);
    assert_eq!(profile.codeql_version.as_deref(), Some("2.24.1"));
    assert_eq!(profile.total_events, 10);
    assert_eq!(profile.queries.len(), 1);

    let query = &profile.queries[0];
    assert_eq!(query.query_name, "TestQuery.ql");
    // nanoTime 200000000 -> 400000000 = 200ms
    assert_eq!(query.total_duration_ms, 200.0);
    assert_eq!(query.predicate_count, 2);
    assert_eq!(query.predicates.len(), query.predicate_count);
}

#[test]
fn test_raw_predicate_details() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "evaluator-log.jsonl", &single_query_raw_log());

    let profile = parse_evaluator_log(&path).unwrap();
    let query = &profile.queries[0];

    let pred1 = query
        .predicates
        .iter()
        .find(|p| p.predicate_name == "TestPredicate#1")
        .expect("TestPredicate#1 present");
    // nanoTime 300000000 -> 350100000 = 50.1ms
    assert!((pred1.duration_ms - 50.1).abs() < 0.1);
    assert_eq!(pred1.result_size, Some(100));
    assert_eq!(pred1.pipeline_count, Some(1));
    assert_eq!(pred1.position.as_deref(), Some("TestQuery.ql:5:1:10:1"));
    assert_eq!(pred1.evaluation_strategy.as_deref(), Some("COMPUTED"));

    let pred2 = query
        .predicates
        .iter()
        .find(|p| p.predicate_name == "TestPredicate#2")
        .expect("TestPredicate#2 present");
    assert_eq!(pred2.dependencies, vec!["TestPredicate#1".to_string()]);
    assert_eq!(pred2.pipeline_count, None);
}

#[test]
fn test_raw_multi_query_grouping() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "evaluator-log.jsonl", &multi_query_raw_log());

    let profile = parse_evaluator_log(&path).unwrap();

    assert_eq!(profile.queries.len(), 2);
    assert_eq!(profile.queries[0].query_name, "QueryA.ql");
    assert_eq!(profile.queries[0].predicate_count, 1);
    assert_eq!(profile.queries[0].total_duration_ms, 150.0);
    assert_eq!(profile.queries[1].query_name, "QueryB.ql");
    assert_eq!(profile.queries[1].predicate_count, 2);
    assert_eq!(profile.queries[1].total_duration_ms, 250.0);
}

#[test]
fn test_raw_truncated_log_still_parses() {
    // Cut the log mid-way: no completions for the second predicate, no
    // query completion, no footer.
    let full = single_query_raw_log();
    let cut = full.find("\"eventId\": 7").unwrap();
    let boundary = full[..cut].rfind("\n\n").unwrap();
    let truncated = &full[..boundary];

    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "evaluator-log.jsonl", truncated);

    let profile = parse_evaluator_log(&path).unwrap();
    assert_eq!(profile.queries.len(), 1);
    // Only the first predicate completed before the cut
    assert_eq!(profile.queries[0].predicate_count, 1);
    // No QUERY_COMPLETED: total falls back to the predicate-duration sum
    assert!((profile.queries[0].total_duration_ms - 50.1).abs() < 0.1);
}

// ---------------------------------------------------------------------------
// Summary format
// ---------------------------------------------------------------------------

#[test]
fn test_summary_log_parsing() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "evaluator-log.summary.jsonl", &summary_log());

    let profile = parse_evaluator_log(&path).unwrap();

    assert_eq!(profile.log_format, LogFormat::Summary);
    assert_eq!(profile.codeql_version.as_deref(), Some("2.24.1"));
    assert_eq!(profile.total_events, 4);
    assert_eq!(profile.queries.len(), 1);

    let query = &profile.queries[0];
    assert_eq!(query.query_name, "TestQuery.ql");
    // Running sum of millis, no unit conversion
    assert_eq!(query.total_duration_ms, 170.0);
    assert_eq!(query.predicate_count, 2);

    let names: Vec<&str> = query
        .predicates
        .iter()
        .map(|p| p.predicate_name.as_str())
        .collect();
    assert!(!names.contains(&"SentinelPred"));

    let pred1 = &query.predicates[0];
    assert_eq!(pred1.duration_ms, 50.0);
    assert_eq!(pred1.pipeline_count, Some(1));
    assert_eq!(pred1.dependencies, vec!["dep1".to_string()]);
}

// ---------------------------------------------------------------------------
// Degenerate inputs
// ---------------------------------------------------------------------------

#[test]
fn test_missing_log_fails_fast() {
    let err = parse_evaluator_log(&PathBuf::from("/nonexistent/evaluator-log.jsonl")).unwrap_err();
    assert!(matches!(err, ParseError::LogNotFound(_)));
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_empty_file_yields_empty_profile() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "evaluator-log.jsonl", "");

    let profile = parse_evaluator_log(&path).unwrap();
    assert_eq!(profile, ProfileData::empty());
    assert_eq!(profile.log_format, LogFormat::Raw);
}

#[test]
fn test_non_json_file_yields_empty_profile() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "evaluator-log.jsonl", "not json at all\nstill not json");

    let profile = parse_evaluator_log(&path).unwrap();
    assert_eq!(profile, ProfileData::empty());
}

#[test]
fn test_corrupt_record_in_the_middle_is_skipped() {
    let mut content = single_query_raw_log();
    // Splice a malformed object between two valid ones
    content = content.replacen("\n\n{", "\n\n{\n  broken!\n}\n\n{", 1);

    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "evaluator-log.jsonl", &content);

    let profile = parse_evaluator_log(&path).unwrap();
    assert_eq!(profile.total_events, 10);
    assert_eq!(profile.queries.len(), 1);
    assert_eq!(profile.queries[0].predicate_count, 2);
}

#[test]
fn test_parse_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "evaluator-log.jsonl", &single_query_raw_log());

    let first = parse_evaluator_log(&path).unwrap();
    let second = parse_evaluator_log(&path).unwrap();
    assert_eq!(first, second);

    let json_first = serde_json::to_string(&first).unwrap();
    let json_second = serde_json::to_string(&second).unwrap();
    assert_eq!(json_first, json_second);
}
