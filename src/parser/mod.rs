//! Evaluator log parsing and profile model.
//!
//! This module handles:
//! - Splitting concatenated pretty-printed JSON into records
//! - Auto-detecting the raw vs summary log schema
//! - Correlating or aggregating records into a `ProfileData`

pub mod event;
pub mod profile;
pub mod raw;
pub mod splitter;
pub mod summary;

// Re-export main types and functions
pub use event::{detect_log_format, RawEvent, SummaryRecord};
pub use profile::{LogFormat, PredicateProfile, ProfileData, QueryProfile};
pub use raw::parse_raw_log;
pub use splitter::{decode_records, split_json_objects};
pub use summary::parse_summary_log;

use crate::utils::error::ParseError;
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Parse an evaluator log file, auto-detecting its format
///
/// **Public** - the main entry point for parsing
///
/// # Arguments
/// * `log_path` - Path to `evaluator-log.jsonl` or
///   `evaluator-log.summary.jsonl`
///
/// # Returns
/// The parsed profile. A log with zero decodable records yields a
/// well-formed empty profile, not an error.
///
/// # Errors
/// * `ParseError::LogNotFound` - the file does not exist
/// * `ParseError::Io` - the file could not be read
pub fn parse_evaluator_log(log_path: &Path) -> Result<ProfileData, ParseError> {
    if !log_path.exists() {
        return Err(ParseError::LogNotFound(log_path.to_path_buf()));
    }

    // Whole-file materialization: acceptable for single evaluation runs,
    // a known scalability ceiling for anything larger.
    let content = fs::read_to_string(log_path)?;
    let records = decode_records(&content);

    info!(
        "Decoded {} records from {}",
        records.len(),
        log_path.display()
    );

    let Some(first) = records.first() else {
        return Ok(ProfileData::empty());
    };

    let format = detect_log_format(first);
    debug!("Detected log format: {:?}", format);

    match format {
        LogFormat::Raw => Ok(parse_raw_log(&records)),
        LogFormat::Summary => Ok(parse_summary_log(&records)),
    }
}
