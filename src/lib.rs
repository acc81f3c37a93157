//! qlprof
//!
//! Performance profiling and dependency diagrams for CodeQL
//! evaluator logs.
//!
//! The profiler never runs the evaluation engine; it reads the logs the
//! engine already wrote (either the raw event stream or the
//! pre-aggregated summary), auto-detects the format, and produces a
//! structured profile, a Mermaid dependency diagram of the most
//! expensive predicates, and a text summary.
//!
//! This crate provides the core implementation for the `qlprof` CLI
//! tool.

pub mod commands;
pub mod metrics;
pub mod output;
pub mod parser;
pub mod render;
pub mod utils;
