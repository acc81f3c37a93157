//! Output writers for profile artifacts.
//!
//! This module handles writing data to disk:
//! - JSON profiles
//! - Mermaid diagram documents

pub mod diagram;
pub mod json;

// Re-export main functions
pub use diagram::write_diagram;
pub use json::{read_profile, write_profile};
