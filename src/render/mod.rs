//! Rendering of parsed profiles into output documents.
//!
//! This module converts `ProfileData` into:
//! - A Mermaid dependency diagram highlighting top-N costs
//! - A plain-text summary

pub mod mermaid;
pub mod text;

// Re-export main functions
pub use mermaid::render_mermaid;
pub use text::render_text_summary;
