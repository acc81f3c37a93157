//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the library components to perform user tasks.

pub mod profile;
pub mod utils;

// Re-export main command functions
pub use profile::{execute_profile, validate_args, ProfileArgs};
pub use utils::{display_schema, display_version, validate_profile_file};
