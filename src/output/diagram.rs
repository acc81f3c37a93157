//! Mermaid diagram output writer.

use crate::utils::error::OutputError;
use log::info;
use std::path::Path;

/// Write a rendered Mermaid document to disk
///
/// **Public** - writes the `.md` artifact
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_diagram(content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing diagram to: {}", output_path.display());

    super::json::validate_output_path(output_path)?;
    super::json::create_parent_dirs(output_path)?;

    std::fs::write(output_path, content).map_err(OutputError::WriteFailed)?;

    info!("Diagram written successfully ({} bytes)", content.len());

    Ok(())
}
