//! Output writers for reports, treemaps and diagnostics.
//!
//! This module handles writing data to disk in various formats:
//! - JSON reports
//! - Standalone HTML pages with the treemap SVG
//! - Optional intermediate dumps through a diagnostics sink

pub mod diagnostics;
pub mod html;
pub mod json;

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

// Re-export main functions
pub use diagnostics::{DiagnosticsSink, DirectorySink, NullSink};
pub use html::{render_html, write_html};
pub use json::{read_report, report_to_string, write_report};

/// Validate an output path and create missing parent directories
///
/// **Private** - shared by the writers
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    // Check if we're trying to overwrite a directory
    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
