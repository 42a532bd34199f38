//! Standalone HTML output for rendered treemaps.
//!
//! The SVG is embedded inline, so the page has no external dependencies.

use super::validate_output_path;
use crate::treemap::generator::escape_xml;
use crate::utils::error::OutputError;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Wrap an SVG document in a complete HTML page
pub fn render_html(svg_content: &str, title: &str) -> String {
    let title = escape_xml(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>body {{ margin: 25px; font-family: sans-serif; }} svg {{ max-width: 100%; height: auto; }}</style>
</head>
<body>
{svg}
</body>
</html>
"#,
        title = title,
        svg = svg_content
    )
}

/// Write a treemap page to a file
///
/// **Public** - main entry point for HTML output
///
/// # Arguments
/// * `svg_content` - SVG string from the treemap generator
/// * `title` - Page title
/// * `output_path` - Path to output HTML file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is invalid
pub fn write_html(
    svg_content: &str,
    title: &str,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing HTML to: {}", output_path.display());

    validate_output_path(output_path)?;

    let page = render_html(svg_content, title);

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(page.as_bytes())
        .map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "HTML written successfully ({} bytes, {:.2} KB)",
        page.len(),
        page.len() as f64 / 1024.0
    );

    Ok(())
}
