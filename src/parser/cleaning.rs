//! Turn a raw table into aggregated, typed records.
//!
//! This module handles:
//! - Resolving the value column (explicit name or header heuristics)
//! - Mapping configured hierarchy levels to columns
//! - Cleaning values and level names
//! - Grouping rows by hierarchy and summing their values

use super::csv_source::Table;
use super::schema::Record;
use crate::utils::config::{FREE_TEXT_COLUMN_MARKER, NULL_TOKENS, VALUE_COLUMN_KEYWORDS};
use crate::utils::error::LoadError;
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// Column layout resolved against a table header
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    /// Configured level names, in hierarchy order
    pub level_names: Vec<String>,

    /// Column index per level, `None` when the level column is missing
    pub level_columns: Vec<Option<usize>>,

    /// Name of the measure column
    pub value_column: String,

    /// Index of the measure column
    pub value_index: usize,
}

impl TableSchema {
    /// Number of hierarchy levels (D)
    pub fn depth(&self) -> usize {
        self.level_names.len()
    }

    /// Levels that are absent from the table
    pub fn missing_levels(&self) -> Vec<&str> {
        self.level_names
            .iter()
            .zip(&self.level_columns)
            .filter(|(_, col)| col.is_none())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Counters from a cleaning pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningStats {
    pub total_rows: usize,
    pub kept: usize,
    pub dropped: usize,
}

/// Pick the value column from the header
///
/// **Public** - used by resolve_schema
///
/// The last header is taken unless it is a level column or the free-text
/// root cause column. Otherwise the first header containing one of the
/// value keywords is used.
///
/// # Errors
/// * `LoadError::ValueColumnNotFound` - No candidate header
pub fn detect_value_column(headers: &[String], levels: &[String]) -> Result<String, LoadError> {
    if let Some(last) = headers.last() {
        let is_level = levels.iter().any(|l| l == last);
        let is_free_text = last.to_lowercase().contains(FREE_TEXT_COLUMN_MARKER);
        if !is_level && !is_free_text {
            info!("Automatically detected value column as '{}'", last);
            return Ok(last.clone());
        }
    }

    warn!("Could not reliably detect value column from the last header, trying keywords");

    headers
        .iter()
        .find(|h| VALUE_COLUMN_KEYWORDS.iter().any(|kw| h.contains(kw)))
        .map(|h| {
            info!("Using heuristic value column: '{}'", h);
            h.clone()
        })
        .ok_or(LoadError::ValueColumnNotFound)
}

/// Resolve level and value columns against the table header
///
/// **Public** - main entry point for schema resolution
///
/// # Arguments
/// * `table` - Loaded table
/// * `levels` - Hierarchy column names, outermost first
/// * `value_override` - Explicit value column name, skips detection
///
/// # Errors
/// * `LoadError::MissingValueColumn` - Value column not in header
/// * `LoadError::ValueColumnNotFound` - Detection failed
pub fn resolve_schema(
    table: &Table,
    levels: &[String],
    value_override: Option<&str>,
) -> Result<TableSchema, LoadError> {
    let value_column = match value_override {
        Some(name) => name.to_string(),
        None => detect_value_column(&table.headers, levels)?,
    };

    let value_index = table
        .column_index(&value_column)
        .ok_or_else(|| LoadError::MissingValueColumn(value_column.clone()))?;

    let level_columns: Vec<Option<usize>> =
        levels.iter().map(|l| table.column_index(l)).collect();

    let schema = TableSchema {
        level_names: levels.to_vec(),
        level_columns,
        value_column,
        value_index,
    };

    let missing = schema.missing_levels();
    if !missing.is_empty() {
        warn!(
            "Missing hierarchy columns: {:?}. They will be treated as empty.",
            missing
        );
    }

    Ok(schema)
}

/// Clean a raw value cell
///
/// Whitespace (used as a thousands separator) is removed before parsing.
/// Returns `None` for non-numeric, non-finite or non-positive values.
pub fn clean_value(raw: &str) -> Option<f64> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    compact
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Clean a raw hierarchy cell
///
/// Returns `None` for empty cells and the `nan` / `None` placeholders.
pub fn clean_level(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if NULL_TOKENS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Clean every row of the table into records
///
/// **Public** - second stage of the record source
///
/// Rows with a malformed value are dropped and counted. Missing level
/// columns yield `None` for every row.
pub fn clean_records(table: &Table, schema: &TableSchema) -> (Vec<Record>, CleaningStats) {
    let mut records = Vec::with_capacity(table.rows.len());
    let mut stats = CleaningStats {
        total_rows: table.rows.len(),
        ..Default::default()
    };

    for row in 0..table.rows.len() {
        let raw_value = table.cell(row, schema.value_index).unwrap_or_default();
        let Some(value) = clean_value(raw_value) else {
            debug!("Dropping row {}: malformed value '{}'", row + 1, raw_value);
            stats.dropped += 1;
            continue;
        };

        let hierarchy = schema
            .level_columns
            .iter()
            .map(|col| col.and_then(|c| table.cell(row, c)).and_then(clean_level))
            .collect();

        // clean_value already guarantees a positive finite value
        records.push(Record { hierarchy, value });
        stats.kept += 1;
    }

    info!(
        "Cleaned {} rows: {} kept, {} dropped",
        stats.total_rows, stats.kept, stats.dropped
    );

    (records, stats)
}

/// Group records by their full hierarchy and sum the values
///
/// **Public** - last stage of the record source
///
/// Absent levels take part in the grouping, so `A;;` and `A;X;` stay
/// separate. The output is sorted by hierarchy.
///
/// # Errors
/// * `LoadError::EmptyDataset` - Nothing to aggregate
pub fn aggregate_records(records: &[Record]) -> Result<Vec<Record>, LoadError> {
    if records.is_empty() {
        return Err(LoadError::EmptyDataset);
    }

    let mut groups: BTreeMap<&[Option<String>], f64> = BTreeMap::new();
    for record in records {
        *groups.entry(record.hierarchy.as_slice()).or_insert(0.0) += record.value;
    }

    let aggregated: Vec<Record> = groups
        .into_iter()
        .map(|(hierarchy, value)| Record {
            hierarchy: hierarchy.to_vec(),
            value,
        })
        .collect();

    debug!(
        "Aggregated {} records into {} unique paths",
        records.len(),
        aggregated.len()
    );

    Ok(aggregated)
}
