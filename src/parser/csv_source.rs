//! Raw table loading from delimited text files.
//!
//! Every cell is kept as a string; cleaning and typing happen in
//! `cleaning`. Rows may be shorter or longer than the header.

use crate::utils::error::LoadError;
use csv::{ReaderBuilder, Trim};
use log::{debug, info};
use std::io::Read;
use std::path::Path;

/// A loaded table: header row plus string cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Index of a header, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at `(row, column)`, `None` when the row is short
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Load a delimited file into a table
///
/// **Public** - main entry point for reading input
///
/// # Arguments
/// * `path` - Path to the CSV file
/// * `delimiter` - Field delimiter (`;` for the ticket exports)
///
/// # Errors
/// * `LoadError::NotFound` - File does not exist
/// * `LoadError::EmptyFile` - No header or no data rows
/// * `LoadError::Csv` - Malformed quoting or unreadable file
pub fn load_table(path: impl AsRef<Path>, delimiter: u8) -> Result<Table, LoadError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LoadError::NotFound(path.display().to_string()));
    }

    info!("Loading table from: {}", path.display());

    let file = std::fs::File::open(path)
        .map_err(|e| LoadError::Csv(csv::Error::from(e)))?;

    let table = read_table(file, delimiter)?;
    if table.headers.is_empty() || table.is_empty() {
        return Err(LoadError::EmptyFile(path.display().to_string()));
    }

    info!(
        "Loaded {} rows with {} columns",
        table.rows.len(),
        table.headers.len()
    );

    Ok(table)
}

/// Read a table from any reader
///
/// **Public** - useful for tests and in-memory input
pub fn read_table<R: Read>(reader: R, delimiter: u8) -> Result<Table, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(b'"')
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        // Skip-initial-space semantics: leading blanks only, trailing ones are
        // stripped later by the cleaners.
        rows.push(record.iter().map(|c| c.trim_start().to_string()).collect());
    }

    debug!("Read {} headers and {} rows", headers.len(), rows.len());

    Ok(Table { headers, rows })
}
