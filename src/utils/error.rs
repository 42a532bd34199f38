//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while loading and cleaning the input table
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Input file not found: {0}")]
    NotFound(String),

    #[error("Input file is empty: {0}")]
    EmptyFile(String),

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Cannot determine the value column; no header like 'Total Tickets Q1' found")]
    ValueColumnNotFound,

    #[error("Required value column '{0}' is missing from the input")]
    MissingValueColumn(String),

    #[error("No valid records remain after cleaning")]
    EmptyDataset,
}

/// Errors raised by the aggregation core
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Cannot aggregate an empty record set")]
    EmptyDataset,

    #[error("Record value must be positive and finite, got {0}")]
    MalformedRecord(f64),
}

/// Errors that can occur during treemap rendering
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No leaves to render")]
    EmptyLeaves,

    #[error("Invalid canvas size: {width}x{height}")]
    InvalidCanvas { width: usize, height: usize },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    CsvFailed(#[from] csv::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
