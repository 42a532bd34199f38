//! Record loading, cleaning and schema definitions.
//!
//! This module handles:
//! - Reading delimited input into a raw table
//! - Resolving the value and hierarchy columns
//! - Cleaning and aggregating rows into records
//! - Defining record, leaf and report schema

pub mod cleaning;
pub mod csv_source;
pub mod schema;

// Re-export main types
pub use cleaning::{
    aggregate_records, clean_level, clean_records, clean_value, detect_value_column,
    resolve_schema, CleaningStats, TableSchema,
};
pub use csv_source::{load_table, read_table, Table};
pub use schema::{LeafDescriptor, Record, SingleStep, TreemapReport};
