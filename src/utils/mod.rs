//! Utility modules for configuration, error handling, and number formatting.

pub mod config;
pub mod error;
pub mod format;

// Re-export commonly used error types for convenience
pub use error::{AggregateError, LoadError, OutputError, RenderError};
