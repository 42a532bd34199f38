//! Record, leaf and report schema definitions.
//!
//! `Record` is what the record source hands to the aggregation core,
//! `LeafDescriptor` is what the core hands to the renderer, and
//! `TreemapReport` is the structure of the JSON files we write to disk.
//! The report is versioned to allow future evolution.

use crate::utils::error::AggregateError;
use serde::{Deserialize, Serialize};

/// One aggregated input row: a hierarchy path and its summed measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// One slot per hierarchy level, `None` where the level is absent
    pub hierarchy: Vec<Option<String>>,

    /// Positive, finite measure
    pub value: f64,
}

impl Record {
    /// Create a record, rejecting non-positive or non-finite values
    ///
    /// **Public** - used by the record source and tests
    pub fn new(hierarchy: Vec<Option<String>>, value: f64) -> Result<Self, AggregateError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(AggregateError::MalformedRecord(value));
        }
        Ok(Self { hierarchy, value })
    }

    /// Convenience constructor from a fully present path
    pub fn from_path<S: AsRef<str>>(path: &[S], value: f64) -> Result<Self, AggregateError> {
        let hierarchy = path.iter().map(|s| Some(s.as_ref().to_string())).collect();
        Self::new(hierarchy, value)
    }

    /// The hierarchy path, cut at the first absent or empty level
    pub fn path(&self) -> Vec<&str> {
        self.hierarchy
            .iter()
            .map_while(|level| level.as_deref().filter(|s| !s.is_empty()))
            .collect()
    }
}

/// A flattened leaf, ready for the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafDescriptor {
    /// Path with non-branching links removed (controls nesting depth)
    pub structural_path: Vec<String>,

    /// Full path from the first level down to this leaf
    pub original_path: Vec<String>,

    /// Node text, e.g. "Refunds (1,200, 12.50%)"
    pub display_label: String,

    /// Original path joined with " > " (hover and audit)
    pub original_path_string: String,

    /// Aggregated value of the leaf
    pub value: f64,

    /// Share of the dataset total, rounded to two decimals
    pub percentage: f64,
}

impl LeafDescriptor {
    /// Terminal segment of the original path
    pub fn label(&self) -> &str {
        self.original_path.last().map(String::as_str).unwrap_or_default()
    }

    /// Number of levels removed by structural collapsing
    pub fn collapsed_levels(&self) -> usize {
        self.original_path.len() - self.structural_path.len()
    }
}

/// A non-branching (parent path, child) link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleStep {
    pub parent_path: Vec<String>,
    pub child: String,
}

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreemapReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Input file the report was generated from
    pub source: String,

    /// Name of the measure column
    pub value_column: String,

    /// Number of hierarchy levels (D)
    pub depth: usize,

    /// Dataset total (root value)
    pub total_value: f64,

    /// Number of aggregated records fed to the tree builder
    pub record_count: usize,

    /// Number of leaves in the tree
    pub leaf_count: usize,

    /// Non-branching links that were collapsed
    pub single_steps: Vec<SingleStep>,

    /// All leaves, largest first
    pub leaves: Vec<LeafDescriptor>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}
