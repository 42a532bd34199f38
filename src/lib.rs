//! Hierarchy Treemap
//!
//! Aggregates flat tabular records, each carrying a variable-depth
//! categorical path and a numeric measure, into a hierarchy suitable for
//! a nested proportional-area visualization.
//!
//! Non-branching links (a parent with a single child across the whole
//! dataset) are collapsed out of the structural hierarchy, while every
//! leaf keeps its original path and label.
//!
//! ## Getting Started
//!
//! ```bash
//! treemap generate --input CS_rootcause.csv --output treemap.html --json report.json
//! treemap --help
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod treemap;
pub mod utils;
