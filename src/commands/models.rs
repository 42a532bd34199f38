use crate::treemap::TreemapConfig;
use crate::utils::config::{DEFAULT_DELIMITER, DEFAULT_LEVEL_COLUMNS};
use std::path::PathBuf;

/// Arguments for the generate command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    /// Input CSV file
    pub input: PathBuf,

    /// Output path for the HTML treemap (optional)
    pub output_html: Option<PathBuf>,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Hierarchy columns, outermost first
    pub levels: Vec<String>,

    /// Explicit value column, skips header detection
    pub value_column: Option<String>,

    /// Field delimiter
    pub delimiter: u8,

    /// Chart title; defaults to the base title plus the value column name
    pub title: Option<String>,

    /// Canvas settings for the treemap
    pub treemap_config: TreemapConfig,

    /// Write intermediate dumps to this directory
    pub debug_dir: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_html: Some(PathBuf::from("treemap.html")),
            output_json: None,
            levels: DEFAULT_LEVEL_COLUMNS.iter().map(|s| s.to_string()).collect(),
            value_column: None,
            delimiter: DEFAULT_DELIMITER,
            title: None,
            treemap_config: TreemapConfig::default(),
            debug_dir: None,
            print_summary: false,
        }
    }
}

/// What a generate run produced
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOutcome {
    pub value_column: String,
    pub total_value: f64,
    pub record_count: usize,
    pub leaf_count: usize,
    pub single_step_count: usize,
}
