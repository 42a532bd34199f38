//! Configuration and constants for the CLI.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Name of the sentinel node at the top of every aggregate tree
pub const ROOT_NAME: &str = "Root";

/// Hierarchy columns used when `--levels` is not given
pub const DEFAULT_LEVEL_COLUMNS: &[&str] = &["Level 1", "Level 2", "Level 3", "Level 4"];

/// Field delimiter of the exported ticket sheets
pub const DEFAULT_DELIMITER: u8 = b';';

// Value column detection. The last header wins unless it is a level column or the
// free-text root cause column; otherwise fall back to the first keyword match.
pub const VALUE_COLUMN_KEYWORDS: &[&str] = &["Tickets", "Count", "Volume", "Total"];
pub const FREE_TEXT_COLUMN_MARKER: &str = "contact root cause";

/// Cell contents that count as an absent hierarchy level
pub const NULL_TOKENS: &[&str] = &["", "nan", "None"];

/// Separator used for the human-readable original path
pub const PATH_SEPARATOR: &str = " > ";

/// Relative tolerance when comparing the tree total against the record sum
pub const SUM_TOLERANCE: f64 = 1e-9;

// Canvas defaults for the rendered treemap
pub const DEFAULT_WIDTH: usize = 1200;
pub const DEFAULT_HEIGHT: usize = 800;
pub const MAX_CANVAS_SIDE: usize = 20_000;

/// Title prefix for the chart, the value column name is appended
pub const BASE_TITLE: &str = "Customer Service Root Cause Analysis";
