use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use std::path::PathBuf;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Source: {}", report.source);
    println!("  Value Column: {}", report.value_column);
    println!("  Total: {}", report.total_value);
    println!("  Leaves: {}", report.leaf_count);
    println!("  Collapsed Links: {}", report.single_steps.len());

    if report.version != SCHEMA_VERSION {
        println!(
            "  ⚠ Report schema v{} differs from current v{}",
            report.version, SCHEMA_VERSION
        );
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Hierarchy Treemap Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  source: string             - Input file");
        println!("  value_column: string       - Measure column name");
        println!("  depth: number              - Number of hierarchy levels");
        println!("  total_value: number        - Dataset total");
        println!("  record_count: number       - Aggregated records");
        println!("  leaf_count: number         - Leaves in the tree");
        println!("  single_steps: array        - Collapsed non-branching links");
        println!("    parent_path: string[]    - Path of the parent");
        println!("    child: string            - Only child of that parent");
        println!("  leaves: array              - Flattened leaves, largest first");
        println!("    structural_path: string[] - Collapsed path (nesting)");
        println!("    original_path: string[]  - Full path");
        println!("    display_label: string    - Node text");
        println!("    original_path_string: string - Full path joined with ' > '");
        println!("    value: number            - Leaf value");
        println!("    percentage: number       - Share of total");
        println!("  generated_at: string       - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Hierarchy Treemap v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Aggregates variable-depth categorical records into collapsed, nested treemaps.");
}
