//! Generate command implementation.
//!
//! The generate command:
//! 1. Loads the input table
//! 2. Resolves columns and cleans rows
//! 3. Aggregates rows into unique hierarchy paths
//! 4. Builds the tree, finds single-steps and flattens leaves
//! 5. Renders the treemap
//! 6. Writes output files

use super::models::{GenerateArgs, GenerateOutcome};
use crate::aggregator::{aggregate, calculate_top_leaves, calculate_value_distribution, Aggregate};
use crate::output::diagnostics::{emit_or_warn, Diagnostic};
use crate::output::{write_html, write_report, DiagnosticsSink, DirectorySink, NullSink};
use crate::parser::{
    aggregate_records, clean_records, load_table, resolve_schema, TableSchema, TreemapReport,
};
use crate::treemap::{generate_text_summary, generate_treemap};
use crate::utils::config::{BASE_TITLE, MAX_CANVAS_SIDE, SCHEMA_VERSION};
use crate::utils::error::LoadError;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the generate command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Generate command arguments
///
/// # Returns
/// Counters describing what was produced
///
/// # Errors
/// * Input file missing, empty or unparsable
/// * Value column cannot be resolved
/// * No valid records after cleaning
/// * File write errors
///
/// # Example
/// ```ignore
/// let args = GenerateArgs {
///     input: PathBuf::from("CS_rootcause.csv"),
///     output_json: Some(PathBuf::from("report.json")),
///     ..Default::default()
/// };
///
/// execute_generate(args)?;
/// ```
pub fn execute_generate(args: GenerateArgs) -> Result<GenerateOutcome> {
    let start_time = Instant::now();

    info!("Starting treemap generation for: {}", args.input.display());

    // Step 1: Load table
    info!("Step 1/6: Loading input table...");
    let table = load_table(&args.input, args.delimiter).context("Failed to load input table")?;

    // Step 2: Resolve columns and clean rows
    info!("Step 2/6: Resolving columns and cleaning rows...");
    let schema = resolve_schema(&table, &args.levels, args.value_column.as_deref())
        .context("Failed to resolve input columns")?;

    let mut sink: Box<dyn DiagnosticsSink> = match &args.debug_dir {
        Some(dir) => Box::new(DirectorySink::new(
            dir,
            schema.level_names.clone(),
            schema.value_column.clone(),
        )),
        None => Box::new(NullSink),
    };
    emit_or_warn(sink.as_mut(), Diagnostic::RawTable(&table));

    let (cleaned, stats) = clean_records(&table, &schema);
    emit_or_warn(sink.as_mut(), Diagnostic::CleanedRecords(&cleaned));

    if stats.dropped > 0 {
        warn!(
            "Dropped {} of {} rows with a missing, non-numeric or non-positive value",
            stats.dropped, stats.total_rows
        );
    }
    if cleaned.is_empty() {
        return Err(LoadError::EmptyDataset).context("Nothing to visualize");
    }

    // Step 3: Aggregate rows
    info!("Step 3/6: Aggregating rows by hierarchy...");
    let records = aggregate_records(&cleaned).context("Failed to aggregate records")?;
    emit_or_warn(sink.as_mut(), Diagnostic::AggregatedRecords(&records));

    debug!("{} unique hierarchy paths", records.len());

    // Step 4: Build tree, analyze, rewrite
    info!("Step 4/6: Building hierarchy and collapsing single-child links...");
    let result = aggregate(&records, schema.depth(), sink.as_mut())
        .context("Failed to build aggregate hierarchy")?;

    let distribution = calculate_value_distribution(&result.leaves);
    info!("Value distribution: {}", distribution.summary());

    let merged = result.merged_direct_value();
    if merged > 0.0 {
        info!(
            "{} of the total sits directly on intermediate nodes and is merged into their totals",
            merged
        );
    }

    debug!("Top 3 leaves:");
    for (i, leaf) in calculate_top_leaves(&result.leaves, 3).iter().enumerate() {
        debug!(
            "  {}. {} ({:.2}%): {}",
            i + 1,
            leaf.value,
            leaf.percentage,
            leaf.original_path_string
        );
    }

    // Step 5: Render treemap (if requested)
    let title = args
        .title
        .clone()
        .unwrap_or_else(|| format!("{}: {}", BASE_TITLE, schema.value_column));

    let svg_content = if args.output_html.is_some() {
        info!("Step 5/6: Rendering treemap...");
        let config = args
            .treemap_config
            .clone()
            .with_title(title.clone())
            .with_value_label(schema.value_column.clone());
        let svg = generate_treemap(&result, Some(&config))
            .context("Failed to render treemap")?;
        Some(svg)
    } else {
        info!("Step 5/6: Skipping treemap rendering (not requested)");
        None
    };

    // Step 6: Write outputs
    info!("Step 6/6: Writing output files...");

    if let (Some(svg), Some(html_path)) = (svg_content, &args.output_html) {
        write_html(&svg, &title, html_path).context("Failed to write treemap HTML")?;
        info!("✓ Treemap written to: {}", html_path.display());
    }

    if let Some(json_path) = &args.output_json {
        let report = build_report(&result, &schema, &args.input.display().to_string());
        write_report(&report, json_path).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", json_path.display());
    }

    // Print text summary (if requested)
    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("TREEMAP SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Source:       {}", args.input.display());
        println!("Value Column: {}", schema.value_column);
        println!("Total:        {}", result.total());
        println!("Rows Kept:    {} of {}", stats.kept, stats.total_rows);
        println!("Leaves:       {}", result.leaves.len());
        println!("Collapsed:    {} links", result.single_steps.len());
        println!("\n{}", generate_text_summary(&result.leaves, 10));
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Generation completed in {:.2}s", elapsed.as_secs_f64());

    Ok(GenerateOutcome {
        value_column: schema.value_column.clone(),
        total_value: result.total(),
        record_count: records.len(),
        leaf_count: result.leaves.len(),
        single_step_count: result.single_steps.len(),
    })
}

/// Assemble the JSON report for an aggregate
///
/// **Public** - also useful for library users that skip the CLI
pub fn build_report(result: &Aggregate, schema: &TableSchema, source: &str) -> TreemapReport {
    TreemapReport {
        version: SCHEMA_VERSION.to_string(),
        source: source.to_string(),
        value_column: schema.value_column.clone(),
        depth: schema.depth(),
        total_value: result.total(),
        record_count: result.tree.record_count,
        leaf_count: result.leaves.len(),
        single_steps: result.single_steps.to_entries(),
        leaves: result.leaves.clone(),
        generated_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// Validate generate arguments
///
/// **Public** - can be called before execute_generate for early validation
pub fn validate_args(args: &GenerateArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if !args.input.exists() {
        anyhow::bail!("Input CSV file not found at {}", args.input.display());
    }

    if args.levels.is_empty() {
        anyhow::bail!("At least one hierarchy level is required");
    }

    if args.levels.iter().any(|l| l.trim().is_empty()) {
        anyhow::bail!("Hierarchy level names cannot be empty");
    }

    if matches!(args.delimiter, b'"' | b'\n' | b'\r') || !args.delimiter.is_ascii() {
        anyhow::bail!("Delimiter must be a single ASCII character other than quote or newline");
    }

    let config = &args.treemap_config;
    if config.width == 0 || config.height == 0 {
        anyhow::bail!("Treemap width and height must be greater than 0");
    }

    if config.width > MAX_CANVAS_SIDE || config.height > MAX_CANVAS_SIDE {
        anyhow::bail!("Treemap size is too large (max {} px per side)", MAX_CANVAS_SIDE);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::treemap::TreemapConfig;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn input_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Level 1;Level 2;Total\nA;X;10\n").unwrap();
        file
    }

    #[test]
    fn test_validate_args_valid() {
        let file = input_file();
        let args = GenerateArgs {
            input: file.path().to_path_buf(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_empty_input() {
        let args = GenerateArgs::default();
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_missing_input() {
        let args = GenerateArgs {
            input: "/no/such/input.csv".into(),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_no_levels() {
        let file = input_file();
        let args = GenerateArgs {
            input: file.path().to_path_buf(),
            levels: Vec::new(),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_blank_level_name() {
        let file = input_file();
        let args = GenerateArgs {
            input: file.path().to_path_buf(),
            levels: vec!["Level 1".to_string(), "  ".to_string()],
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_quote_delimiter() {
        let file = input_file();
        let args = GenerateArgs {
            input: file.path().to_path_buf(),
            delimiter: b'"',
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_zero_width() {
        let file = input_file();
        let args = GenerateArgs {
            input: file.path().to_path_buf(),
            treemap_config: TreemapConfig::new().with_size(0, 800),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_canvas_too_large() {
        let file = input_file();
        let args = GenerateArgs {
            input: file.path().to_path_buf(),
            treemap_config: TreemapConfig::new().with_size(1200, MAX_CANVAS_SIDE + 1),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }
}
