//! Hierarchy Treemap CLI
//!
//! Turns semicolon-delimited category exports into collapsed, nested
//! treemaps and JSON reports.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use hierarchy_treemap::commands::{
    display_schema, display_version, execute_generate, validate_args, validate_report_file,
    GenerateArgs,
};
use hierarchy_treemap::treemap::TreemapConfig;
use hierarchy_treemap::utils::config::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Hierarchy Treemap - nested proportional views of categorical data
#[derive(Parser, Debug)]
#[command(name = "treemap")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate a CSV file and render its treemap
    Generate {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the HTML treemap
        #[arg(short, long, default_value = "treemap.html")]
        output: PathBuf,

        /// Output path for the JSON report (optional)
        #[arg(short, long)]
        json: Option<PathBuf>,

        /// Hierarchy columns, outermost first
        #[arg(
            long,
            value_delimiter = ',',
            default_value = "Level 1,Level 2,Level 3,Level 4"
        )]
        levels: Vec<String>,

        /// Value column (detected from the header when omitted)
        #[arg(long)]
        value_column: Option<String>,

        /// Field delimiter
        #[arg(short, long, default_value = ";")]
        delimiter: char,

        /// Chart title
        #[arg(long)]
        title: Option<String>,

        /// Treemap width in pixels
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: usize,

        /// Treemap height in pixels
        #[arg(long, default_value_t = DEFAULT_HEIGHT)]
        height: usize,

        /// Write intermediate CSV/JSON dumps to this directory
        #[arg(long, env = "TREEMAP_DEBUG_DIR")]
        debug_dir: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Generate {
            input,
            output,
            json,
            levels,
            value_column,
            delimiter,
            title,
            width,
            height,
            debug_dir,
            summary,
        } => {
            if !delimiter.is_ascii() {
                anyhow::bail!("Delimiter must be an ASCII character, got '{}'", delimiter);
            }

            let args = GenerateArgs {
                input,
                output_html: Some(output),
                output_json: json,
                levels: levels.into_iter().map(|l| l.trim().to_string()).collect(),
                value_column,
                delimiter: delimiter as u8,
                title,
                treemap_config: TreemapConfig::new().with_size(width, height),
                debug_dir,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_generate(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
