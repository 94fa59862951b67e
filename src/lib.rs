//! Labelflat: flatten annotation exports into analytics tables.
//!
//! Labelflat takes the nested per-image, per-label JSON export of an
//! annotation tool and turns it into one flat row per (image x label) pair,
//! written as CSV or Parquet.
//!
//! # Modules
//!
//! - [`record`]: Source record types and the JSON loader
//! - [`transform`]: Filtering, flattening, projection and row expansion
//! - [`table`]: Output rows and column layout
//! - [`output`]: CSV and Parquet writers
//! - [`config`]: Environment-style configuration
//! - [`pipeline`]: Load, transform and write in one call
//! - [`error`]: Error types for labelflat operations

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod table;
pub mod transform;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

pub use config::{Config, RawConfig};
pub use error::LabelflatError;
pub use output::OutputFormat;
pub use pipeline::{run_pipeline, RunOptions, RunSummary};
pub use table::{OutputRow, Table};
pub use transform::{transform_document, TransformOptions, TransformReport};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info";

/// The labelflat CLI application.
#[derive(Parser)]
#[command(name = "labelflat")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert an annotation export into a CSV or Parquet table.
    Convert(ConvertArgs),
}

/// Arguments for the convert subcommand.
///
/// Every setting falls back to its environment variable.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Project name; artifact file names are derived from it.
    #[arg(long, env = config::PROJECT_NAME_KEY)]
    project_name: Option<String>,

    /// Directory holding the export and receiving the table.
    #[arg(long, env = config::WORKING_DIR_KEY)]
    working_dir: Option<String>,

    /// Output format ('csv' or 'parquet').
    #[arg(long, env = config::FORMAT_KEY)]
    format: Option<String>,

    /// Comma-separated label fields to drop before flattening.
    #[arg(long, env = config::EXCLUDE_KEY)]
    exclude: Option<String>,

    /// Fail on label fields outside class_name, bbox, foot, sex, individual.
    #[arg(
        long,
        env = config::STRICT_COLUMNS_KEY,
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    strict_columns: Option<String>,

    /// Read the export from this file instead of the working directory.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Write the table to this file instead of the working directory.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Transform and report without writing the table.
    #[arg(long)]
    dry_run: bool,

    /// Format of the summary printed to stdout.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

/// Summary output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Run the labelflat CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), LabelflatError> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        None => {
            println!("labelflat {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Flatten annotation exports into analytics tables.");
            println!();
            println!("Run 'labelflat --help' for usage information.");
            Ok(())
        }
    }
}

/// Installs the stderr log subscriber. Later calls are no-ops.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), LabelflatError> {
    let config = Config::resolve(RawConfig {
        project_name: args.project_name,
        working_dir: args.working_dir,
        format: args.format,
        exclude: args.exclude,
        strict_columns: args.strict_columns,
    })?;

    let options = RunOptions {
        input: args.input,
        output: args.output,
        dry_run: args.dry_run,
    };
    let summary = run_pipeline(&config, &options)?;

    match args.report {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)
                .map_err(|e| LabelflatError::Io(e.into()))?;
            println!("{json}");
        }
        ReportFormat::Text => {
            print!("{}", summary.report);
            match &summary.output {
                Some(path) => println!("Wrote {}", path.display()),
                None => println!("Dry run: nothing written"),
            }
        }
    }

    Ok(())
}
