//! Load, transform, write.
//!
//! The stages run strictly in sequence. A failure in any stage aborts the
//! run and nothing is written: the writer only starts once the whole table
//! has been built.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::error::LabelflatError;
use crate::output::write_table;
use crate::record::io_json::read_document;
use crate::transform::{transform_document, TransformReport};

/// Per-run overrides on top of a [`Config`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Read the export from here instead of [`Config::input_path`].
    pub input: Option<PathBuf>,
    /// Write the table here instead of [`Config::output_path`].
    pub output: Option<PathBuf>,
    /// Transform and report without writing anything.
    pub dry_run: bool,
}

/// What a pipeline run did.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    pub input: PathBuf,
    /// `None` on a dry run.
    pub output: Option<PathBuf>,
    pub columns: Vec<String>,
    pub report: TransformReport,
}

/// Runs the full pipeline for `config`.
///
/// # Errors
/// The first error from any stage, unchanged.
pub fn run_pipeline(config: &Config, options: &RunOptions) -> Result<RunSummary, LabelflatError> {
    let input = options.input.clone().unwrap_or_else(|| config.input_path());
    let output = options.output.clone().unwrap_or_else(|| config.output_path());

    tracing::info!(
        project = %config.project_name,
        format = %config.format,
        dry_run = options.dry_run,
        "starting conversion"
    );

    let document = read_document(&input)?;
    let transformed = transform_document(&document, &config.transform)?;
    drop(document);

    let written = if options.dry_run {
        tracing::info!("dry run, skipping write");
        None
    } else {
        write_table(&output, &transformed.table, config.format)?;
        Some(output)
    };

    Ok(RunSummary {
        input,
        output: written,
        columns: transformed.table.columns().to_vec(),
        report: transformed.report,
    })
}
