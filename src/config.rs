//! Run configuration.
//!
//! Settings arrive as environment-style key/value pairs. They are collected
//! into a [`RawConfig`] and validated once by [`Config::resolve`], before any
//! file is touched. Every failure names the offending key.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::LabelflatError;
use crate::output::OutputFormat;
use crate::transform::{ExclusionSet, ProjectionMode, TransformOptions};

pub const PROJECT_NAME_KEY: &str = "HASTY_PROJECT_NAME";
pub const WORKING_DIR_KEY: &str = "WORKING_DIR";
pub const FORMAT_KEY: &str = "CONVERT_FORMAT";
pub const EXCLUDE_KEY: &str = "EXCLUDE_LABELS";
pub const STRICT_COLUMNS_KEY: &str = "STRICT_COLUMNS";

/// Appended to the sanitized project name to form artifact names.
pub const BASE_FILENAME_SUFFIX: &str = "_hasty_project_annotations";

static NON_ALPHANUMERIC_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("sanitize pattern is valid"));

/// Unvalidated settings, as read from the environment or the command line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawConfig {
    pub project_name: Option<String>,
    pub working_dir: Option<String>,
    pub format: Option<String>,
    pub exclude: Option<String>,
    pub strict_columns: Option<String>,
}

impl RawConfig {
    /// Reads every known key through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            project_name: lookup(PROJECT_NAME_KEY),
            working_dir: lookup(WORKING_DIR_KEY),
            format: lookup(FORMAT_KEY),
            exclude: lookup(EXCLUDE_KEY),
            strict_columns: lookup(STRICT_COLUMNS_KEY),
        }
    }
}

/// Validated settings for one pipeline run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub project_name: String,
    pub working_dir: PathBuf,
    pub format: OutputFormat,
    pub transform: TransformOptions,
}

impl Config {
    /// Validates raw settings.
    ///
    /// # Errors
    /// [`LabelflatError::Configuration`] for a missing required key, an
    /// unknown or not compiled-in format selector, or an unparseable
    /// `STRICT_COLUMNS`.
    pub fn resolve(raw: RawConfig) -> Result<Self, LabelflatError> {
        let project_name = required(PROJECT_NAME_KEY, raw.project_name)?;
        let working_dir = required(WORKING_DIR_KEY, raw.working_dir)?;
        let format_name = required(FORMAT_KEY, raw.format)?;

        let format: OutputFormat =
            format_name
                .parse()
                .map_err(|e: LabelflatError| LabelflatError::Configuration {
                    key: FORMAT_KEY,
                    message: e.to_string(),
                })?;
        if !format.is_available() {
            return Err(LabelflatError::Configuration {
                key: FORMAT_KEY,
                message: format!("'{format}' is not supported by this build"),
            });
        }

        let strict = match raw.strict_columns.as_deref().map(str::trim) {
            None | Some("") => false,
            Some(value) => parse_flag(value).ok_or_else(|| LabelflatError::Configuration {
                key: STRICT_COLUMNS_KEY,
                message: format!("expected true or false, got '{value}'"),
            })?,
        };

        let exclude = raw
            .exclude
            .as_deref()
            .map(ExclusionSet::parse)
            .unwrap_or_default();

        Ok(Self {
            project_name,
            working_dir: PathBuf::from(working_dir),
            format,
            transform: TransformOptions {
                exclude,
                projection: ProjectionMode::from_strict(strict),
            },
        })
    }

    /// Reads and validates settings through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LabelflatError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::resolve(RawConfig::from_lookup(lookup))
    }

    /// Reads and validates settings from the process environment.
    pub fn from_env() -> Result<Self, LabelflatError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Artifact name without extension, e.g. `My_Project_hasty_project_annotations`.
    pub fn base_filename(&self) -> String {
        base_filename(&self.project_name)
    }

    /// Where the export JSON is expected.
    pub fn input_path(&self) -> PathBuf {
        self.artifact_path("json")
    }

    /// Where the table is written.
    pub fn output_path(&self) -> PathBuf {
        self.artifact_path(self.format.extension())
    }

    fn artifact_path(&self, extension: &str) -> PathBuf {
        self.working_dir
            .join(format!("{}.{}", self.base_filename(), extension))
    }

    /// The working directory.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

/// Replaces every run of non-alphanumeric characters with one underscore.
pub fn sanitize_project_name(project_name: &str) -> String {
    NON_ALPHANUMERIC_RUN
        .replace_all(project_name, "_")
        .into_owned()
}

/// Derives the artifact base name from a project identifier.
pub fn base_filename(project_name: &str) -> String {
    format!(
        "{}{}",
        sanitize_project_name(project_name),
        BASE_FILENAME_SUFFIX
    )
}

fn required(key: &'static str, value: Option<String>) -> Result<String, LabelflatError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(LabelflatError::Configuration {
            key,
            message: "value is empty".to_string(),
        }),
        None => Err(LabelflatError::Configuration {
            key,
            message: "not set".to_string(),
        }),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
