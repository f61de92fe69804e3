//! Error types for the aggregation pass
//!
//! Failures are scoped: a `RunGroupError` excludes one run-group, a
//! `ComparisonError` voids one comparison cell, and only `PassError` or
//! `ReportError` stop the whole pass.

use std::path::PathBuf;
use thiserror::Error;

/// Failure confined to a single run-group directory
#[derive(Error, Debug)]
pub enum RunGroupError {
    /// Missing, unreadable or undecodable result bundle
    #[error("skipping {path}: {reason}")]
    Skippable { path: PathBuf, reason: String },

    /// Neither primary nor fallback source produced an identifier
    #[error("cannot resolve {field} for {run_group}: {}", attempts.join("; "))]
    IdentifierResolution {
        run_group: String,
        field: &'static str,
        attempts: Vec<String>,
    },

    /// More runs than the raw table can hold
    #[error("{run_group} has {runs} runs, exceeding the capacity of {capacity}")]
    CapacityExceeded {
        run_group: String,
        runs: usize,
        capacity: usize,
    },
}

impl RunGroupError {
    pub fn skippable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Skippable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Failure of a single paired significance test
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComparisonError {
    #[error("paired samples differ in length: {left} vs {right}")]
    MismatchedPairLength { left: usize, right: usize },

    #[error("no non-zero differences between paired samples")]
    DegenerateSample,

    #[error("paired samples contain non-finite values")]
    NonFiniteSample,
}

/// Failure while assembling the output tables
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("sheet '{sheet}' expects {expected} columns, row has {actual}")]
    ShapeMismatch {
        sheet: String,
        expected: usize,
        actual: usize,
    },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize workbook: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failure of the pass as a whole
#[derive(Error, Debug)]
pub enum PassError {
    #[error("cannot read results root {path}: {source}")]
    UnreadableRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no usable run-group found under {0}")]
    NoRunGroups(PathBuf),
}

/// Invalid aggregation configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
