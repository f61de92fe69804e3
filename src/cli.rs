//! CLI argument parsing for kernel-sweep

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the result tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One CSV file per sheet (default)
    Csv,
    /// Single JSON workbook
    Json,
    /// Both CSV and JSON
    Both,
}

#[derive(Parser, Debug)]
#[command(name = "kernel-sweep")]
#[command(version)]
#[command(about = "Aggregate and compare smoothing-kernel sweep results", long_about = None)]
pub struct Cli {
    /// Results root containing <modality>/<run-group>/ directories
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Where to write the tables (defaults to ROOT)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// TOML file with aggregation settings
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum runs per run-group (overrides the config file)
    #[arg(long = "max-runs", value_name = "N")]
    pub max_runs: Option<usize>,

    /// Enable trace-level logging to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Output directory, falling back to the results root
    pub fn output_dir(&self) -> &PathBuf {
        self.output_dir.as_ref().unwrap_or(&self.root)
    }
}
