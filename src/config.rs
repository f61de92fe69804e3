// Configuration for the aggregation pass
//
// Every field has a default matching the naming conventions of the
// cross-validation pipeline that writes the result tree, so an empty
// config file (or none at all) reproduces the historical report.

use crate::error::ConfigError;
use crate::metrics::Metric;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for discovery, aggregation and comparison
///
/// # Example
/// ```
/// use kernel_sweep::config::AggregationConfig;
///
/// let config = AggregationConfig::default();
/// assert_eq!(config.max_runs, 50);
/// assert_eq!(config.baseline_kernel_width, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AggregationConfig {
    /// Fixed run capacity of every raw table
    ///
    /// Run-groups with more runs are rejected, never truncated.
    pub max_runs: usize,

    /// Kernel width whose run-groups start a comparison row
    pub baseline_kernel_width: i64,

    /// Number of kernel-width pairs (1,2), (3,4), ... per comparison row
    pub comparison_pairs: usize,

    /// Metric fed to the paired signed-rank test
    pub compared_metric: Metric,

    /// File name prefix of result bundles
    pub score_prefix: String,

    /// File name prefix of parameter bundles
    pub params_prefix: String,

    /// Accepted bundle file extensions, without the dot
    pub bundle_extensions: Vec<String>,

    /// Base name of the exported workbook
    pub output_basename: String,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            max_runs: 50,
            baseline_kernel_width: 1,
            comparison_pairs: 12,
            compared_metric: Metric::TestRocAuc,
            score_prefix: "scores_".to_string(),
            params_prefix: "params_".to_string(),
            bundle_extensions: vec!["npy".to_string(), "json".to_string(), "msgpack".to_string()],
            output_basename: "smoothing_kernel_results".to_string(),
        }
    }
}

impl AggregationConfig {
    /// Load configuration from a TOML file; missing fields take defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AggregationConfig =
            toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_runs == 0 {
            return Err(ConfigError::Invalid("max_runs must be >= 1".to_string()));
        }

        if self.comparison_pairs == 0 {
            return Err(ConfigError::Invalid(
                "comparison_pairs must be >= 1".to_string(),
            ));
        }

        if self.score_prefix.is_empty() || self.params_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "bundle prefixes must not be empty".to_string(),
            ));
        }

        if self.score_prefix == self.params_prefix {
            return Err(ConfigError::Invalid(format!(
                "score and params prefixes must differ, both are '{}'",
                self.score_prefix
            )));
        }

        if self.bundle_extensions.is_empty() {
            return Err(ConfigError::Invalid(
                "bundle_extensions must list at least one extension".to_string(),
            ));
        }

        if let Some(ext) = self.bundle_extensions.iter().find(|e| e.starts_with('.')) {
            return Err(ConfigError::Invalid(format!(
                "bundle extension '{}' must be given without the leading dot",
                ext
            )));
        }

        if self.output_basename.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "output_basename must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
