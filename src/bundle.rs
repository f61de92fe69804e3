//! Result and parameter bundle loading
//!
//! Bundles are written by the cross-validation pipeline, one pair per
//! run-group directory. Each file holds a single map, serialized either as
//! JSON or as MessagePack; the format is detected from the first byte.

use crate::config::AggregationConfig;
use crate::error::RunGroupError;
use crate::metrics::{Metric, MetricValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Embedded parameter keys, in order of precedence
const EMBEDDED_PARAMS_KEYS: [&str; 2] = ["params", "model_params"];

/// Serialization format of a bundle file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleFormat {
    Json,
    MessagePack,
}

impl BundleFormat {
    /// JSON bundles always start with an object; anything else is MessagePack
    pub fn detect(bytes: &[u8]) -> BundleFormat {
        match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') => BundleFormat::Json,
            _ => BundleFormat::MessagePack,
        }
    }
}

/// One top-level value of a result bundle
///
/// Numeric shapes decode straight into `MetricValue`, so NaN runs in
/// MessagePack bundles survive. Everything else is kept as a generic value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BundleEntry {
    Metric(MetricValue),
    Other(serde_json::Value),
}

/// Decoded result bundle before metric selection
pub type BundleDocument = BTreeMap<String, BundleEntry>;

/// Parameters of the evaluated model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterBundle {
    /// Receptive-field values, one per run (possibly nested)
    pub rf: Option<serde_json::Value>,
}

impl ParameterBundle {
    fn from_map(map: &serde_json::Map<String, serde_json::Value>) -> ParameterBundle {
        ParameterBundle {
            rf: map.get("rf").cloned(),
        }
    }

    fn from_entry(entry: &BundleEntry) -> ParameterBundle {
        match entry {
            BundleEntry::Other(serde_json::Value::Object(map)) => Self::from_map(map),
            _ => ParameterBundle::default(),
        }
    }
}

/// Metric values of one run-group, keyed by metric
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultBundle {
    pub metrics: BTreeMap<Metric, MetricValue>,
    /// Parameters embedded in the result bundle itself
    pub params: Option<ParameterBundle>,
}

impl ResultBundle {
    pub fn get(&self, metric: Metric) -> Option<&MetricValue> {
        self.metrics.get(&metric)
    }

    /// Select metrics and embedded parameters from a decoded bundle
    ///
    /// Keys outside the metric set are ignored. A metric whose value has no
    /// recognised shape is dropped so it reads as absent downstream.
    pub fn from_document(doc: BundleDocument) -> ResultBundle {
        let params = EMBEDDED_PARAMS_KEYS
            .iter()
            .find_map(|key| doc.get(*key))
            .map(ParameterBundle::from_entry);

        let mut metrics = BTreeMap::new();
        for (key, entry) in doc {
            let Some(metric) = Metric::from_key(&key) else {
                if !EMBEDDED_PARAMS_KEYS.contains(&key.as_str()) {
                    debug!(key = %key, "ignoring unknown bundle key");
                }
                continue;
            };
            match entry {
                BundleEntry::Metric(value) => {
                    metrics.insert(metric, value);
                }
                BundleEntry::Other(_) => {
                    warn!(metric = %metric, "unrecognised metric shape, treating as absent")
                }
            }
        }

        ResultBundle { metrics, params }
    }
}

/// Everything loaded from one run-group directory
#[derive(Debug, Clone)]
pub struct LoadedRunGroup {
    pub score_file: PathBuf,
    pub results: ResultBundle,
    /// Effective parameters: the embedded bundle wins over the params file
    pub params: ParameterBundle,
}

impl LoadedRunGroup {
    /// Score file name as used for identifier parsing
    pub fn score_file_name(&self) -> &str {
        self.score_file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

/// Decode a bundle file, JSON or MessagePack, into `T`
pub fn read_document<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    use anyhow::Context;

    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let doc = match BundleFormat::detect(&bytes) {
        BundleFormat::Json => serde_json::from_slice(&bytes)
            .with_context(|| format!("Invalid JSON bundle {}", path.display()))?,
        BundleFormat::MessagePack => rmp_serde::from_slice(&bytes)
            .with_context(|| format!("Invalid MessagePack bundle {}", path.display()))?,
    };
    Ok(doc)
}

/// List bundle files in `dir` with the given prefix, sorted by name
pub fn find_bundle_files(dir: &Path, prefix: &str, extensions: &[String]) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            let name_matches = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix));
            let ext_matches = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| extensions.iter().any(|x| x == e));
            name_matches && ext_matches
        })
        .collect();
    files.sort();
    files
}

/// Load the result bundle and parameters of one run-group directory
pub fn load_run_group(
    dir: &Path,
    config: &AggregationConfig,
) -> Result<LoadedRunGroup, RunGroupError> {
    let score_file = find_bundle_files(dir, &config.score_prefix, &config.bundle_extensions)
        .into_iter()
        .next()
        .ok_or_else(|| RunGroupError::skippable(dir, "no score file"))?;

    let doc: BundleDocument = read_document(&score_file)
        .map_err(|e| RunGroupError::skippable(&score_file, format!("{:#}", e)))?;
    let mut results = ResultBundle::from_document(doc);

    let params = match results.params.take() {
        Some(embedded) => embedded,
        None => load_params_file(dir, config)?,
    };

    Ok(LoadedRunGroup {
        score_file,
        results,
        params,
    })
}

fn load_params_file(
    dir: &Path,
    config: &AggregationConfig,
) -> Result<ParameterBundle, RunGroupError> {
    let Some(path) = find_bundle_files(dir, &config.params_prefix, &config.bundle_extensions)
        .into_iter()
        .next()
    else {
        debug!(dir = %dir.display(), "no params file, continuing without parameters");
        return Ok(ParameterBundle::default());
    };

    let doc: serde_json::Map<String, serde_json::Value> = read_document(&path)
        .map_err(|e| RunGroupError::skippable(&path, format!("{:#}", e)))?;
    Ok(ParameterBundle::from_map(&doc))
}
