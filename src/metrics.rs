//! Enumerated metric set and metric value shapes
//!
//! A result bundle stores each metric either as one scalar, one value per
//! run, or one vector per run (per-case or per-threshold metrics). The
//! shape is fixed when the bundle is decoded and carried as a tag, so
//! nothing downstream inspects array shapes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Metrics consumed from result bundles, in report column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TestRocAuc,
    TestImageWiseDice,
    TestImageWiseHausdorff,
    TestAccuracy,
    TestF1,
    TestJaccard,
    TestThresholdedVolumeDeltas,
    TestUnthresholdedVolumeDeltas,
    TestImageWiseErrorRatios,
    EvaluationThresholds,
}

impl Metric {
    pub const ALL: [Metric; 10] = [
        Metric::TestRocAuc,
        Metric::TestImageWiseDice,
        Metric::TestImageWiseHausdorff,
        Metric::TestAccuracy,
        Metric::TestF1,
        Metric::TestJaccard,
        Metric::TestThresholdedVolumeDeltas,
        Metric::TestUnthresholdedVolumeDeltas,
        Metric::TestImageWiseErrorRatios,
        Metric::EvaluationThresholds,
    ];

    /// The metric whose length defines a run-group's run count
    pub const RUN_COUNT_SOURCE: Metric = Metric::TestRocAuc;

    /// Bundle key and report column name
    pub fn key(self) -> &'static str {
        match self {
            Metric::TestRocAuc => "test_roc_auc",
            Metric::TestImageWiseDice => "test_image_wise_dice",
            Metric::TestImageWiseHausdorff => "test_image_wise_hausdorff",
            Metric::TestAccuracy => "test_accuracy",
            Metric::TestF1 => "test_f1",
            Metric::TestJaccard => "test_jaccard",
            Metric::TestThresholdedVolumeDeltas => "test_thresholded_volume_deltas",
            Metric::TestUnthresholdedVolumeDeltas => "test_unthresholded_volume_deltas",
            Metric::TestImageWiseErrorRatios => "test_image_wise_error_ratios",
            Metric::EvaluationThresholds => "evaluation_thresholds",
        }
    }

    pub fn from_key(key: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.key() == key)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::from_key(s).ok_or_else(|| format!("unknown metric '{}'", s))
    }
}

/// One metric's stored value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Scalar(f64),
    FlatSequence(Vec<f64>),
    NestedSequence(Vec<Vec<f64>>),
}

impl MetricValue {
    /// Collapse one level of nesting into a flat sequence
    ///
    /// Per-case grouping is lost for nested values; summary statistics
    /// only need the pooled values.
    pub fn flatten(&self) -> Vec<f64> {
        match self {
            MetricValue::Scalar(x) => vec![*x],
            MetricValue::FlatSequence(values) => values.clone(),
            MetricValue::NestedSequence(inner) => inner.iter().flatten().copied().collect(),
        }
    }

    /// Number of runs the value spans (outer length)
    pub fn run_count(&self) -> usize {
        match self {
            MetricValue::Scalar(_) => 1,
            MetricValue::FlatSequence(values) => values.len(),
            MetricValue::NestedSequence(inner) => inner.len(),
        }
    }
}
