// Summary statistics per run-group
//
// Statistics are taken over the flattened metric values: per-case vectors
// are pooled with per-run scalars. Standard deviation is the population
// form (divide by n). The mean is accumulated in f64; trueno and aprender
// then work on residuals about it, so f32 precision only applies to the
// spread and never to the magnitude of the data.

use crate::bundle::ResultBundle;
use crate::identifier::RunGroupKey;
use crate::metrics::Metric;
use aprender::stats::DescriptiveStats;
use trueno::Vector;

/// Which statistic a summary row holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    Mean,
    Std,
    Median,
}

impl SummaryKind {
    pub const ALL: [SummaryKind; 3] = [SummaryKind::Mean, SummaryKind::Std, SummaryKind::Median];

    /// Output sheet holding rows of this kind
    pub fn sheet_name(self) -> &'static str {
        match self {
            SummaryKind::Mean => "mean_results",
            SummaryKind::Std => "std_results",
            SummaryKind::Median => "median_results",
        }
    }
}

/// One statistic for every metric of one run-group
///
/// `None` marks a metric that is not available for the run-group.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub key: RunGroupKey,
    pub kind: SummaryKind,
    /// One entry per metric, in `Metric::ALL` order
    pub values: Vec<(Metric, Option<f64>)>,
}

impl SummaryRow {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values
            .iter()
            .find(|(m, _)| *m == metric)
            .and_then(|(_, v)| *v)
    }
}

/// Mean, std and median rows of one run-group
#[derive(Debug, Clone, PartialEq)]
pub struct RunGroupSummary {
    pub mean: SummaryRow,
    pub std: SummaryRow,
    pub median: SummaryRow,
}

/// Calculate median using aprender's DescriptiveStats
///
/// Even-length inputs interpolate between the two middle values.
pub fn median(vector: &Vector<f32>) -> anyhow::Result<f32> {
    let stats = DescriptiveStats::new(vector);
    stats
        .quantile(0.5)
        .map_err(|e| anyhow::anyhow!("Failed to compute median: {}", e))
}

/// f64 mean of `values`, refined by the mean of its residuals
fn centered_mean(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let first = values.iter().sum::<f64>() / n;
    first + values.iter().map(|&v| v - first).sum::<f64>() / n
}

/// Residuals about `mean`, small enough for f32 SIMD kernels
fn residuals(values: &[f64], mean: f64) -> Vector<f32> {
    let data: Vec<f32> = values.iter().map(|&v| (v - mean) as f32).collect();
    Vector::from_slice(&data)
}

fn statistic(values: &[f64], kind: SummaryKind) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mean = centered_mean(values);
    if !mean.is_finite() {
        return None;
    }

    let result = match kind {
        SummaryKind::Mean => mean,
        SummaryKind::Std => {
            let sum_sq = residuals(values, mean).sum_of_squares().ok()?;
            (f64::from(sum_sq) / values.len() as f64).sqrt()
        }
        SummaryKind::Median => mean + f64::from(median(&residuals(values, mean)).ok()?),
    };

    result.is_finite().then_some(result)
}

/// Summarize every metric of a result bundle
pub fn summarize(key: &RunGroupKey, bundle: &ResultBundle) -> RunGroupSummary {
    let flattened: Vec<(Metric, Option<Vec<f64>>)> = Metric::ALL
        .iter()
        .map(|&metric| (metric, bundle.get(metric).map(|v| v.flatten())))
        .collect();

    let row = |kind: SummaryKind| SummaryRow {
        key: key.clone(),
        kind,
        values: flattened
            .iter()
            .map(|(metric, values)| {
                let stat = values.as_deref().and_then(|vs| statistic(vs, kind));
                (*metric, stat)
            })
            .collect(),
    };

    RunGroupSummary {
        mean: row(SummaryKind::Mean),
        std: row(SummaryKind::Std),
        median: row(SummaryKind::Median),
    }
}
