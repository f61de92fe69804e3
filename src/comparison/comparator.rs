// Kernel-width sweep comparison
//
// Every baseline run-group (kernel width 1 by default) opens one row. For
// each pair (1,2), (3,4), ... the first run-group of the same model family
// at each width is looked up and the two are compared run by run with the
// signed-rank test. A missing partner or a failed test voids that cell
// only.

use super::wilcoxon::wilcoxon_signed_rank;
use crate::aggregate::{GlobalResults, RawCell, RawTable};
use crate::config::AggregationConfig;
use crate::error::ComparisonError;
use crate::identifier::strip_trailing_suffix;
use crate::metrics::Metric;
use std::fmt;
use tracing::{info, warn};

/// Two kernel widths compared in one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelWidthPair {
    pub lower: i64,
    pub upper: i64,
}

impl KernelWidthPair {
    /// Column label, e.g. `p1-2`
    pub fn label(&self) -> String {
        format!("p{}-{}", self.lower, self.upper)
    }
}

impl fmt::Display for KernelWidthPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.lower, self.upper)
    }
}

/// The pairs (1,2), (3,4), ..., (2k-1, 2k)
pub fn kernel_width_pairs(count: usize) -> Vec<KernelWidthPair> {
    (1..=count as i64)
        .map(|k| KernelWidthPair {
            lower: 2 * k - 1,
            upper: 2 * k,
        })
        .collect()
}

/// Significance of every kernel-width pair for one model family
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub model_base: String,
    pub compared_variable: Metric,
    /// p-value per pair; `None` when not available
    pub cells: Vec<(KernelWidthPair, Option<f64>)>,
}

impl ComparisonRow {
    pub fn pvalue(&self, pair: KernelWidthPair) -> Option<f64> {
        self.cells
            .iter()
            .find(|(p, _)| *p == pair)
            .and_then(|(_, v)| *v)
    }
}

/// Whether `model_name` belongs to the family `base`
fn in_family(model_name: &str, base: &str) -> bool {
    model_name == base
        || model_name
            .strip_prefix(base)
            .is_some_and(|rest| rest.starts_with('_'))
}

fn find_partner<'a>(
    results: &'a GlobalResults,
    base: &str,
    kernel_width: i64,
) -> Option<&'a RawTable> {
    results
        .raw_tables
        .iter()
        .find(|t| t.key.kernel_width == kernel_width && in_family(&t.key.model_name, base))
}

/// Pair the populated cells of two tables by run index
///
/// A run missing on either side is skipped. Per-case values of a run pair
/// element-wise and must have equal lengths.
fn paired_samples(
    lower: &RawTable,
    upper: &RawTable,
    metric: Metric,
) -> Result<(Vec<f64>, Vec<f64>), ComparisonError> {
    let left = lower.populated(metric);
    let right = upper.populated(metric);
    if left.len() != right.len() {
        return Err(ComparisonError::MismatchedPairLength {
            left: left.len(),
            right: right.len(),
        });
    }

    let mut x = Vec::with_capacity(left.len());
    let mut y = Vec::with_capacity(right.len());
    for (a, b) in left.iter().zip(right) {
        match (a, b) {
            (RawCell::Missing, _) | (_, RawCell::Missing) => {}
            (RawCell::Value(a), RawCell::Value(b)) => {
                x.push(*a);
                y.push(*b);
            }
            (RawCell::Values(a), RawCell::Values(b)) if a.len() == b.len() => {
                x.extend_from_slice(a);
                y.extend_from_slice(b);
            }
            (a, b) => {
                return Err(ComparisonError::MismatchedPairLength {
                    left: cell_len(a),
                    right: cell_len(b),
                })
            }
        }
    }
    Ok((x, y))
}

fn cell_len(cell: &RawCell) -> usize {
    match cell {
        RawCell::Missing => 0,
        RawCell::Value(_) => 1,
        RawCell::Values(vs) => vs.len(),
    }
}

/// Compare two run-groups on one metric, matched run by run
pub fn compare_pair(
    lower: &RawTable,
    upper: &RawTable,
    metric: Metric,
) -> Result<f64, ComparisonError> {
    let (x, y) = paired_samples(lower, upper, metric)?;
    wilcoxon_signed_rank(&x, &y).map(|test| test.pvalue)
}

/// Build one comparison row per baseline run-group, in collection order
pub fn compare_kernel_widths(
    results: &GlobalResults,
    config: &AggregationConfig,
) -> Vec<ComparisonRow> {
    let pairs = kernel_width_pairs(config.comparison_pairs);
    let metric = config.compared_metric;

    results
        .raw_tables
        .iter()
        .filter(|t| t.key.kernel_width == config.baseline_kernel_width)
        .map(|baseline| {
            let model_base = strip_trailing_suffix(&baseline.key.model_name).to_string();
            let cells = pairs
                .iter()
                .map(|&pair| {
                    let lower = find_partner(results, &model_base, pair.lower);
                    let upper = find_partner(results, &model_base, pair.upper);
                    let (Some(lower), Some(upper)) = (lower, upper) else {
                        return (pair, None);
                    };

                    info!(
                        "Comparing kernel width with {} for {} for {} and {}",
                        metric, model_base, pair.lower, pair.upper
                    );
                    match compare_pair(lower, upper, metric) {
                        Ok(p) => (pair, Some(p)),
                        Err(e) => {
                            warn!(model = %model_base, pair = %pair, "comparison not available: {}", e);
                            (pair, None)
                        }
                    }
                })
                .collect();

            ComparisonRow {
                model_base,
                compared_variable: metric,
                cells,
            }
        })
        .collect()
}
