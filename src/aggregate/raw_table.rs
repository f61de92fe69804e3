// Fixed-capacity raw value table of one run-group
//
// Every table has the same number of columns (the configured run
// capacity) so tables from run-groups with different run counts stack
// uniformly. Columns past the run count hold `RawCell::Missing`.

use crate::bundle::ResultBundle;
use crate::error::RunGroupError;
use crate::identifier::RunGroupKey;
use crate::metrics::{Metric, MetricValue};

/// One run's value of one metric
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Missing,
    Value(f64),
    /// Per-case values of a run, kept unflattened
    Values(Vec<f64>),
}

impl RawCell {
    pub fn is_missing(&self) -> bool {
        matches!(self, RawCell::Missing)
    }
}

/// Per-run values of every metric of one run-group
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub key: RunGroupKey,
    n_runs: usize,
    /// One row of `capacity` cells per metric, in `Metric::ALL` order
    rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    /// Build the table from a result bundle
    ///
    /// The run count is the length of `test_roc_auc`. A run-group with more
    /// runs than `capacity` is rejected rather than truncated.
    pub fn build(
        key: RunGroupKey,
        run_group: &str,
        bundle: &ResultBundle,
        capacity: usize,
    ) -> Result<RawTable, RunGroupError> {
        let n_runs = bundle
            .get(Metric::RUN_COUNT_SOURCE)
            .map(MetricValue::run_count)
            .ok_or_else(|| RunGroupError::Skippable {
                path: run_group.into(),
                reason: format!("missing run-count metric {}", Metric::RUN_COUNT_SOURCE),
            })?;

        if n_runs > capacity {
            return Err(RunGroupError::CapacityExceeded {
                run_group: run_group.to_string(),
                runs: n_runs,
                capacity,
            });
        }

        let rows = Metric::ALL
            .iter()
            .map(|&metric| {
                let mut row = match bundle.get(metric) {
                    Some(value) => populated_cells(value, n_runs),
                    None => vec![RawCell::Missing; n_runs],
                };
                row.resize(capacity, RawCell::Missing);
                row
            })
            .collect();

        Ok(RawTable {
            key,
            n_runs,
            rows,
        })
    }

    pub fn n_runs(&self) -> usize {
        self.n_runs
    }

    /// Label of column `column`: the run-group key for populated runs
    pub fn label(&self, column: usize) -> Option<&RunGroupKey> {
        (column < self.n_runs).then_some(&self.key)
    }

    /// All `capacity` cells of a metric
    pub fn row(&self, metric: Metric) -> &[RawCell] {
        &self.rows[metric_index(metric)]
    }

    /// The first `n_runs` cells of a metric
    pub fn populated(&self, metric: Metric) -> &[RawCell] {
        &self.row(metric)[..self.n_runs]
    }

    /// Populated values of a metric, nested per-case values concatenated
    pub fn flattened(&self, metric: Metric) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.n_runs);
        for cell in self.populated(metric) {
            match cell {
                RawCell::Missing => {}
                RawCell::Value(v) => out.push(*v),
                RawCell::Values(vs) => out.extend_from_slice(vs),
            }
        }
        out
    }
}

// Discriminants follow `Metric::ALL` order
fn metric_index(metric: Metric) -> usize {
    metric as usize
}

/// Exactly `n_runs` cells for a present metric
fn populated_cells(value: &MetricValue, n_runs: usize) -> Vec<RawCell> {
    let mut cells: Vec<RawCell> = match value {
        // A single value applies to every run
        MetricValue::Scalar(x) => vec![RawCell::Value(*x); n_runs],
        MetricValue::FlatSequence(values) => values
            .iter()
            .take(n_runs)
            .map(|&v| RawCell::Value(v))
            .collect(),
        MetricValue::NestedSequence(inner) => inner
            .iter()
            .take(n_runs)
            .map(|vs| RawCell::Values(vs.clone()))
            .collect(),
    };
    cells.resize(n_runs, RawCell::Missing);
    cells
}
