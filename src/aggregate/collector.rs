// Append-only accumulator for one aggregation pass

use super::raw_table::RawTable;
use super::summary::{RunGroupSummary, SummaryKind, SummaryRow};

/// Raw tables and summary rows of every usable run-group, in discovery order
///
/// Run-groups resolving to the same key are all kept; partner lookups in
/// the comparison take the first match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalResults {
    pub raw_tables: Vec<RawTable>,
    pub mean: Vec<SummaryRow>,
    pub std: Vec<SummaryRow>,
    pub median: Vec<SummaryRow>,
}

impl GlobalResults {
    pub fn len(&self) -> usize {
        self.raw_tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_tables.is_empty()
    }

    pub fn rows(&self, kind: SummaryKind) -> &[SummaryRow] {
        match kind {
            SummaryKind::Mean => &self.mean,
            SummaryKind::Std => &self.std,
            SummaryKind::Median => &self.median,
        }
    }
}

/// Collector created once before discovery and consumed after it
#[derive(Debug, Default)]
pub struct GlobalCollector {
    results: GlobalResults,
}

impl GlobalCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one run-group's table and summary rows
    pub fn push(&mut self, table: RawTable, summary: RunGroupSummary) {
        self.results.raw_tables.push(table);
        self.results.mean.push(summary.mean);
        self.results.std.push(summary.std);
        self.results.median.push(summary.median);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn into_results(self) -> GlobalResults {
        self.results
    }
}
