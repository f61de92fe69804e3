// Per-run-group aggregation and cross-run-group collection
//
// Each usable run-group yields three summary rows (mean, std, median over
// the flattened metric values) and one fixed-capacity raw table keeping
// every run's value. The collector stacks them in discovery order.
//
// Implementation:
// - Uses trueno::Vector for SIMD mean and standard deviation
// - Uses aprender's DescriptiveStats for the median

mod collector;
mod raw_table;
mod summary;

pub use collector::{GlobalCollector, GlobalResults};
pub use raw_table::{RawCell, RawTable};
pub use summary::{median, summarize, RunGroupSummary, SummaryKind, SummaryRow};
