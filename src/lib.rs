//! Kernel-sweep - result aggregation for smoothing-kernel parameter sweeps
//!
//! Walks a `<root>/<modality>/<run-group>/` tree of evaluation outputs,
//! summarizes every run-group (mean, standard deviation, median per
//! metric), and tests whether neighbouring kernel widths differ with a
//! paired signed-rank test. The resulting tables are exported as CSV or
//! JSON.

pub mod aggregate;
pub mod bundle;
pub mod cli;
pub mod comparison;
pub mod config;
pub mod error;
pub mod identifier;
pub mod locator;
pub mod metrics;
pub mod pipeline;
pub mod report;
