//! The aggregation pass
//!
//! Locate run-groups, load and identify each one, fold it into the global
//! tables, then compare kernel widths. A failing run-group is logged and
//! skipped; the pass only fails when nothing usable was found.

use crate::aggregate::{summarize, GlobalCollector, GlobalResults, RawTable};
use crate::bundle::load_run_group;
use crate::comparison::{compare_kernel_widths, ComparisonRow};
use crate::config::AggregationConfig;
use crate::error::{PassError, RunGroupError};
use crate::identifier::{resolve_key, ResolveContext};
use crate::locator::{locate_run_groups, RunGroupLocation};
use std::path::Path;
use tracing::{debug, info, warn};

/// A run-group excluded from the pass
#[derive(Debug)]
pub struct SkippedRunGroup {
    pub location: RunGroupLocation,
    pub reason: RunGroupError,
}

/// Everything a pass produced
#[derive(Debug)]
pub struct PassOutcome {
    pub results: GlobalResults,
    pub comparisons: Vec<ComparisonRow>,
    pub skipped: Vec<SkippedRunGroup>,
}

fn process_run_group(
    location: &RunGroupLocation,
    config: &AggregationConfig,
    collector: &mut GlobalCollector,
) -> Result<(), RunGroupError> {
    let loaded = load_run_group(&location.path, config)?;
    let ctx = ResolveContext {
        run_group: &location.name,
        score_file: loaded.score_file_name(),
        params: &loaded.params,
    };
    let key = resolve_key(&ctx)?;
    debug!(run_group = %location.name, key = %key, "resolved");

    let table = RawTable::build(key.clone(), &location.name, &loaded.results, config.max_runs)?;
    let summary = summarize(&key, &loaded.results);
    collector.push(table, summary);
    Ok(())
}

/// Run one aggregation pass over `root`
pub fn run_pass(root: &Path, config: &AggregationConfig) -> Result<PassOutcome, PassError> {
    let locations = locate_run_groups(root)?;

    let mut collector = GlobalCollector::new();
    let mut skipped = Vec::new();
    for location in locations {
        info!("Reading {}", location.name);
        if let Err(reason) = process_run_group(&location, config, &mut collector) {
            warn!(modality = %location.modality, "{}", reason);
            skipped.push(SkippedRunGroup { location, reason });
        }
    }

    if collector.is_empty() {
        return Err(PassError::NoRunGroups(root.to_path_buf()));
    }
    info!(
        run_groups = collector.len(),
        skipped = skipped.len(),
        "aggregation complete"
    );

    let results = collector.into_results();
    let comparisons = compare_kernel_widths(&results, config);
    Ok(PassOutcome {
        results,
        comparisons,
        skipped,
    })
}
