// Kernel-width comparison tests
//
// Scenarios follow a typical sweep: one model family evaluated with
// kernel widths 1..n, ten repeated cross-validation runs each.

use super::*;
use crate::aggregate::{summarize, GlobalCollector, GlobalResults, RawTable};
use crate::bundle::ResultBundle;
use crate::config::AggregationConfig;
use crate::error::ComparisonError;
use crate::identifier::RunGroupKey;
use crate::metrics::{Metric, MetricValue};

fn results(groups: &[(&str, i64, Vec<f64>)]) -> GlobalResults {
    let mut collector = GlobalCollector::new();
    for (model, kernel_width, roc) in groups {
        let key = RunGroupKey {
            model_name: model.to_string(),
            receptive_field: 0,
            kernel_width: *kernel_width,
        };
        let mut bundle = ResultBundle::default();
        bundle
            .metrics
            .insert(Metric::TestRocAuc, MetricValue::FlatSequence(roc.clone()));
        let table = RawTable::build(key.clone(), model, &bundle, 50).unwrap();
        collector.push(table, summarize(&key, &bundle));
    }
    collector.into_results()
}

fn ramp(start: f64) -> Vec<f64> {
    (0..10).map(|i| start + i as f64 * 0.01).collect()
}

#[test]
fn test_pair_labels() {
    let pairs = kernel_width_pairs(12);
    assert_eq!(pairs.len(), 12);
    assert_eq!(pairs[0].label(), "p1-2");
    assert_eq!(pairs[1].label(), "p3-4");
    assert_eq!(pairs[11].label(), "p23-24");
}

#[test]
fn test_single_pair_uses_signed_rank_pvalue() {
    let low = ramp(0.70);
    let high = ramp(0.60);
    let r = results(&[("glm_rf0", 1, low.clone()), ("glm_rf0", 2, high.clone())]);

    let rows = compare_kernel_widths(&r, &AggregationConfig::default());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].model_base, "glm");
    assert_eq!(rows[0].compared_variable, Metric::TestRocAuc);

    let expected = wilcoxon_signed_rank(&low, &high).unwrap().pvalue;
    let pair = KernelWidthPair { lower: 1, upper: 2 };
    assert_eq!(rows[0].pvalue(pair), Some(expected));
    assert_eq!(rows[0].cells.len(), 12);
    assert!(rows[0].cells[1..].iter().all(|(_, p)| p.is_none()));
}

#[test]
fn test_absent_partner_does_not_halt_other_pairs() {
    let r = results(&[
        ("glm_rf0", 1, ramp(0.70)),
        ("glm_rf0", 2, ramp(0.60)),
        ("glm_rf0", 3, ramp(0.65)),
        ("glm_rf0", 5, ramp(0.65)),
        ("glm_rf0", 6, ramp(0.75)),
    ]);
    let rows = compare_kernel_widths(&r, &AggregationConfig::default());
    let row = &rows[0];

    assert!(row.pvalue(KernelWidthPair { lower: 1, upper: 2 }).is_some());
    assert!(row.pvalue(KernelWidthPair { lower: 3, upper: 4 }).is_none());
    assert!(row.pvalue(KernelWidthPair { lower: 5, upper: 6 }).is_some());
}

#[test]
fn test_mismatched_run_counts_void_only_that_cell() {
    let r = results(&[
        ("glm_rf0", 1, ramp(0.70)),
        ("glm_rf0", 2, ramp(0.60)[..7].to_vec()),
        ("glm_rf0", 3, ramp(0.65)),
        ("glm_rf0", 4, ramp(0.55)),
    ]);
    let rows = compare_kernel_widths(&r, &AggregationConfig::default());

    assert!(rows[0].pvalue(KernelWidthPair { lower: 1, upper: 2 }).is_none());
    assert!(rows[0].pvalue(KernelWidthPair { lower: 3, upper: 4 }).is_some());
}

#[test]
fn test_one_row_per_baseline_run_group() {
    let r = results(&[
        ("glm_rf0", 1, ramp(0.70)),
        ("xgb_rf0", 1, ramp(0.80)),
        ("xgb_rf0", 2, ramp(0.78)),
        ("glm_rf0", 2, ramp(0.60)),
    ]);
    let rows = compare_kernel_widths(&r, &AggregationConfig::default());
    let bases: Vec<_> = rows.iter().map(|r| r.model_base.as_str()).collect();
    assert_eq!(bases, vec!["glm", "xgb"]);
    assert!(rows
        .iter()
        .all(|r| r.pvalue(KernelWidthPair { lower: 1, upper: 2 }).is_some()));
}

#[test]
fn test_family_match_is_segment_aware() {
    // "glm2_rf0" is not part of the "glm" family
    let r = results(&[("glm_rf0", 1, ramp(0.70)), ("glm2_rf0", 2, ramp(0.60))]);
    let rows = compare_kernel_widths(&r, &AggregationConfig::default());
    assert!(rows[0].pvalue(KernelWidthPair { lower: 1, upper: 2 }).is_none());
}

#[test]
#[allow(clippy::field_reassign_with_default)]
fn test_configured_pair_count_and_metric() {
    let mut config = AggregationConfig::default();
    config.comparison_pairs = 3;
    config.compared_metric = Metric::TestF1;

    let r = results(&[("glm_rf0", 1, ramp(0.70)), ("glm_rf0", 2, ramp(0.60))]);
    let rows = compare_kernel_widths(&r, &config);
    assert_eq!(rows[0].cells.len(), 3);
    assert_eq!(rows[0].compared_variable, Metric::TestF1);
    // test_f1 absent in both run-groups: nothing to compare
    assert!(rows[0].cells.iter().all(|(_, p)| p.is_none()));
}

#[test]
fn test_no_baseline_no_rows() {
    let r = results(&[("glm_rf0", 2, ramp(0.70)), ("glm_rf0", 3, ramp(0.60))]);
    assert!(compare_kernel_widths(&r, &AggregationConfig::default()).is_empty());
}

fn table(kernel_width: i64, extra: (Metric, MetricValue)) -> RawTable {
    let key = RunGroupKey {
        model_name: "glm_rf0".to_string(),
        receptive_field: 0,
        kernel_width,
    };
    let mut bundle = ResultBundle::default();
    bundle
        .metrics
        .insert(Metric::TestRocAuc, MetricValue::FlatSequence(ramp(0.70)));
    bundle.metrics.insert(extra.0, extra.1);
    RawTable::build(key, "glm_rf0", &bundle, 50).unwrap()
}

#[test]
fn test_short_sequences_pair_by_run_index() {
    let f1_low = ramp(0.40)[..8].to_vec();
    let f1_high = ramp(0.30)[..9].to_vec();
    let lower = table(1, (Metric::TestF1, MetricValue::FlatSequence(f1_low.clone())));
    let upper = table(2, (Metric::TestF1, MetricValue::FlatSequence(f1_high.clone())));

    // runs 8 and 9 lack a value on at least one side and are skipped
    let p = compare_pair(&lower, &upper, Metric::TestF1).unwrap();
    let expected = wilcoxon_signed_rank(&f1_low, &f1_high[..8]).unwrap().pvalue;
    assert_eq!(p, expected);
}

#[test]
fn test_nested_runs_pair_case_by_case() {
    let low = vec![vec![0.9, 0.8], vec![0.7, 0.95, 0.85], vec![0.6]];
    let high = vec![vec![0.5, 0.45], vec![0.4, 0.55, 0.35], vec![0.3]];
    let lower = table(1, (Metric::TestF1, MetricValue::NestedSequence(low.clone())));
    let upper = table(2, (Metric::TestF1, MetricValue::NestedSequence(high.clone())));

    let p = compare_pair(&lower, &upper, Metric::TestF1).unwrap();
    let x: Vec<f64> = low.into_iter().flatten().collect();
    let y: Vec<f64> = high.into_iter().flatten().collect();
    assert_eq!(p, wilcoxon_signed_rank(&x, &y).unwrap().pvalue);
}

#[test]
fn test_nested_runs_of_unequal_length_rejected() {
    let lower = table(
        1,
        (Metric::TestF1, MetricValue::NestedSequence(vec![vec![0.9, 0.8, 0.7]])),
    );
    let upper = table(
        2,
        (Metric::TestF1, MetricValue::NestedSequence(vec![vec![0.5, 0.4]])),
    );
    assert_eq!(
        compare_pair(&lower, &upper, Metric::TestF1),
        Err(ComparisonError::MismatchedPairLength { left: 3, right: 2 })
    );
}
