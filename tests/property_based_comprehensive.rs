//! Property-based tests over the aggregation core
//!
//! Core features tested:
//! 1. Metric flattening and raw-table padding
//! 2. Signed-rank p-value range
//! 3. Score filename token parsing

use kernel_sweep::aggregate::{summarize, RawCell, RawTable};
use kernel_sweep::bundle::{ParameterBundle, ResultBundle};
use kernel_sweep::comparison::wilcoxon_signed_rank;
use kernel_sweep::identifier::{parse_kernel_token, resolve_key, ResolveContext, RunGroupKey};
use kernel_sweep::metrics::{Metric, MetricValue};
use proptest::prelude::*;

fn key() -> RunGroupKey {
    RunGroupKey {
        model_name: "glm_rf0".to_string(),
        receptive_field: 0,
        kernel_width: 1,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_nested_flatten_preserves_every_value(
        nested in prop::collection::vec(prop::collection::vec(-1e3f64..1e3, 0..6), 0..8),
    ) {
        let value = MetricValue::NestedSequence(nested.clone());
        let flat = value.flatten();
        let expected: Vec<f64> = nested.into_iter().flatten().collect();
        prop_assert_eq!(flat, expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_raw_table_pads_to_capacity(
        roc in prop::collection::vec(0.0f64..1.0, 1..20),
        capacity in 20usize..60,
    ) {
        let mut bundle = ResultBundle::default();
        bundle.metrics.insert(Metric::TestRocAuc, MetricValue::FlatSequence(roc.clone()));
        let table = RawTable::build(key(), "glm_rf0_k1_0", &bundle, capacity).unwrap();

        prop_assert_eq!(table.n_runs(), roc.len());
        for metric in Metric::ALL {
            let row = table.row(metric);
            prop_assert_eq!(row.len(), capacity);
            prop_assert!(row[roc.len()..].iter().all(RawCell::is_missing));
        }
        prop_assert_eq!(table.flattened(Metric::TestRocAuc), roc);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_summary_mean_within_range(
        roc in prop::collection::vec(0.0f64..1.0, 1..30),
    ) {
        let mut bundle = ResultBundle::default();
        bundle.metrics.insert(Metric::TestRocAuc, MetricValue::FlatSequence(roc.clone()));
        let summary = summarize(&key(), &bundle);

        let min = roc.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = roc.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mean = summary.mean.get(Metric::TestRocAuc).unwrap();
        prop_assert!(mean >= min - 1e-12 && mean <= max + 1e-12);
        prop_assert!(summary.mean.get(Metric::TestF1).is_none());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_signed_rank_pvalue_in_unit_interval(
        pairs in prop::collection::vec((-10.0f64..10.0, -10.0f64..10.0), 1..80),
    ) {
        let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        if let Ok(test) = wilcoxon_signed_rank(&x, &y) {
            prop_assert!(test.pvalue > 0.0 && test.pvalue <= 1.0);
            prop_assert!(test.statistic >= 0.0);
            prop_assert!(test.n_effective <= x.len());
        }
    }

    #[test]
    fn prop_signed_rank_symmetric(
        pairs in prop::collection::vec((-10.0f64..10.0, -10.0f64..10.0), 1..40),
    ) {
        let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        match (wilcoxon_signed_rank(&x, &y), wilcoxon_signed_rank(&y, &x)) {
            (Ok(a), Ok(b)) => prop_assert!((a.pvalue - b.pvalue).abs() < 1e-12),
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            _ => prop_assert!(false, "swapping samples changed the outcome"),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_kernel_token_parsing_never_panics(token in "\\PC{0,12}") {
        let _ = parse_kernel_token(&token);
    }

    #[test]
    fn prop_kernel_token_round_trip(prefix in "[a-z]", width in 0i64..100_000) {
        let token = format!("{}{}", prefix, width);
        prop_assert_eq!(parse_kernel_token(&token), Some(width));
    }

    #[test]
    fn prop_resolved_key_matches_filename(
        model in "[a-z]{1,6}",
        rf in 0i64..20,
        kernel_width in 1i64..30,
        trial in 0u32..10,
    ) {
        let run_group = format!("{}_rf{}_k{}_{}", model, rf, kernel_width, trial);
        let score_file = format!("scores_{}_rf{}_k{}_{}.npy", model, rf, kernel_width, rf);
        let params = ParameterBundle::default();
        let ctx = ResolveContext {
            run_group: &run_group,
            score_file: &score_file,
            params: &params,
        };

        let resolved = resolve_key(&ctx).unwrap();
        prop_assert_eq!(resolved.model_name, format!("{}_rf{}", model, rf));
        prop_assert_eq!(resolved.kernel_width, kernel_width);
        prop_assert_eq!(resolved.receptive_field, rf);
    }
}
