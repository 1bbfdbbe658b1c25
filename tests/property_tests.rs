//! Property-based tests for reconciliation and aggregation
//!
//! - Test mathematical invariants
//! - Run with ProptestConfig::with_cases(100)

use proptest::prelude::*;
use sweep_aggregate::aggregate::{aggregate, aggregate_group};
use sweep_aggregate::experiment::ExperimentGroup;
use sweep_aggregate::reconcile::{pad_to_length, reconcile};
use sweep_aggregate::record::{DayRecord, Field};
use sweep_aggregate::run::{ParamValue, RunSeries};

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

/// Generate one run with contiguous days and integer counts
fn arb_run(max_days: usize) -> impl Strategy<Value = Vec<DayRecord>> {
    proptest::collection::vec((0u32..1000, 0u32..1000, 0u32..1000, 0u32..1000), 1..=max_days)
        .prop_map(|rows| {
            rows.into_iter()
                .zip(0u64..)
                .map(|((s, i, r, d), day)| {
                    DayRecord::new(day, f64::from(s), f64::from(i), f64::from(r), f64::from(d))
                })
                .collect()
        })
}

/// Generate a ragged group of 1..=8 runs
fn arb_group() -> impl Strategy<Value = ExperimentGroup> {
    proptest::collection::vec(arb_run(30), 1..=8).prop_map(|runs| {
        let value = ParamValue::new(0.1).unwrap();
        let runs = runs
            .into_iter()
            .map(|records| RunSeries::new("transmission", value, records))
            .collect();
        ExperimentGroup::new("transmission", value, runs).unwrap()
    })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ========================================================================
    // Reconciliation Properties
    // ========================================================================

    /// Property: every member ends up with length L = max original length
    #[test]
    fn prop_reconcile_common_length(group in arb_group()) {
        let aligned = reconcile(&group).unwrap();
        let max = group.lengths().into_iter().max().unwrap();

        prop_assert_eq!(aligned.len(), max);
        for run in aligned.runs() {
            prop_assert_eq!(run.len(), max);
        }
        let lengths = group.lengths();
        prop_assert_eq!(aligned.original_lengths(), lengths.as_slice());
    }

    /// Property: padding keeps the prefix and repeats the last record verbatim
    #[test]
    fn prop_padding_holds_terminal_record(run in arb_run(20), extra in 0usize..20) {
        let target = run.len() + extra;
        let padded = pad_to_length(&run, target).unwrap();
        let last = *run.last().unwrap();

        prop_assert_eq!(padded.len(), target);
        prop_assert_eq!(&padded[..run.len()], run.as_slice());
        for record in &padded[run.len()..] {
            prop_assert_eq!(*record, last);
        }
    }

    // ========================================================================
    // Aggregation Properties
    // ========================================================================

    /// Property: per-day mean lies within the per-day range, std is non-negative
    #[test]
    fn prop_mean_within_range(group in arb_group()) {
        let aligned = reconcile(&group).unwrap();
        let series = aggregate(&aligned).unwrap();

        prop_assert_eq!(series.len(), aligned.len());
        for (index, day) in series.per_day().iter().enumerate() {
            for field in Field::ALL {
                let values: Vec<f64> = aligned.column(index).map(|r| r.get(field)).collect();
                let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let stats = day.get(field);

                prop_assert!(stats.mean >= min - 1e-9 && stats.mean <= max + 1e-9);
                prop_assert!(stats.std >= 0.0);
                prop_assert!(stats.std <= (max - min) / 2.0 + 1e-9);
            }
        }
    }

    /// Property: a run aggregated with itself has zero spread everywhere
    #[test]
    fn prop_duplicate_runs_zero_std(run in arb_run(30), copies in 1usize..5) {
        let value = ParamValue::new(3.0).unwrap();
        let runs = vec![RunSeries::new("period", value, run.clone()); copies];
        let group = ExperimentGroup::new("period", value, runs).unwrap();
        let series = aggregate_group(&group).unwrap();

        for (day, record) in series.per_day().iter().zip(&run) {
            prop_assert_eq!(day.day, record.day);
            for field in Field::ALL {
                prop_assert_eq!(day.get(field).mean, record.get(field));
                prop_assert_eq!(day.get(field).std, 0.0);
            }
        }
        prop_assert_eq!(series.run_length_std(), 0.0);
    }

    /// Property: run-length mean is the mean of pre-padding lengths
    #[test]
    fn prop_run_length_mean_ignores_padding(group in arb_group()) {
        let series = aggregate_group(&group).unwrap();
        let lengths = group.lengths();
        #[allow(clippy::cast_precision_loss)]
        let expected = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;

        prop_assert!((series.run_length_mean() - expected).abs() < 1e-9);
        prop_assert_eq!(series.run_count(), group.run_count());
    }

    /// Property: member order does not change the statistics
    #[test]
    fn prop_member_order_invariant(group in arb_group()) {
        let value = group.value();
        let reversed: Vec<RunSeries> = group.runs().iter().rev().cloned().collect();
        let reversed = ExperimentGroup::new("transmission", value, reversed).unwrap();

        let a = aggregate_group(&group).unwrap();
        let b = aggregate_group(&reversed).unwrap();

        prop_assert_eq!(a.len(), b.len());
        for (x, y) in a.per_day().iter().zip(b.per_day()) {
            for field in Field::ALL {
                prop_assert!((x.get(field).mean - y.get(field).mean).abs() < 1e-9);
                prop_assert!((x.get(field).std - y.get(field).std).abs() < 1e-9);
            }
        }
    }
}
