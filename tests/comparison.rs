//! Comparison integration tests.
//!
//! Tests cover:
//! - Determinism: comparing the same pair twice gives identical results
//! - Symmetry: swapping the reports mirrors every directional field
//! - Detection: synthetic samples with a real shift are flagged
//! - History: pair enumeration, ordering and fail-fast validation

use microbench::compare::validate::check_report;
use microbench::{
    compare, compare_across_history, CompareError, EffectSize, HistoryOptions, Report, ReportSet,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn noisy_samples(rng: &mut StdRng, center: f64, spread: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|_| center + rng.random_range(-spread..spread))
        .collect()
}

fn report(name: &str, samples: Vec<f64>) -> Report {
    Report::from_samples(name, samples).unwrap()
}

// ============================================================================
// Pairwise comparison
// ============================================================================

#[test]
fn compare_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(7);
    let a = report("a", noisy_samples(&mut rng, 1.0, 0.1, 50));
    let b = report("b", noisy_samples(&mut rng, 1.02, 0.1, 50));

    let first = compare(&a, &b).unwrap();
    let second = compare(&a, &b).unwrap();
    assert_eq!(first, second);
}

#[test]
fn swapped_reports_mirror_directional_fields() {
    let mut rng = StdRng::seed_from_u64(11);
    let a = report("a", noisy_samples(&mut rng, 2.0, 0.3, 40));
    let b = report("b", noisy_samples(&mut rng, 2.5, 0.4, 60));

    let ab = compare(&a, &b).unwrap();
    let ba = compare(&b, &a).unwrap();

    assert_eq!(ab.a_wins, !ba.a_wins);
    assert!((ab.mean_difference + ba.mean_difference).abs() < 1e-12);
    assert!((ab.ops_difference + ba.ops_difference).abs() < 1e-9);
    assert!((ab.t_statistic + ba.t_statistic).abs() < 1e-12);
    assert!((ab.cohens_d + ba.cohens_d).abs() < 1e-12);
    assert!((ab.degrees_of_freedom - ba.degrees_of_freedom).abs() < 1e-9);
    assert!((ab.p_value - ba.p_value).abs() < 1e-12);
    assert_eq!(ab.different, ba.different);
}

#[test]
fn identical_reports_are_not_different() {
    let mut rng = StdRng::seed_from_u64(3);
    let a = report("a", noisy_samples(&mut rng, 5.0, 1.0, 30));
    let b = Report {
        name: "b".into(),
        ..a.clone()
    };

    let cmp = compare(&a, &b).unwrap();
    assert!(!cmp.different);
    assert!((cmp.p_value - 1.0).abs() < 1e-9);
    assert_eq!(cmp.effect_size(), EffectSize::Negligible);
    assert!(!cmp.interval_excludes_zero());
}

#[test]
fn real_shift_is_detected() {
    let mut rng = StdRng::seed_from_u64(42);
    let fast = report("fast", noisy_samples(&mut rng, 1.0, 0.05, 100));
    let slow = report("slow", noisy_samples(&mut rng, 1.5, 0.05, 100));

    let cmp = compare(&fast, &slow).unwrap();
    assert!(cmp.different);
    assert!(cmp.a_wins);
    assert!(cmp.p_value < 1e-10);
    assert!(cmp.ci_lower > 0.0);
    assert_eq!(cmp.effect_size(), EffectSize::Large);
    assert_eq!(cmp.faster().map(|r| r.name.as_str()), Some("fast"));
    let speedup = cmp.speedup().unwrap();
    assert!(speedup > 1.4 && speedup < 1.6);
}

#[test]
fn degenerate_inputs_are_typed_errors() {
    let one = report("one", vec![1.0]);
    let flat_a = report("flat_a", vec![1.0; 5]);
    let flat_b = report("flat_b", vec![2.0; 5]);
    let empty = report("empty", Vec::new());

    assert_eq!(compare(&one, &flat_a).unwrap_err().code(), "E_INSUFFICIENT_DATA");
    assert_eq!(compare(&empty, &flat_a).unwrap_err().code(), "E_INSUFFICIENT_DATA");
    assert_eq!(compare(&flat_a, &flat_b).unwrap_err().code(), "E_DEGENERATE_VARIANCE");
}

/// One side with zero variance is still comparable.
#[test]
fn one_sided_zero_variance() {
    let flat = report("flat", vec![1.0; 10]);
    let noisy = report("noisy", vec![1.0, 1.2, 0.8, 1.1, 0.9, 1.3, 0.7, 1.05, 0.95, 1.0]);
    let cmp = compare(&flat, &noisy).unwrap();
    assert!(cmp.p_value.is_finite());
    assert!(cmp.degrees_of_freedom > 0.0);
}

// ============================================================================
// History
// ============================================================================

fn history(rng: &mut StdRng) -> Vec<ReportSet> {
    (0..4u64)
        .map(|run| {
            let mut sort = report("sort", noisy_samples(rng, 1.0 + run as f64 * 0.1, 0.05, 20));
            sort.created_at = 1_000 - run;
            let other = report("other", noisy_samples(rng, 3.0, 0.05, 20));
            ReportSet {
                created_at: sort.created_at,
                reports: vec![other, sort],
            }
        })
        .collect()
}

#[test]
fn history_yields_all_pairs_in_order() {
    let mut rng = StdRng::seed_from_u64(5);
    let sets = history(&mut rng);
    let result = compare_across_history("sort", &sets, &HistoryOptions::new()).unwrap();

    assert_eq!(result.len(), 6);
    let expected = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
    for (cmp, (i, j)) in result.iter().zip(expected) {
        assert_eq!(cmp.a.created_at, 1_000 - i);
        assert_eq!(cmp.b.created_at, 1_000 - j);
        assert_eq!(*cmp, compare(cmp.a, cmp.b).unwrap());
    }
}

#[test]
fn history_sort_reorders_matches() {
    let mut rng = StdRng::seed_from_u64(5);
    let sets = history(&mut rng);
    let options = HistoryOptions::new().oldest_first();
    let result = compare_across_history("sort", &sets, &options).unwrap();

    assert_eq!(result[0].a.created_at, 997);
    assert_eq!(result[0].b.created_at, 998);
    assert_eq!(result.last().map(|c| c.b.created_at), Some(1_000));
}

#[test]
fn history_filter_can_leave_too_few() {
    let mut rng = StdRng::seed_from_u64(5);
    let sets = history(&mut rng);
    let options = HistoryOptions::new().filter(|r| r.created_at == 1_000);
    let err = compare_across_history("sort", &sets, &options).unwrap_err();
    assert_eq!(
        err,
        CompareError::NotEnoughReports {
            name: "sort".into(),
            found: 1
        }
    );
    assert_eq!(err.code(), "E_NOT_ENOUGH_REPORTS");
}

#[test]
fn history_rejects_malformed_reports() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut sets = history(&mut rng);
    sets[1].reports[0].variance = -1.0;
    sets[3].reports[1].ops_per_second = f64::NAN;

    let err = compare_across_history("sort", &sets, &HistoryOptions::new()).unwrap_err();
    assert_eq!(err.code(), "E_VALIDATION");
    let message = err.to_string();
    assert!(message.starts_with("2 validation error(s)"));
    assert!(message.contains("[1] other.variance"));
    assert!(message.contains("[3] sort.ops"));
}

#[test]
fn history_from_stored_json() {
    let mut rng = StdRng::seed_from_u64(9);
    let stored: Vec<serde_json::Value> = history(&mut rng)
        .iter()
        .map(|set| serde_json::to_value(set).unwrap())
        .collect();

    let sets = ReportSet::from_values(stored.clone()).unwrap();
    assert_eq!(compare_across_history("other", &sets, &HistoryOptions::new()).unwrap().len(), 6);

    let mut broken = stored;
    broken[0]["reports"][0]
        .as_object_mut()
        .unwrap()
        .remove("sd");
    broken[2].as_object_mut().unwrap().remove("createdAt");
    let err = ReportSet::from_values(broken).unwrap_err();
    assert_eq!(err.violations.len(), 2);
    assert_eq!(err.violations[0].index, 0);
    assert_eq!(err.violations[0].field, "sd");
    assert_eq!(err.violations[1].index, 2);
    assert_eq!(err.violations[1].field, "createdAt");
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Swapping the operands negates t and d and leaves p unchanged.
    #[test]
    fn compare_antisymmetric(
        xs in prop::collection::vec(0.1f64..100.0, 2..40),
        ys in prop::collection::vec(0.1f64..100.0, 2..40),
    ) {
        let a = report("a", xs);
        let b = report("b", ys);
        prop_assume!(a.standard_deviation > 0.0 || b.standard_deviation > 0.0);

        let ab = compare(&a, &b).unwrap();
        let ba = compare(&b, &a).unwrap();
        prop_assert!((ab.t_statistic + ba.t_statistic).abs() < 1e-9);
        prop_assert!((ab.cohens_d + ba.cohens_d).abs() < 1e-9);
        prop_assert!((ab.p_value - ba.p_value).abs() < 1e-12);
        prop_assert!((0.0..=1.0).contains(&ab.p_value));
        prop_assert!(ab.ci_lower <= ab.mean_difference && ab.mean_difference <= ab.ci_upper);
    }

    /// Reports built from valid samples always pass structural validation.
    #[test]
    fn built_reports_validate(xs in prop::collection::vec(0.0f64..1e4, 0..60)) {
        let r = report("p", xs);
        prop_assert!(check_report(0, &r).is_empty());
    }
}
