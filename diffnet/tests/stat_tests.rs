use approx::assert_abs_diff_eq;
use diffnet::metrics::{average_precision, roc_auc};
use diffnet::stats::{
    fdr_adjusted_neg_log10, paired_t_test, pairwise_p_values, wilcoxon_signed_rank, PairedTest,
};
use std::collections::BTreeMap;

#[test]
fn paired_t_test_matches_reference_value() -> anyhow::Result<()> {
    let a = [1.0, 2.0, 3.0, 4.0, 5.0];
    let b = [2.0, 4.0, 6.0, 8.0, 10.0];
    // scipy.stats.ttest_rel gives t = -4.2426, p = 0.0132
    let p = paired_t_test(&a, &b)?;
    assert_abs_diff_eq!(p, 0.0132, epsilon = 2e-3);
    Ok(())
}

#[test]
fn identical_samples_are_not_significant() -> anyhow::Result<()> {
    let a = [0.7, 0.8, 0.9, 0.6];
    assert_abs_diff_eq!(paired_t_test(&a, &a)?, 1.0);
    assert_abs_diff_eq!(wilcoxon_signed_rank(&a, &a)?, 1.0);
    Ok(())
}

#[test]
fn wilcoxon_detects_a_consistent_shift() -> anyhow::Result<()> {
    let a: Vec<f64> = (1..=10).map(|i| i as f64).collect();
    let b: Vec<f64> = a.iter().map(|x| x - 1.0).collect();
    // all differences positive; normal approximation gives p ~= 0.005
    let p = wilcoxon_signed_rank(&a, &b)?;
    assert!(p > 0.001 && p < 0.01, "p = {}", p);
    Ok(())
}

#[test]
fn mismatched_lengths_are_a_precondition_violation() {
    assert!(paired_t_test(&[1.0, 2.0], &[1.0]).is_err());
    assert!(wilcoxon_signed_rank(&[1.0, 2.0], &[1.0]).is_err());
}

#[test]
fn pairwise_p_values_cover_every_unordered_pair() -> anyhow::Result<()> {
    let mut metrics: BTreeMap<Box<str>, Vec<f64>> = BTreeMap::new();
    metrics.insert("page_rank".into(), vec![0.5, 0.52, 0.48, 0.51, 0.5]);
    metrics.insert("raw".into(), vec![0.8, 0.82, 0.79, 0.81, 0.8]);
    metrics.insert("z".into(), vec![0.75, 0.77, 0.74, 0.76, 0.75]);

    let p_values = pairwise_p_values(&metrics, PairedTest::T)?;
    assert_eq!(p_values.len(), 3);
    for p in p_values.values() {
        assert!(*p >= 0.0 && *p <= 1.0);
    }
    Ok(())
}

/// BH only inflates p-values: the adjusted significance of the smallest p
/// never exceeds its raw significance
#[test]
fn fdr_correction_never_beats_the_raw_minimum() {
    let mut p_values: BTreeMap<Box<str>, f64> = BTreeMap::new();
    p_values.insert("a vs b".into(), 0.01);
    p_values.insert("a vs c".into(), 0.02);
    p_values.insert("b vs c".into(), 0.8);

    let adjusted = fdr_adjusted_neg_log10(&p_values);
    assert_eq!(adjusted.len(), 3);

    let raw_best = -0.01_f64.log10();
    for neg_log in adjusted.values() {
        assert!(*neg_log <= raw_best + 1e-12);
    }
    // smallest p: adjusted = 0.01 * 3 / 1 = 0.03
    assert_abs_diff_eq!(adjusted["a vs b"], -0.03_f64.log10(), epsilon = 1e-9);
}

#[test]
fn roc_auc_hand_cases() {
    let perfect = roc_auc(&[1.0, 0.0, 1.0, 0.0], &[0.9, 0.1, 0.8, 0.2]).unwrap();
    assert_abs_diff_eq!(perfect, 1.0);

    let inverted = roc_auc(&[1.0, 0.0], &[0.1, 0.9]).unwrap();
    assert_abs_diff_eq!(inverted, 0.0);

    let tied = roc_auc(&[1.0, 0.0], &[0.5, 0.5]).unwrap();
    assert_abs_diff_eq!(tied, 0.5);

    // single-class folds are undefined
    assert!(roc_auc(&[1.0, 1.0], &[0.3, 0.4]).is_none());
    assert!(roc_auc(&[0.0, 0.0], &[0.3, 0.4]).is_none());
}

#[test]
fn average_precision_hand_case() {
    // ranking: pos, neg, pos, neg -> AP = 0.5 * 1 + 0.5 * 2/3
    let ap = average_precision(&[1.0, 0.0, 1.0, 0.0], &[0.9, 0.8, 0.7, 0.6]).unwrap();
    assert_abs_diff_eq!(ap, 0.5 + 1.0 / 3.0, epsilon = 1e-12);

    assert!(average_precision(&[0.0, 0.0], &[0.3, 0.4]).is_none());
}
