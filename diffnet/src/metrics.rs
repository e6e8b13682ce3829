use crate::common::*;
use crate::stats::average_ranks;

/// Outcome of scoring one method against one validation fold. A fold whose
/// labels are all one class leaves AUROC/AUPRC undefined; that case is a
/// first-class result, not an error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrialOutcome {
    Ok { auroc: f64, auprc: f64 },
    Degenerate,
}

/// Area under the ROC curve via the rank-sum (Mann-Whitney) identity with
/// tie-averaged ranks. `None` when the labels are single-class.
pub fn roc_auc(labels: &[f64], scores: &[f64]) -> Option<f64> {
    let pos = labels.iter().filter(|&&y| y > 0.0).count();
    let neg = labels.len() - pos;
    if pos == 0 || neg == 0 {
        return None;
    }

    let ranks = average_ranks(scores);
    let rank_sum: f64 = labels
        .iter()
        .zip(ranks.iter())
        .filter(|(&y, _)| y > 0.0)
        .map(|(_, r)| r)
        .sum();

    let pos = pos as f64;
    let neg = neg as f64;
    Some((rank_sum - pos * (pos + 1.0) / 2.0) / (pos * neg))
}

/// Average precision: `AP = sum_k (R_k - R_{k-1}) * P_k` over descending
/// score thresholds, with tied scores grouped under one threshold. `None`
/// when there are no positive labels.
pub fn average_precision(labels: &[f64], scores: &[f64]) -> Option<f64> {
    let total_pos = labels.iter().filter(|&&y| y > 0.0).count() as f64;
    if total_pos == 0.0 {
        return None;
    }

    let mut order: Vec<usize> = (0..labels.len()).collect();
    order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(std::cmp::Ordering::Equal));

    let mut ap = 0.0;
    let mut tp = 0.0;
    let mut seen = 0.0;
    let mut prev_recall = 0.0;

    let mut i = 0;
    while i < order.len() {
        // advance over one tied-score group
        let mut j = i;
        while j < order.len() && scores[order[j]] == scores[order[i]] {
            if labels[order[j]] > 0.0 {
                tp += 1.0;
            }
            seen += 1.0;
            j += 1;
        }
        let precision = tp / seen;
        let recall = tp / total_pos;
        ap += (recall - prev_recall) * precision;
        prev_recall = recall;
        i = j;
    }
    Some(ap)
}

/// Score one method's ranking against a validation fold. The validation
/// matrix is binarized (positives > 0) before metric computation; both
/// matrices must already be aligned to the same row universe.
pub fn score_trial(
    validation: &LabeledMatrix,
    scores: &LabeledMatrix,
) -> anyhow::Result<TrialOutcome> {
    if validation.nrows() != scores.nrows() {
        anyhow::bail!(
            "validation fold has {} rows but the score matrix has {}",
            validation.nrows(),
            scores.nrows()
        );
    }

    let mut labels = validation.clone();
    labels.binarize_inplace();
    let labels = labels.column_vec(0);
    let ranking = scores.column_vec(0);

    match (roc_auc(&labels, &ranking), average_precision(&labels, &ranking)) {
        (Some(auroc), Some(auprc)) => Ok(TrialOutcome::Ok { auroc, auprc }),
        _ => Ok(TrialOutcome::Degenerate),
    }
}
