use crate::baseline::{page_rank_baseline, random_score_ranking};
use crate::common::*;
use crate::diffuse::diffuse_raw;
use crate::graph::NetGraph;
use crate::input::{seed_from_labels, validation_from_labels, LabelMapping};
use crate::metrics::{score_trial, TrialOutcome};
use crate::split::split_random_two_subsets;

use indicatif::ProgressIterator;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-trial (AUROC, AUPRC) pairs accumulated under method or dataset keys.
/// Append-only during a run; a degenerate fold contributes a `(0, 0)`
/// sentinel and a diagnostic instead of aborting the run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MetricAccumulator {
    pub auroc: BTreeMap<Box<str>, Vec<f64>>,
    pub auprc: BTreeMap<Box<str>, Vec<f64>>,
}

impl MetricAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, outcome: TrialOutcome) {
        let (auroc, auprc) = match outcome {
            TrialOutcome::Ok { auroc, auprc } => (auroc, auprc),
            TrialOutcome::Degenerate => {
                warn!(
                    "ranking metrics undefined for `{}` (single-class fold); recording (0, 0)",
                    key
                );
                (0.0, 0.0)
            }
        };
        self.auroc.entry(key.into()).or_default().push(auroc);
        self.auprc.entry(key.into()).or_default().push(auprc);
    }
}

/// The four rankings compared in by-method and leave-two-out validation
pub fn method_rankings(
    seed: &LabeledMatrix,
    kernel: &Kernel,
    page_rank: &LabeledMatrix,
) -> anyhow::Result<Vec<(Box<str>, LabeledMatrix)>> {
    Ok(vec![
        ("raw".into(), diffuse_raw(seed, kernel, false)?),
        ("z".into(), diffuse_raw(seed, kernel, true)?),
        ("random".into(), random_score_ranking(kernel)?),
        ("page_rank".into(), page_rank.clone()),
    ])
}

/// Repeated holdout validation comparing diffusion regimes against the
/// random and PageRank baselines over one label universe.
///
/// Each of the `k` trials resplits the labels in half, diffuses the train
/// half and scores all four methods against the validation half. The kernel
/// is shared read-only across trials.
pub fn validation_by_method(
    labels: &[Box<str>],
    graph: &NetGraph,
    kernel: &Kernel,
    k: usize,
) -> anyhow::Result<MetricAccumulator> {
    let mut acc = MetricAccumulator::new();
    let page_rank = page_rank_baseline(graph, kernel)?;

    for _ in (0..k).progress() {
        let (train, validation) = split_random_two_subsets(labels);
        let seed = seed_from_labels(&train, kernel, 0.0, None)?;
        let validation_mat = validation_from_labels(&validation, kernel)?;

        for (method, scores) in method_rankings(&seed, kernel, &page_rank)? {
            acc.push(method.as_ref(), score_trial(&validation_mat, &scores)?);
        }
    }
    Ok(acc)
}

fn labels_in_kernel(labels: &[Box<str>], kernel: &Kernel) -> Vec<Box<str>> {
    labels
        .iter()
        .filter(|label| kernel.row_position(label).is_some())
        .cloned()
        .collect()
}

/// Repeated holdout validation stratified by sub-network.
///
/// For every named sub-kernel, each trial splits the category's labels
/// mapped onto that kernel and diffuses on both the sub-kernel and the
/// universe kernel, accumulating under the `subgraph` and `universe` keys.
/// A category with at most one mapped label contributes a defined `(0, 0)`
/// pair (AUROC is undefined on a single-element fold) rather than failing.
pub fn validation_by_subgraph(
    mapping: &LabelMapping,
    kernels: &BTreeMap<Box<str>, Kernel>,
    universe_kernel: &Kernel,
    z: bool,
    k: usize,
) -> anyhow::Result<BTreeMap<Box<str>, MetricAccumulator>> {
    let mut by_subgraph: BTreeMap<Box<str>, MetricAccumulator> = BTreeMap::new();

    // mapped label sets are stable across trials; compute them once
    let mut mapped: BTreeMap<Box<str>, Vec<Box<str>>> = BTreeMap::new();
    for (name, kernel) in kernels.iter() {
        let labels = match mapping.get(name) {
            Some(category) => labels_in_kernel(&category.labels(), kernel),
            None => {
                let all: Vec<Box<str>> = crate::input::flatten_mapping(mapping);
                let found = labels_in_kernel(&all, kernel);
                info!("mapped {} of {} labels onto subgraph {}", found.len(), all.len(), name);
                found
            }
        };
        mapped.insert(name.clone(), labels);
    }

    for _ in (0..k).progress() {
        for (name, kernel) in kernels.iter() {
            let labels = &mapped[name];
            let acc = by_subgraph.entry(name.clone()).or_default();

            if labels.len() <= 1 {
                acc.push("subgraph", TrialOutcome::Degenerate);
                acc.push("universe", TrialOutcome::Degenerate);
                continue;
            }

            let (train, validation) = split_random_two_subsets(labels);

            let seed_sub = seed_from_labels(&train, kernel, 0.0, None)?;
            let validation_sub = validation_from_labels(&validation, kernel)?;
            let scores_sub = diffuse_raw(&seed_sub, kernel, z)?;
            acc.push("subgraph", score_trial(&validation_sub, &scores_sub)?);

            let seed_uni = seed_from_labels(&train, universe_kernel, 0.0, None)?;
            let validation_uni = validation_from_labels(&validation, universe_kernel)?;
            let scores_uni = diffuse_raw(&seed_uni, universe_kernel, z)?;
            acc.push("universe", score_trial(&validation_uni, &scores_uni)?);
        }
    }
    Ok(by_subgraph)
}
