use crate::baseline::page_rank_baseline;
use crate::common::*;
use crate::cross_validation::{method_rankings, MetricAccumulator};
use crate::graph::NetGraph;
use crate::input::{seed_from_labels, validation_from_labels, LabelMapping};
use crate::metrics::score_trial;
use crate::split::split_random_two_subsets;

use indicatif::ProgressIterator;
use std::collections::{BTreeMap, HashSet};

/// The label for the union-of-other-categories validation fold
pub const MERGED_FOLD: &str = "merged";

/// Leave-two-omics-out validation: diffuse from one entity category and
/// test whether the held-out categories are recovered.
///
/// For each category, each trial takes a random half of that category's
/// labels as the seed (everything else marked -1, excluded), then scores all
/// four methods against (a) the merged union of all other categories and
/// (b) each other category as its own stratified fold. Results are keyed
/// seed-category -> fold -> method.
pub fn ltoo_by_method(
    mapping: &LabelMapping,
    graph: &NetGraph,
    kernel: &Kernel,
    k: usize,
) -> anyhow::Result<BTreeMap<Box<str>, BTreeMap<Box<str>, MetricAccumulator>>> {
    let mut results: BTreeMap<Box<str>, BTreeMap<Box<str>, MetricAccumulator>> = BTreeMap::new();
    let page_rank = page_rank_baseline(graph, kernel)?;

    for _ in (0..k).progress() {
        for (category, labels) in mapping.iter() {
            let category_labels: Vec<Box<str>> = {
                let unique: HashSet<Box<str>> = labels.labels().into_iter().collect();
                unique.into_iter().collect()
            };

            // random half-subsample keeps variance across trials
            let seed_labels = if category_labels.len() > 1 {
                split_random_two_subsets(&category_labels).0
            } else {
                category_labels
            };
            let seed = seed_from_labels(&seed_labels, kernel, -1.0, None)?;

            let mut folds: Vec<(Box<str>, Vec<Box<str>>)> = vec![];
            let mut merged: HashSet<Box<str>> = HashSet::new();
            for (other, other_labels) in mapping.iter() {
                if other == category {
                    continue;
                }
                let other_labels = other_labels.labels();
                merged.extend(other_labels.iter().cloned());
                folds.push((other.clone(), other_labels));
            }
            folds.push((MERGED_FOLD.into(), merged.into_iter().collect()));

            let rankings = method_rankings(&seed, kernel, &page_rank)?;
            let by_fold = results.entry(category.clone()).or_default();

            for (fold, fold_labels) in folds {
                let validation = validation_from_labels(&fold_labels, kernel)?;
                let acc = by_fold.entry(fold).or_default();
                for (method, scores) in rankings.iter() {
                    acc.push(method.as_ref(), score_trial(&validation, scores)?);
                }
            }
        }
    }
    Ok(results)
}
