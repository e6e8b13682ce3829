use crate::common::*;
use label_matrix::common_io::{file_ext, open_buf_reader};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::io::BufRead;

/// One entity category of a label mapping: either a plain list of entity
/// identifiers or a scored dictionary `{identifier: value}`
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum CategoryLabels {
    Plain(Vec<Box<str>>),
    Scored(BTreeMap<Box<str>, f64>),
}

impl CategoryLabels {
    pub fn labels(&self) -> Vec<Box<str>> {
        match self {
            Self::Plain(labels) => labels.clone(),
            Self::Scored(scored) => scored.keys().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Plain(labels) => labels.len(),
            Self::Scored(scored) => scored.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ground-truth seed universe: entity category (`genes`, `micrornas`,
/// `metabolites`, `bps`, ...) to its known-positive identifiers
pub type LabelMapping = BTreeMap<Box<str>, CategoryLabels>;

pub fn read_label_mapping(path: &str) -> anyhow::Result<LabelMapping> {
    let buf = open_buf_reader(path)?;
    let mapping: LabelMapping = serde_json::from_reader(buf)?;
    if mapping.is_empty() {
        anyhow::bail!("label mapping {} has no categories", path);
    }
    for (category, labels) in mapping.iter() {
        info!("category {}: {} labels", category, labels.len());
    }
    Ok(mapping)
}

/// Deduplicated union of all categories
pub fn flatten_mapping(mapping: &LabelMapping) -> Vec<Box<str>> {
    let mut seen = HashSet::new();
    let mut out = vec![];
    for labels in mapping.values() {
        for label in labels.labels() {
            if seen.insert(label.clone()) {
                out.push(label);
            }
        }
    }
    out
}

/// Per-entity input scores for the `run` subcommand: a two-column CSV/TSV
/// (`identifier<sep>score`, score optional), a JSON list of identifiers or a
/// JSON `{identifier: score}` object
pub fn read_scores_input(path: &str) -> anyhow::Result<BTreeMap<Box<str>, f64>> {
    let stem = path.strip_suffix(".gz").unwrap_or(path);
    match file_ext(stem).unwrap_or_default().as_ref() {
        "json" => {
            let buf = open_buf_reader(path)?;
            let parsed: CategoryLabels = serde_json::from_reader(buf)?;
            Ok(match parsed {
                CategoryLabels::Scored(scored) => scored,
                CategoryLabels::Plain(labels) => {
                    labels.into_iter().map(|x| (x, 1.0)).collect()
                }
            })
        }
        ext => {
            let delim = if ext == "tsv" { '\t' } else { ',' };
            let buf = open_buf_reader(path)?;
            let mut scores = BTreeMap::new();
            for line in buf.lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let mut fields = line.split(delim);
                let label: Box<str> = fields
                    .next()
                    .ok_or(anyhow::anyhow!("empty input line"))?
                    .trim()
                    .into();
                let value = match fields.next() {
                    Some(x) => x.trim().parse::<f64>()?,
                    None => 1.0,
                };
                scores.insert(label, value);
            }
            if scores.is_empty() {
                anyhow::bail!("input file {} has no entries", path);
            }
            Ok(scores)
        }
    }
}

/// Recode raw input values (e.g. logFC) into diffusion labels
///
/// * `absolute_value` - compare `|x|` against the threshold
/// * `threshold` - values above become 1, the rest 0
/// * `binarize` - nonzero values become 1
pub fn process_scores(
    scores: &mut BTreeMap<Box<str>, f64>,
    binarize: bool,
    threshold: Option<f64>,
    absolute_value: bool,
) {
    for value in scores.values_mut() {
        let mut x = *value;
        if absolute_value {
            x = x.abs();
        }
        if let Some(cut) = threshold {
            x = if x > cut { 1.0 } else { 0.0 };
        } else if binarize {
            x = if x != 0.0 { 1.0 } else { 0.0 };
        }
        *value = x;
    }
}

/// One-column seed matrix over the kernel universe: positives take 1,
/// explicitly unlabeled rows take 0 and everything else takes
/// `missing_value` (0 for holdout splits, -1 when out-of-fold rows are
/// excluded outright)
pub fn seed_from_labels(
    positives: &[Box<str>],
    kernel: &Kernel,
    missing_value: f64,
    unlabeled: Option<&HashSet<Box<str>>>,
) -> anyhow::Result<LabeledMatrix> {
    let universe = kernel.row_labels();
    let positive_set: HashSet<&str> = positives.iter().map(|x| x.as_ref()).collect();

    let mapped = universe
        .iter()
        .filter(|x| positive_set.contains(x.as_ref()))
        .count();
    if mapped == 0 && !positives.is_empty() {
        anyhow::bail!("none of the {} seed labels map to the kernel universe", positives.len());
    }
    if mapped < positive_set.len() {
        warn!(
            "{} of {} seed labels are absent from the kernel universe",
            positive_set.len() - mapped,
            positive_set.len()
        );
    }

    let column: Vec<f64> = universe
        .iter()
        .map(|label| {
            if positive_set.contains(label.as_ref()) {
                1.0
            } else if unlabeled.is_some_and(|u| u.contains(label.as_ref())) {
                0.0
            } else {
                missing_value
            }
        })
        .collect();

    let mat = Mat::from_vec(universe.len(), 1, column);
    LabeledMatrix::new(mat, universe.to_vec(), vec!["input".into()])
}

/// One-column scored seed matrix for the `run` subcommand; unmapped kernel
/// rows stay at zero
pub fn seed_from_scores(
    scores: &BTreeMap<Box<str>, f64>,
    kernel: &Kernel,
) -> anyhow::Result<LabeledMatrix> {
    let universe = kernel.row_labels();
    let mapped = universe
        .iter()
        .filter(|x| scores.contains_key(x.as_ref()))
        .count();
    if mapped == 0 {
        anyhow::bail!("none of the {} input labels map to the network", scores.len());
    }
    if mapped < scores.len() {
        warn!(
            "{} of {} input labels are absent from the network",
            scores.len() - mapped,
            scores.len()
        );
    }

    let column: Vec<f64> = universe
        .iter()
        .map(|label| scores.get(label.as_ref()).copied().unwrap_or(0.0))
        .collect();
    let mat = Mat::from_vec(universe.len(), 1, column);
    LabeledMatrix::new(mat, universe.to_vec(), vec!["input".into()])
}

/// Binary one-column validation matrix over the kernel universe
pub fn validation_from_labels(
    positives: &[Box<str>],
    kernel: &Kernel,
) -> anyhow::Result<LabeledMatrix> {
    let universe = kernel.row_labels();
    let positive_set: HashSet<&str> = positives.iter().map(|x| x.as_ref()).collect();
    let column: Vec<f64> = universe
        .iter()
        .map(|label| {
            if positive_set.contains(label.as_ref()) {
                1.0
            } else {
                0.0
            }
        })
        .collect();
    let mat = Mat::from_vec(universe.len(), 1, column);
    LabeledMatrix::new(mat, universe.to_vec(), vec!["validation".into()])
}
