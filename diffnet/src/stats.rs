use clap::ValueEnum;
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};
use std::collections::BTreeMap;

/// Paired significance test over per-trial metric distributions
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PairedTest {
    /// Student's paired t-test
    T,
    /// Wilcoxon signed-rank test (normal approximation)
    Wilcoxon,
}

/// 1-based ranks with tied values receiving the average of their ranks
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // ranks i+1 ..= j averaged over the tie group
        let avg = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = avg;
        }
        i = j;
    }
    ranks
}

fn paired_differences(a: &[f64], b: &[f64]) -> anyhow::Result<Vec<f64>> {
    if a.len() != b.len() {
        anyhow::bail!(
            "paired test requires equal-length samples ({} vs {})",
            a.len(),
            b.len()
        );
    }
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x - y).collect())
}

/// Two-sided paired Student's t-test. Zero-variance differences yield
/// p = 1 (no evidence of a difference) rather than NaN.
pub fn paired_t_test(a: &[f64], b: &[f64]) -> anyhow::Result<f64> {
    let diff = paired_differences(a, b)?;
    let n = diff.len();
    if n < 2 {
        anyhow::bail!("paired t-test requires at least two pairs");
    }

    let nf = n as f64;
    let mean = diff.iter().sum::<f64>() / nf;
    let var = diff.iter().map(|d| (d - mean) * (d - mean)).sum::<f64>() / (nf - 1.0);
    if var <= 0.0 {
        return Ok(1.0);
    }

    let t = mean / (var / nf).sqrt();
    let dist = StudentsT::new(0.0, 1.0, nf - 1.0)?;
    Ok(2.0 * dist.cdf(-t.abs()))
}

/// Two-sided Wilcoxon signed-rank test with the tie-corrected normal
/// approximation. Zero differences are dropped before ranking.
pub fn wilcoxon_signed_rank(a: &[f64], b: &[f64]) -> anyhow::Result<f64> {
    let diff: Vec<f64> = paired_differences(a, b)?
        .into_iter()
        .filter(|d| *d != 0.0)
        .collect();
    let n = diff.len();
    if n == 0 {
        return Ok(1.0);
    }

    let abs_diff: Vec<f64> = diff.iter().map(|d| d.abs()).collect();
    let ranks = average_ranks(&abs_diff);

    let w_plus: f64 = diff
        .iter()
        .zip(ranks.iter())
        .filter(|(&d, _)| d > 0.0)
        .map(|(_, r)| r)
        .sum();

    let nf = n as f64;
    let mean = nf * (nf + 1.0) / 4.0;

    // variance with tie correction: t^3 - t per tie group
    let mut sorted = abs_diff.clone();
    sorted.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j < n && sorted[j] == sorted[i] {
            j += 1;
        }
        let t = (j - i) as f64;
        tie_term += t * t * t - t;
        i = j;
    }
    let var = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - tie_term / 48.0;
    if var <= 0.0 {
        return Ok(1.0);
    }

    let z = (w_plus - mean) / var.sqrt();
    let dist = Normal::new(0.0, 1.0)?;
    Ok((2.0 * dist.cdf(-z.abs())).min(1.0))
}

/// Paired p-values over every unordered pair of method-named metric
/// distributions. All sequences must have the same length (paired design).
pub fn pairwise_p_values(
    metrics: &BTreeMap<Box<str>, Vec<f64>>,
    test: PairedTest,
) -> anyhow::Result<BTreeMap<Box<str>, f64>> {
    let keys: Vec<&Box<str>> = metrics.keys().collect();
    let mut p_values = BTreeMap::new();

    for i in 0..keys.len() {
        for j in (i + 1)..keys.len() {
            let a = &metrics[keys[i]];
            let b = &metrics[keys[j]];
            let p = match test {
                PairedTest::T => paired_t_test(a, b)?,
                PairedTest::Wilcoxon => wilcoxon_signed_rank(a, b)?,
            };
            p_values.insert(format!("{} vs {}", keys[i], keys[j]).into(), p);
        }
    }
    Ok(p_values)
}

/// Benjamini-Hochberg step-up correction over the whole batch, reported as
/// `-log10(adjusted p)` (higher = more significant, ready for bar charts).
/// BH only inflates p-values, so no adjusted value exceeds the raw
/// significance of the smallest p in the batch.
pub fn fdr_adjusted_neg_log10(
    p_values: &BTreeMap<Box<str>, f64>,
) -> BTreeMap<Box<str>, f64> {
    let m = p_values.len();
    if m == 0 {
        return BTreeMap::new();
    }

    let mut entries: Vec<(&Box<str>, f64)> = p_values.iter().map(|(k, &p)| (k, p)).collect();
    entries.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut adjusted = vec![0.0; m];
    let mut running = 1.0_f64;
    for i in (0..m).rev() {
        let scaled = entries[i].1 * m as f64 / (i + 1) as f64;
        running = running.min(scaled);
        adjusted[i] = running;
    }

    entries
        .into_iter()
        .zip(adjusted)
        .map(|((key, _), adj)| {
            let adj = adj.max(f64::MIN_POSITIVE);
            (key.clone(), -adj.log10())
        })
        .collect()
}
