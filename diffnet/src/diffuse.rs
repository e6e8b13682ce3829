use crate::common::*;

/// Propagate seed scores through a diffusion kernel.
///
/// Seed rows are aligned to the kernel universe first (rows the kernel does
/// not know are dropped, kernel rows the seed lacks are treated as zero).
/// Raw mode is the plain kernel product `K * y`; z mode rescales each score
/// by its permutation-null mean and variance to correct for hub bias.
///
/// Deterministic given identical inputs; the kernel is never mutated.
pub fn diffuse_raw(
    seed: &LabeledMatrix,
    kernel: &Kernel,
    z: bool,
) -> anyhow::Result<LabeledMatrix> {
    let universe = kernel.row_labels();

    let mapped = seed
        .row_labels()
        .iter()
        .filter(|label| kernel.row_position(label).is_some())
        .count();
    if mapped == 0 {
        anyhow::bail!("seed labels are entirely disjoint from the kernel universe");
    }
    if mapped < seed.nrows() {
        warn!(
            "{} of {} seed rows are outside the kernel universe and will be dropped",
            seed.nrows() - mapped,
            seed.nrows()
        );
    }

    let mut seed = seed.clone();
    seed.align_rows(universe, 0.0)?;

    let raw = kernel.values() * seed.values();
    let mut scores = LabeledMatrix::new(raw, universe.to_vec(), seed.col_labels().to_vec())?;

    if z {
        z_normalize_inplace(&mut scores, &seed, kernel)?;
    }
    Ok(scores)
}

/// Per-column moment normalization: with `s1 = sum(y)`, `s2 = sum(y^2)` and
/// kernel row sums `r_i`, `q_i = sum_j K_ij^2`,
///
/// `mu_i  = r_i * s1 / n`
/// `var_i = (n * q_i - r_i^2) * (n * s2 - s1^2) / ((n - 1) * n^2)`
fn z_normalize_inplace(
    scores: &mut LabeledMatrix,
    seed: &LabeledMatrix,
    kernel: &Kernel,
) -> anyhow::Result<()> {
    let kk = kernel.values();
    let n = kk.nrows() as f64;

    let row_sums: Vec<f64> = (0..kk.nrows()).map(|i| kk.row(i).sum()).collect();
    let row_sums_sq: Vec<f64> = (0..kk.nrows())
        .map(|i| kk.row(i).iter().map(|x| x * x).sum())
        .collect();

    let mut normalized = scores.values().clone();

    for j in 0..seed.ncols() {
        let y = seed.values().column(j);
        let s1: f64 = y.sum();
        let s2: f64 = y.iter().map(|x| x * x).sum();

        for i in 0..normalized.nrows() {
            let mu = row_sums[i] * s1 / n;
            let var =
                (n * row_sums_sq[i] - row_sums[i] * row_sums[i]) * (n * s2 - s1 * s1)
                    / ((n - 1.0) * n * n);
            normalized[(i, j)] = if var > 0.0 {
                (normalized[(i, j)] - mu) / var.sqrt()
            } else {
                0.0
            };
        }
    }

    *scores = LabeledMatrix::new(
        normalized,
        scores.row_labels().to_vec(),
        scores.col_labels().to_vec(),
    )?;
    Ok(())
}
