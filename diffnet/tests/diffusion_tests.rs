use approx::assert_abs_diff_eq;
use diffnet::diffuse::diffuse_raw;
use diffnet::graph::NetGraph;
use diffnet::input::seed_from_labels;
use diffnet::kernel::regularised_laplacian_kernel;
use label_matrix::labeled::Mat;
use label_matrix::LabeledMatrix;

fn path_graph(n: usize) -> NetGraph {
    let mut graph = NetGraph::new();
    for i in 0..(n - 1) {
        graph.add_edge(&format!("v{}", i), &format!("v{}", i + 1), None);
    }
    graph
}

/// Raw diffusion is a linear kernel application:
/// diffuse(y1 + y2) == diffuse(y1) + diffuse(y2)
#[test]
fn raw_diffusion_is_linear() -> anyhow::Result<()> {
    let graph = path_graph(7);
    let kernel = regularised_laplacian_kernel(&graph, 1.0, 1.0, false)?;

    let seed_a = seed_from_labels(&["v0".into(), "v2".into()], &kernel, 0.0, None)?;
    let seed_b = seed_from_labels(&["v5".into()], &kernel, 0.0, None)?;

    let sum_mat = seed_a.values() + seed_b.values();
    let seed_sum = LabeledMatrix::new(
        sum_mat,
        seed_a.row_labels().to_vec(),
        seed_a.col_labels().to_vec(),
    )?;

    let scores_a = diffuse_raw(&seed_a, &kernel, false)?;
    let scores_b = diffuse_raw(&seed_b, &kernel, false)?;
    let scores_sum = diffuse_raw(&seed_sum, &kernel, false)?;

    for i in 0..kernel.nrows() {
        assert_abs_diff_eq!(
            scores_sum.values()[(i, 0)],
            scores_a.values()[(i, 0)] + scores_b.values()[(i, 0)],
            epsilon = 1e-10
        );
    }
    Ok(())
}

#[test]
fn diffusion_is_deterministic() -> anyhow::Result<()> {
    let graph = path_graph(5);
    let kernel = regularised_laplacian_kernel(&graph, 1.0, 1.0, false)?;
    let seed = seed_from_labels(&["v1".into()], &kernel, 0.0, None)?;

    let first = diffuse_raw(&seed, &kernel, true)?;
    let second = diffuse_raw(&seed, &kernel, true)?;
    for i in 0..kernel.nrows() {
        assert_abs_diff_eq!(first.values()[(i, 0)], second.values()[(i, 0)]);
    }
    Ok(())
}

#[test]
fn disjoint_seed_labels_are_an_error() -> anyhow::Result<()> {
    let graph = path_graph(4);
    let kernel = regularised_laplacian_kernel(&graph, 1.0, 1.0, false)?;

    let mat = Mat::from_element(2, 1, 1.0);
    let seed = LabeledMatrix::new(mat, vec!["x".into(), "y".into()], vec!["input".into()])?;
    assert!(diffuse_raw(&seed, &kernel, false).is_err());
    Ok(())
}

/// Seed rows outside the kernel universe are dropped, missing rows become
/// zero, and the output stays aligned with the kernel rows
#[test]
fn seed_rows_are_aligned_to_the_kernel() -> anyhow::Result<()> {
    let graph = path_graph(4);
    let kernel = regularised_laplacian_kernel(&graph, 1.0, 1.0, false)?;

    let mat = Mat::from_element(2, 1, 1.0);
    let seed = LabeledMatrix::new(
        mat,
        vec!["v1".into(), "not_in_network".into()],
        vec!["input".into()],
    )?;
    let scores = diffuse_raw(&seed, &kernel, false)?;

    assert_eq!(scores.row_labels(), kernel.row_labels());

    // equivalent to diffusing v1 alone
    let clean = seed_from_labels(&["v1".into()], &kernel, 0.0, None)?;
    let expected = diffuse_raw(&clean, &kernel, false)?;
    for i in 0..kernel.nrows() {
        assert_abs_diff_eq!(scores.values()[(i, 0)], expected.values()[(i, 0)]);
    }
    Ok(())
}
