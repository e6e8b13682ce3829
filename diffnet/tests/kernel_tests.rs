use diffnet::diffuse::diffuse_raw;
use diffnet::graph::NetGraph;
use diffnet::input::seed_from_labels;
use diffnet::kernel::regularised_laplacian_kernel;

fn ring_graph(n: usize) -> NetGraph {
    let mut graph = NetGraph::new();
    for i in 0..n {
        let s = format!("node{}", i);
        let t = format!("node{}", (i + 1) % n);
        graph.add_edge(&s, &t, None);
    }
    graph
}

#[test]
fn kernel_is_symmetric_over_the_node_universe() -> anyhow::Result<()> {
    let graph = ring_graph(6);
    let kernel = regularised_laplacian_kernel(&graph, 1.0, 1.0, false)?;

    assert_eq!(kernel.nrows(), 6);
    assert_eq!(kernel.ncols(), 6);
    assert!(kernel.is_symmetric(1e-9));

    let mut rows: Vec<&str> = kernel.row_labels().iter().map(|x| x.as_ref()).collect();
    let mut nodes: Vec<String> = (0..6).map(|i| format!("node{}", i)).collect();
    rows.sort();
    nodes.sort();
    assert_eq!(rows, nodes.iter().map(|x| x.as_str()).collect::<Vec<_>>());

    assert_eq!(kernel.row_labels(), kernel.col_labels());
    Ok(())
}

#[test]
fn empty_graph_is_rejected() {
    let graph = NetGraph::new();
    assert!(regularised_laplacian_kernel(&graph, 1.0, 1.0, false).is_err());
}

#[test]
fn normalized_laplacian_kernel_also_symmetric() -> anyhow::Result<()> {
    let graph = ring_graph(5);
    let kernel = regularised_laplacian_kernel(&graph, 1.0, 1.0, true)?;
    assert!(kernel.is_symmetric(1e-9));
    Ok(())
}

/// Raw diffusion scores on a ring must decay monotonically with the hop
/// distance from the seed.
#[test]
fn ring_scores_decay_with_distance() -> anyhow::Result<()> {
    let graph = ring_graph(6);
    let kernel = regularised_laplacian_kernel(&graph, 1.0, 1.0, false)?;

    let seed = seed_from_labels(&["node0".into()], &kernel, 0.0, None)?;
    let scores = diffuse_raw(&seed, &kernel, false)?;

    let score = |name: &str| scores.get(name, "input").unwrap();

    // hop distances from node0: 1 for node1/node5, 2 for node2/node4, 3 for node3
    assert!(score("node0") > score("node1"));
    assert!(score("node1") > score("node2"));
    assert!(score("node2") > score("node3"));
    assert!((score("node1") - score("node5")).abs() < 1e-9);
    assert!((score("node2") - score("node4")).abs() < 1e-9);
    Ok(())
}

/// With seeds at both node0 and node3 every seed outscores every non-seed
#[test]
fn ring_two_seed_scores_peak_at_the_seeds() -> anyhow::Result<()> {
    let graph = ring_graph(6);
    let kernel = regularised_laplacian_kernel(&graph, 1.0, 1.0, false)?;

    let seed = seed_from_labels(&["node0".into(), "node3".into()], &kernel, 0.0, None)?;
    let scores = diffuse_raw(&seed, &kernel, false)?;
    let score = |name: &str| scores.get(name, "input").unwrap();

    for near in ["node1", "node2", "node4", "node5"] {
        assert!(score("node0") > score(near));
        assert!(score("node3") > score(near));
    }
    Ok(())
}
