use crate::common::*;
use crate::graph::NetGraph;
use crate::kernel::{regularised_laplacian_kernel, DEFAULT_ADD_DIAG, DEFAULT_SIGMA2};

use clap::Parser;

#[derive(Parser, Debug, Clone)]
pub struct KernelArgs {
    /// graph edge list (`.csv`/`.tsv` with a `source,target[,database]` header)
    #[arg(long, short = 'g', required = true)]
    graph: Box<str>,

    /// output kernel csv
    #[arg(long, short = 'o', required = true)]
    out: Box<str>,

    /// regularization constant
    #[arg(long, default_value_t = DEFAULT_SIGMA2)]
    sigma2: f64,

    /// diagonal regularization
    #[arg(long, default_value_t = DEFAULT_ADD_DIAG)]
    add_diag: f64,

    /// use the normalized laplacian
    #[arg(long, default_value_t = false)]
    normalized: bool,

    /// restrict to one source database before computing
    #[arg(long)]
    database: Option<Box<str>>,

    /// verbosity
    #[arg(long, short)]
    verbose: bool,
}

/// Precompute a diffusion kernel for a graph and persist it as CSV
pub fn run_kernel(args: KernelArgs) -> anyhow::Result<()> {
    if args.verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let mut graph = NetGraph::from_edge_list_path(args.graph.as_ref())?;
    if let Some(database) = args.database.as_ref() {
        graph = graph.subgraph_by_database(database.as_ref());
        info!(
            "database {} subgraph: {} nodes, {} edges",
            database,
            graph.num_nodes(),
            graph.num_edges()
        );
    }

    let then = std::time::Instant::now();
    let kernel = regularised_laplacian_kernel(&graph, args.sigma2, args.add_diag, args.normalized)?;
    info!(
        "kernel over {} nodes computed in {:.2} seconds",
        kernel.nrows(),
        then.elapsed().as_secs_f64()
    );

    kernel.to_csv(args.out.as_ref())?;
    info!("kernel exported to {}", args.out);
    Ok(())
}
