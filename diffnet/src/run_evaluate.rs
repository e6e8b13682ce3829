use crate::common::*;
use crate::cross_validation::{validation_by_method, validation_by_subgraph, MetricAccumulator};
use crate::graph::NetGraph;
use crate::input::{flatten_mapping, read_label_mapping};
use crate::kernel::{NetworkResource, DEFAULT_ADD_DIAG, DEFAULT_SIGMA2};
use crate::ltoo::ltoo_by_method;
use crate::stats::{fdr_adjusted_neg_log10, pairwise_p_values, PairedTest};

use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::BufWriter;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Comparison {
    /// diffusion regimes vs random and PageRank baselines
    Method,
    /// per-database sub-networks vs the integrated universe network
    Database,
    /// leave-two-omics-out across entity categories
    Ltoo,
}

#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    /// what to compare
    #[arg(long, short = 'c', value_enum, required = true)]
    comparison: Comparison,

    /// label mapping JSON: category -> list of identifiers (or
    /// `{identifier: score}`)
    #[arg(long, short = 'd', required = true)]
    data: Box<str>,

    /// graph edge list; required for the PageRank baseline and whenever a
    /// kernel has to be computed
    #[arg(long, short = 'g')]
    graph: Option<Box<str>>,

    /// precomputed universe kernel csv (computed from the graph when absent)
    #[arg(long)]
    kernel: Option<Box<str>>,

    /// sub-network kernels for database mode, `name=path`, comma separated
    #[arg(long, value_delimiter(','))]
    subgraph_kernels: Vec<Box<str>>,

    /// repeated holdout trial count
    #[arg(long, short = 'k', default_value_t = 100)]
    iterations: usize,

    /// skip z-normalization in database mode
    #[arg(long, default_value_t = false)]
    no_z: bool,

    /// append a significance report computed with this paired test
    #[arg(long, value_enum)]
    test: Option<PairedTest>,

    /// output JSON path for the metric report
    #[arg(long, short = 'o', required = true)]
    out: Box<str>,

    /// regularization constant for computed kernels
    #[arg(long, default_value_t = DEFAULT_SIGMA2)]
    sigma2: f64,

    /// diagonal regularization for computed kernels
    #[arg(long, default_value_t = DEFAULT_ADD_DIAG)]
    add_diag: f64,

    /// verbosity
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Serialize)]
struct Significance {
    auroc: BTreeMap<Box<str>, f64>,
    auprc: BTreeMap<Box<str>, f64>,
}

#[derive(Serialize)]
struct MethodReport {
    metrics: MetricAccumulator,
    #[serde(skip_serializing_if = "Option::is_none")]
    significance: Option<Significance>,
}

#[derive(Serialize)]
struct NestedReport<T: Serialize> {
    metrics: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    significance: Option<BTreeMap<Box<str>, Significance>>,
}

fn significance_for(
    acc: &MetricAccumulator,
    test: PairedTest,
) -> anyhow::Result<Significance> {
    Ok(Significance {
        auroc: fdr_adjusted_neg_log10(&pairwise_p_values(&acc.auroc, test)?),
        auprc: fdr_adjusted_neg_log10(&pairwise_p_values(&acc.auprc, test)?),
    })
}

fn write_report<T: Serialize>(report: &T, out: &str) -> anyhow::Result<()> {
    ensure_parent_dir(out)?;
    let buf = BufWriter::new(std::fs::File::create(out)?);
    serde_json::to_writer_pretty(buf, report)?;
    Ok(())
}

fn load_graph(args: &EvaluateArgs) -> anyhow::Result<NetGraph> {
    let path = args.graph.as_ref().ok_or(anyhow::anyhow!(
        "--graph is required for this comparison (PageRank baseline)"
    ))?;
    NetGraph::from_edge_list_path(path.as_ref())
}

fn load_universe_kernel(args: &EvaluateArgs, graph: Option<&NetGraph>) -> anyhow::Result<Kernel> {
    match (args.kernel.as_ref(), graph) {
        (Some(path), _) => NetworkResource::from_path(path.as_ref())?
            .into_kernel(args.sigma2, args.add_diag, false),
        (None, Some(graph)) => {
            info!("no kernel given; computing one from the graph");
            crate::kernel::regularised_laplacian_kernel(graph, args.sigma2, args.add_diag, false)
        }
        (None, None) => anyhow::bail!("either --kernel or --graph must be given"),
    }
}

/// Run a cross-validation comparison and write the nested metric report
pub fn run_evaluation(args: EvaluateArgs) -> anyhow::Result<()> {
    if args.verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let mapping = read_label_mapping(args.data.as_ref())?;

    match args.comparison {
        Comparison::Method => {
            let graph = load_graph(&args)?;
            let kernel = load_universe_kernel(&args, Some(&graph))?;
            let labels = flatten_mapping(&mapping);
            info!(
                "by-method validation: {} labels, {} trials",
                labels.len(),
                args.iterations
            );

            let metrics = validation_by_method(&labels, &graph, &kernel, args.iterations)?;
            let significance = match args.test {
                Some(test) => Some(significance_for(&metrics, test)?),
                None => None,
            };
            write_report(
                &BTreeMap::from([("method", MethodReport { metrics, significance })]),
                args.out.as_ref(),
            )?;
        }

        Comparison::Database => {
            if args.subgraph_kernels.is_empty() {
                anyhow::bail!("database mode requires --subgraph-kernels name=path[,name=path...]");
            }
            let mut kernels = BTreeMap::new();
            for entry in args.subgraph_kernels.iter() {
                let (name, path) = entry.split_once('=').ok_or(anyhow::anyhow!(
                    "bad --subgraph-kernels entry `{}`; expected name=path",
                    entry
                ))?;
                kernels.insert(Box::from(name), Kernel::from_csv(path)?);
            }
            let graph = match (&args.kernel, &args.graph) {
                (None, Some(_)) => Some(load_graph(&args)?),
                _ => None,
            };
            let universe = load_universe_kernel(&args, graph.as_ref())?;

            let metrics = validation_by_subgraph(
                &mapping,
                &kernels,
                &universe,
                !args.no_z,
                args.iterations,
            )?;
            let significance = match args.test {
                Some(test) => {
                    let mut out = BTreeMap::new();
                    for (name, acc) in metrics.iter() {
                        out.insert(name.clone(), significance_for(acc, test)?);
                    }
                    Some(out)
                }
                None => None,
            };
            write_report(
                &BTreeMap::from([("database", NestedReport { metrics, significance })]),
                args.out.as_ref(),
            )?;
        }

        Comparison::Ltoo => {
            let graph = load_graph(&args)?;
            let kernel = load_universe_kernel(&args, Some(&graph))?;

            let metrics = ltoo_by_method(&mapping, &graph, &kernel, args.iterations)?;
            let significance = match args.test {
                Some(test) => {
                    let mut out = BTreeMap::new();
                    for (category, by_fold) in metrics.iter() {
                        for (fold, acc) in by_fold.iter() {
                            let key: Box<str> = format!("{}/{}", category, fold).into();
                            out.insert(key, significance_for(acc, test)?);
                        }
                    }
                    Some(out)
                }
                None => None,
            };
            write_report(
                &BTreeMap::from([("ltoo", NestedReport { metrics, significance })]),
                args.out.as_ref(),
            )?;
        }
    }

    info!("evaluation report written to {}", args.out);
    Ok(())
}
