use crate::common::*;
use crate::diffuse::diffuse_raw;
use crate::input::{process_scores, read_scores_input, seed_from_scores};
use crate::kernel::{NetworkResource, DEFAULT_ADD_DIAG, DEFAULT_SIGMA2};

use clap::{Parser, ValueEnum};
use std::collections::BTreeMap;
use std::io::BufWriter;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DiffusionMethod {
    /// Plain kernel product
    Raw,
    /// Moment-normalized scores (hub-bias corrected)
    Z,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

#[derive(Parser, Debug, Clone)]
pub struct DiffusionArgs {
    /// network file: a kernel `.csv` written by the `kernel` subcommand or
    /// an edge list (`.csv`/`.tsv` with a `source,target[,database]` header)
    #[arg(long, short = 'n', required = true)]
    network: Box<str>,

    /// input labels or scores: two-column CSV/TSV, a JSON list of
    /// identifiers or a JSON `{identifier: score}` object
    #[arg(long, short = 'i', required = true)]
    input: Box<str>,

    /// diffusion method
    #[arg(long, short = 'm', value_enum, default_value_t = DiffusionMethod::Raw)]
    method: DiffusionMethod,

    /// convert nonzero input values to binary labels
    #[arg(long, default_value_t = false)]
    binarize: bool,

    /// label inputs by thresholding their value
    #[arg(long)]
    threshold: Option<f64>,

    /// apply the threshold to absolute values
    #[arg(long, default_value_t = false)]
    absolute_value: bool,

    /// regularization constant when a kernel must be computed
    #[arg(long, default_value_t = DEFAULT_SIGMA2)]
    sigma2: f64,

    /// diagonal regularization when a kernel must be computed
    #[arg(long, default_value_t = DEFAULT_ADD_DIAG)]
    add_diag: f64,

    /// use the normalized laplacian when a kernel must be computed
    #[arg(long, default_value_t = false)]
    normalized: bool,

    /// output file for the diffusion scores
    #[arg(long, short = 'o', required = true)]
    out: Box<str>,

    /// output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// verbosity
    #[arg(long, short)]
    verbose: bool,
}

/// Run one diffusion over a network or pregenerated kernel
pub fn run_diffusion(args: DiffusionArgs) -> anyhow::Result<()> {
    if args.verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let kernel = NetworkResource::from_path(args.network.as_ref())?.into_kernel(
        args.sigma2,
        args.add_diag,
        args.normalized,
    )?;

    info!("processing input scores from {}", args.input);
    let mut scores = read_scores_input(args.input.as_ref())?;
    process_scores(&mut scores, args.binarize, args.threshold, args.absolute_value);
    let seed = seed_from_scores(&scores, &kernel)?;

    info!("computing diffusion scores");
    let z = matches!(args.method, DiffusionMethod::Z);
    let mut results = diffuse_raw(&seed, &kernel, z)?;
    let score_name: Box<str> = match args.method {
        DiffusionMethod::Raw => "raw".into(),
        DiffusionMethod::Z => "z".into(),
    };
    results.rename_columns(vec![score_name.clone()])?;

    ensure_parent_dir(args.out.as_ref())?;
    match args.format {
        OutputFormat::Csv => results.to_csv(args.out.as_ref())?,
        OutputFormat::Json => {
            let column = results.column_vec(0);
            let by_label: BTreeMap<&str, f64> = results
                .row_labels()
                .iter()
                .map(|x| x.as_ref())
                .zip(column)
                .collect();
            let report = BTreeMap::from([(score_name.as_ref(), by_label)]);
            let buf = BufWriter::new(std::fs::File::create(args.out.as_ref())?);
            serde_json::to_writer_pretty(buf, &report)?;
        }
    }

    info!("diffusion scores written to {}", args.out);
    Ok(())
}
