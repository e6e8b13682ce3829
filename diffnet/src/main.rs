use diffnet::run_diffusion::{run_diffusion, DiffusionArgs};
use diffnet::run_evaluate::{run_evaluation, EvaluateArgs};
use diffnet::run_kernel::{run_kernel, KernelArgs};

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about)]
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a diffusion method over a network or pregenerated kernel
    Run(DiffusionArgs),

    /// Benchmark diffusion methods with repeated holdout cross-validation
    Evaluate(EvaluateArgs),

    /// Precompute a regularized laplacian kernel for a graph
    Kernel(KernelArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.commands {
        Commands::Run(args) => {
            run_diffusion(args)?;
        }
        Commands::Evaluate(args) => {
            run_evaluation(args)?;
        }
        Commands::Kernel(args) => {
            run_kernel(args)?;
        }
    }

    Ok(())
}
