pub mod baseline;
pub mod common;
pub mod cross_validation;
pub mod diffuse;
pub mod graph;
pub mod input;
pub mod kernel;
pub mod ltoo;
pub mod metrics;
pub mod run_diffusion;
pub mod run_evaluate;
pub mod run_kernel;
pub mod split;
pub mod stats;
