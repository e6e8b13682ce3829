use crate::common::*;
use crate::graph::NetGraph;
use label_matrix::common_io::open_buf_reader;
use std::io::BufRead;

/// Default regularization constant `sigma2` for the diffusion kernel
pub const DEFAULT_SIGMA2: f64 = 1.0;
/// Default diagonal added before inversion
pub const DEFAULT_ADD_DIAG: f64 = 1.0;

/// Regularized Laplacian diffusion kernel `K = (add_diag * I + sigma2 * L)^-1`.
///
/// Expensive (`O(n^3)` for `n` nodes); callers should persist the result and
/// reuse it read-only across trials instead of recomputing.
pub fn regularised_laplacian_kernel(
    graph: &NetGraph,
    sigma2: f64,
    add_diag: f64,
    normalized: bool,
) -> anyhow::Result<Kernel> {
    if graph.num_nodes() == 0 {
        anyhow::bail!("cannot compute a diffusion kernel over an empty graph");
    }

    let laplacian = graph.laplacian(normalized);
    let n = laplacian.nrows();
    let regularized = Mat::identity(n, n) * add_diag + laplacian * sigma2;

    let inverse = regularized
        .try_inverse()
        .ok_or(anyhow::anyhow!("regularized laplacian matrix is singular"))?;

    let labels = graph.node_labels();
    Kernel::new(inverse, labels.clone(), labels)
}

/// A network argument before it has been resolved into a kernel
pub enum NetworkResource {
    Graph(NetGraph),
    Kernel(Kernel),
}

impl NetworkResource {
    /// Decide between a kernel CSV and an edge list by peeking at the
    /// header: a kernel written by [`LabeledMatrix::to_csv`] starts with an
    /// empty field, an edge list starts with `source`.
    pub fn from_path(path: &str) -> anyhow::Result<Self> {
        let mut buf = open_buf_reader(path)?;
        let mut header = String::new();
        buf.read_line(&mut header)?;

        if header.starts_with(',') {
            info!("loading kernel from {}", path);
            Ok(Self::Kernel(Kernel::from_csv(path)?))
        } else {
            info!("loading graph from {}", path);
            Ok(Self::Graph(NetGraph::from_edge_list_path(path)?))
        }
    }

    /// Resolve into a kernel, computing one when a graph was given
    pub fn into_kernel(self, sigma2: f64, add_diag: f64, normalized: bool) -> anyhow::Result<Kernel> {
        match self {
            Self::Kernel(kernel) => Ok(kernel),
            Self::Graph(graph) => {
                info!(
                    "computing regularized laplacian kernel over {} nodes",
                    graph.num_nodes()
                );
                regularised_laplacian_kernel(&graph, sigma2, add_diag, normalized)
            }
        }
    }
}
