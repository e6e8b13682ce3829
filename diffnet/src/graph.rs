use crate::common::*;
use label_matrix::common_io::{file_ext, open_buf_reader};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{HashMap, HashSet};
use std::io::BufRead;

/// Provenance tag naming the source database an edge came from
pub type EdgeTag = Option<Box<str>>;

/// An undirected interaction network with string node identifiers.
///
/// Parallel edges are allowed (different databases may report the same
/// interaction); [`simplify`](Self::simplify) collapses them when an
/// algorithm needs a simple graph.
#[derive(Clone, Debug, Default)]
pub struct NetGraph {
    graph: UnGraph<Box<str>, EdgeTag>,
    index: HashMap<Box<str>, NodeIndex>,
}

impl NetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }

    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn inner(&self) -> &UnGraph<Box<str>, EdgeTag> {
        &self.graph
    }

    pub fn contains_node(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    pub fn add_node(&mut self, label: &str) -> NodeIndex {
        if let Some(ix) = self.index.get(label) {
            return *ix;
        }
        let ix = self.graph.add_node(label.into());
        self.index.insert(label.into(), ix);
        ix
    }

    pub fn add_edge(&mut self, source: &str, target: &str, tag: EdgeTag) {
        let s = self.add_node(source);
        let t = self.add_node(target);
        self.graph.add_edge(s, t, tag);
    }

    /// Node identifiers in insertion order; this is the label universe of
    /// any kernel derived from this graph
    pub fn node_labels(&self) -> Vec<Box<str>> {
        self.graph
            .node_indices()
            .map(|ix| self.graph[ix].clone())
            .collect()
    }

    /// Parse an edge list with a `source`/`target` header and an optional
    /// third provenance column. The delimiter follows the file extension
    /// (`.csv` or `.tsv`); anything else is a configuration error.
    pub fn from_edge_list_path(path: &str) -> anyhow::Result<Self> {
        let stem = path.strip_suffix(".gz").unwrap_or(path);
        let delim = match file_ext(stem).unwrap_or_default().as_ref() {
            "csv" => ',',
            "tsv" => '\t',
            other => anyhow::bail!(
                "unsupported network format `{}`; expected a .csv or .tsv edge list",
                other
            ),
        };

        let buf = open_buf_reader(path)?;
        let mut lines = buf.lines();

        let header = lines
            .next()
            .ok_or(anyhow::anyhow!("empty network file: {}", path))??;
        let columns: Vec<&str> = header.split(delim).map(|x| x.trim()).collect();
        if columns.len() < 2 || columns[0] != "source" || columns[1] != "target" {
            anyhow::bail!(
                "network file {} must start with `source{}target` columns",
                path,
                delim
            );
        }
        let has_tag = columns.len() > 2;

        let mut graph = Self::new();
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(delim).map(|x| x.trim()).collect();
            if fields.len() < 2 {
                anyhow::bail!("malformed edge line: {}", line);
            }
            let tag = (has_tag && fields.len() > 2 && !fields[2].is_empty())
                .then(|| Box::from(fields[2]));
            graph.add_edge(fields[0], fields[1], tag);
        }

        info!(
            "loaded network with {} nodes and {} edges",
            graph.num_nodes(),
            graph.num_edges()
        );
        Ok(graph)
    }

    /// Collapse parallel edges into a simple graph, dropping provenance tags
    pub fn simplify(&self) -> Self {
        let mut out = Self::new();
        for ix in self.graph.node_indices() {
            out.add_node(self.graph[ix].as_ref());
        }
        let mut seen = HashSet::new();
        for e in self.graph.edge_indices() {
            if let Some((s, t)) = self.graph.edge_endpoints(e) {
                let key = (s.min(t), s.max(t));
                if seen.insert(key) {
                    out.add_edge(self.graph[s].as_ref(), self.graph[t].as_ref(), None);
                }
            }
        }
        out
    }

    /// Edge-induced subgraph of the edges carrying the given database tag
    pub fn subgraph_by_database(&self, tag: &str) -> Self {
        let mut out = Self::new();
        for e in self.graph.edge_indices() {
            let keep = self
                .graph
                .edge_weight(e)
                .and_then(|w| w.as_ref())
                .is_some_and(|w| w.as_ref() == tag);
            if keep {
                if let Some((s, t)) = self.graph.edge_endpoints(e) {
                    out.add_edge(
                        self.graph[s].as_ref(),
                        self.graph[t].as_ref(),
                        Some(tag.into()),
                    );
                }
            }
        }
        out
    }

    /// Database tags observed on the edges, sorted
    pub fn database_tags(&self) -> Vec<Box<str>> {
        let mut tags: Vec<Box<str>> = self
            .graph
            .edge_weights()
            .filter_map(|w| w.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        tags.sort();
        tags
    }

    /// Dense graph Laplacian `L = D - A` over the collapsed simple graph;
    /// self-loops are ignored. The normalized variant is
    /// `I - D^{-1/2} A D^{-1/2}` with zero rows for isolated nodes.
    pub fn laplacian(&self, normalized: bool) -> Mat {
        let n = self.graph.node_count();
        let mut adj = Mat::zeros(n, n);

        for e in self.graph.edge_indices() {
            if let Some((s, t)) = self.graph.edge_endpoints(e) {
                let (i, j) = (s.index(), t.index());
                if i != j {
                    adj[(i, j)] = 1.0;
                    adj[(j, i)] = 1.0;
                }
            }
        }

        let degree: Vec<f64> = (0..n).map(|i| adj.row(i).sum()).collect();

        if normalized {
            Mat::from_fn(n, n, |i, j| {
                if i == j {
                    if degree[i] > 0.0 {
                        1.0
                    } else {
                        0.0
                    }
                } else if adj[(i, j)] > 0.0 {
                    -1.0 / (degree[i] * degree[j]).sqrt()
                } else {
                    0.0
                }
            })
        } else {
            Mat::from_fn(n, n, |i, j| {
                if i == j {
                    degree[i]
                } else {
                    -adj[(i, j)]
                }
            })
        }
    }
}
