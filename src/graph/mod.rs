//! Undirected multigraph with opaque string node names.
//!
//! Parallel edges are collapsed into a single entry carrying their
//! multiplicity; node names are interned to dense [`VID`] handles so the
//! algorithms can index by position.

use crate::core::{entities::VID, utils::errors::GraphError};
use rustc_hash::FxHashMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Graph {
    names: Vec<String>,
    name_to_vid: FxHashMap<String, VID>,
    adj: Vec<FxHashMap<VID, u64>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a node name, returning its handle. Idempotent.
    pub fn add_node(&mut self, name: impl Into<String>) -> VID {
        let name = name.into();
        if let Some(&vid) = self.name_to_vid.get(&name) {
            return vid;
        }
        let vid = VID(self.names.len());
        self.name_to_vid.insert(name.clone(), vid);
        self.names.push(name);
        self.adj.push(FxHashMap::default());
        vid
    }

    /// Add an undirected edge with the given multiplicity, interning both
    /// endpoints. Repeated calls for the same pair accumulate multiplicity.
    /// Self-edges carry no information for the community structure and are
    /// skipped.
    pub fn add_edge(&mut self, src: impl Into<String>, dst: impl Into<String>, weight: u64) {
        let src = self.add_node(src);
        let dst = self.add_node(dst);
        if src == dst {
            debug!(node = self.name(src), "skipping self-edge");
            return;
        }
        *self.adj[src.index()].entry(dst).or_insert(0) += weight;
        *self.adj[dst.index()].entry(src).or_insert(0) += weight;
    }

    pub fn count_nodes(&self) -> usize {
        self.names.len()
    }

    /// Total edge count of the graph, counting multiplicities. This is the
    /// `m` the modularity formula is normalised by.
    pub fn count_edges(&self) -> u64 {
        self.adj
            .iter()
            .map(|nbrs| nbrs.values().sum::<u64>())
            .sum::<u64>()
            / 2
    }

    pub fn nodes(&self) -> impl Iterator<Item = VID> + '_ {
        (0..self.names.len()).map(VID)
    }

    pub fn name(&self, node: VID) -> &str {
        &self.names[node.index()]
    }

    pub fn node(&self, name: &str) -> Result<VID, GraphError> {
        self.name_to_vid
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::NodeNameError(name.to_string()))
    }

    /// Sum of incident edge multiplicities.
    pub fn degree(&self, node: VID) -> u64 {
        self.adj[node.index()].values().sum()
    }

    pub fn neighbours(&self, node: VID) -> &FxHashMap<VID, u64> {
        &self.adj[node.index()]
    }

    pub fn has_edge(&self, a: VID, b: VID) -> bool {
        self.adj[a.index()].contains_key(&b)
    }

    pub fn edge_weight(&self, a: VID, b: VID) -> u64 {
        self.adj[a.index()].get(&b).copied().unwrap_or(0)
    }
}
