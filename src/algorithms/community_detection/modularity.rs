//! Modularity accounting.
//!
//! The per-community `internal_links` and `total_degree` counters are kept
//! exact by the mutation operations, so the modularity of a partition is a
//! single pass over the communities. The quadratic from-scratch recompute
//! against the level-0 graph survives as a verification tool for tests.

use crate::{algorithms::community_detection::community::Community, graph::Graph};

/// `Q = sum over communities of internal_links / m - (total_degree / 2m)^2`,
/// with `m` fixed at the level-0 edge count for the whole run. Empty
/// communities contribute nothing.
pub fn modularity(communities: &[Community], m: u64) -> f64 {
    let m = m as f64;
    communities
        .iter()
        .filter(|c| !c.is_empty())
        .map(|c| {
            let internal = c.internal_links() as f64;
            let degree_share = c.total_degree() as f64 / (2.0 * m);
            internal / m - degree_share * degree_share
        })
        .sum()
}

/// Recompute modularity from scratch against the level-0 graph, checking all
/// member pairs for adjacency. O(|community|^2) per community; verification
/// only, the incremental counters must agree with it.
pub fn recompute_modularity(graph: &Graph, communities: &[Community]) -> f64 {
    let m = graph.count_edges() as f64;
    communities
        .iter()
        .filter(|c| !c.is_empty())
        .map(|community| {
            let mut internal = 0u64;
            let mut total_degree = 0u64;
            for &u in community.total_nodes() {
                total_degree += graph.degree(u);
                for &v in community.total_nodes() {
                    if u != v {
                        internal += graph.edge_weight(u, v);
                    }
                }
            }
            let internal = (internal / 2) as f64;
            let degree_share = total_degree as f64 / (2.0 * m);
            internal / m - degree_share * degree_share
        })
        .sum()
}

/// Edge conservation: internal links plus half the (doubly counted)
/// cross-community weight must add back up to `m`. Holds at every level since
/// hyper-node-internal weight is folded into `internal_links`.
pub fn edge_conservation_holds(communities: &[Community], m: u64) -> bool {
    let internal: u64 = communities.iter().map(|c| c.internal_links()).sum();
    let cross: u64 = communities
        .iter()
        .map(|c| c.neighbouring_communities().values().sum::<u64>())
        .sum();
    internal + cross / 2 == m && cross % 2 == 0
}
