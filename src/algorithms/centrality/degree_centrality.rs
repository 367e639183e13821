//! Degree-centrality ranking within detected communities.

use crate::{algorithms::community_detection::community::Community, graph::Graph};
use rayon::prelude::*;
use std::cmp::Reverse;

/// For each community, the `n` member names with the highest original-graph
/// degree, ordered descending with ties broken by node handle. Communities
/// smaller than `n` report all their members. Results are keyed by community
/// label, in community order.
pub fn top_users(
    graph: &Graph,
    communities: &[Community],
    n: usize,
) -> Vec<(String, Vec<String>)> {
    communities
        .par_iter()
        .map(|community| {
            (
                community.label(graph),
                highest_degrees_in_community(graph, community, n),
            )
        })
        .collect()
}

/// The `n` top member names of a single community by degree centrality.
pub fn highest_degrees_in_community(
    graph: &Graph,
    community: &Community,
    n: usize,
) -> Vec<String> {
    let mut members: Vec<_> = community.total_nodes().iter().copied().collect();
    members.sort_by_key(|&v| (Reverse(graph.degree(v)), v));
    members
        .into_iter()
        .take(n)
        .map(|v| graph.name(v).to_string())
        .collect()
}
