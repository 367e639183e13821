//! Building the node set of a level: directly from the input graph at level
//! 0, or by collapsing each community of the previous level into one
//! hyper-node.

use crate::{
    algorithms::community_detection::community::{Community, HyperNode, NodeAssignment},
    core::entities::{ComID, VID},
    graph::Graph,
};
use rustc_hash::{FxHashMap, FxHashSet};

/// One node per graph vertex: neighbours and degree straight from the
/// adjacency, representing only itself.
pub fn level_zero_nodes(graph: &Graph) -> Vec<HyperNode> {
    graph
        .nodes()
        .map(|v| {
            HyperNode::new(
                v,
                graph.degree(v),
                0,
                graph.neighbours(v).clone(),
                FxHashSet::from_iter([v]),
            )
        })
        .collect()
}

/// Collapse the non-empty communities of a converged level into the node set
/// of the next level. An edge between two hyper-nodes carries the total
/// cross-community weight; the edges internal to a community fold into the
/// hyper-node's self-loop so incremental modularity stays exact.
pub fn create_hypernodes(communities: &[Community], assignment: &NodeAssignment) -> Vec<HyperNode> {
    let com_to_new: FxHashMap<ComID, VID> = communities
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id(), VID(i)))
        .collect();

    communities
        .iter()
        .enumerate()
        .map(|(i, community)| {
            let mut neighbours: FxHashMap<VID, u64> = FxHashMap::default();
            for (&nbr_key, &w) in community.neighbouring_communities() {
                let target = com_to_new[&assignment.com(nbr_key)];
                *neighbours.entry(target).or_insert(0) += w;
            }
            HyperNode::new(
                VID(i),
                community.total_degree(),
                community.internal_links(),
                neighbours,
                community.total_nodes().clone(),
            )
        })
        .collect()
}

/// One singleton community per node, each node assigned to its own.
pub fn singleton_communities(nodes: &[HyperNode]) -> (Vec<Community>, NodeAssignment) {
    let mut assignment = NodeAssignment::new_singletons(nodes.len());
    let communities = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| Community::from_node(ComID(i), node, &mut assignment))
        .collect();
    (communities, assignment)
}
