//! Local-move optimizer: one passage over a fixed node list, repeated until a
//! full sweep moves nothing.

use crate::{
    algorithms::community_detection::community::{Community, HyperNode, NodeAssignment},
    core::{entities::ComID, utils::errors::GraphError},
};
use tracing::debug;

/// Sweep the nodes, relocating each into the neighbouring community with the
/// highest positive modularity gain, until a sweep produces zero moves.
/// `m` is the level-0 edge count, constant across levels. Returns the number
/// of sweeps taken; exceeding `max_sweeps` is the non-convergence condition.
///
/// Empty communities stay in the slab so [`ComID`]s remain stable; callers
/// filter them out when collecting the partition.
pub fn run_passage(
    communities: &mut [Community],
    nodes: &[HyperNode],
    assignment: &mut NodeAssignment,
    m: u64,
    max_sweeps: usize,
    level: usize,
) -> Result<usize, GraphError> {
    let mut sweeps = 0;
    loop {
        if sweeps == max_sweeps {
            return Err(GraphError::NotConverged {
                level,
                sweeps,
                last_stable: Vec::new(),
            });
        }
        sweeps += 1;
        let mut moves = 0usize;
        for node in nodes {
            let old_com = assignment.com(node.key());
            communities[old_com.index()].remove_node(node);
            let best = choose_best_community(node, communities, assignment, m);
            communities[best.index()].add_node(node, assignment);
            if best != old_com {
                moves += 1;
            }
        }
        debug!(level, sweeps, moves, "sweep finished");
        if moves == 0 {
            return Ok(sweeps);
        }
    }
}

/// Pick the community adjacent to `node` with the strictly greatest positive
/// modularity gain
///
/// ```text
/// d_ij = 2 * (edge weight between node and the candidate)
/// gain = (1 / 2m) * (d_ij - degree(node) * degree(candidate) / m)
/// ```
///
/// The running best starts at zero and the comparison is strict, so a
/// zero-or-negative candidate never displaces the default of staying in the
/// community the node was just removed from (still recorded in the
/// assignment). Ties resolve to the first candidate in neighbour iteration
/// order, which is deterministic for a fixed insertion sequence.
fn choose_best_community(
    node: &HyperNode,
    communities: &[Community],
    assignment: &NodeAssignment,
    m: u64,
) -> ComID {
    let m = m as f64;
    let degree_i = node.local_degree() as f64;
    let mut best = assignment.com(node.key());
    let mut best_gain = 0.0;
    for &nbr in node.neighbours().keys() {
        let candidate = assignment.com(nbr);
        let community = &communities[candidate.index()];
        let d_ij = 2.0 * community.shared_link_weight(node.key()) as f64;
        let degree_j = community.degree() as f64;
        let gain = (d_ij - degree_i * degree_j / m) / (2.0 * m);
        if gain > best_gain {
            best_gain = gain;
            best = candidate;
        }
    }
    best
}
