//! Random-walk message distribution over detected communities.
//!
//! Models a message seeded inside one community spreading through the
//! original graph: a walk takes uniform random steps over neighbours until
//! every community has at least one visited node.

use crate::{
    algorithms::community_detection::community::Community,
    core::{entities::VID, utils::errors::GraphError},
    graph::Graph,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rustc_hash::FxHashMap;
use tracing::info;

/// Default bound on steps per walk.
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// Run `walks` message-distribution walks and return the visited node names
/// in walk order. Walk `i` is seeded at a random member of community
/// `i % communities.len()`. A walk that hits the step cap before reaching
/// every community (stranded on a disconnected graph, or seeded at a
/// degree-0 node) is an error carrying the partial path.
///
/// Pass a seed for reproducible walks.
pub fn distribute_messages(
    graph: &Graph,
    communities: &[Community],
    walks: usize,
    max_steps: Option<usize>,
    seed: Option<u64>,
) -> Result<Vec<Vec<String>>, GraphError> {
    if communities.is_empty() {
        return Err(GraphError::EmptyGraph);
    }
    let max_steps = max_steps.unwrap_or(DEFAULT_MAX_STEPS);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut community_of: FxHashMap<VID, usize> = FxHashMap::default();
    for (index, community) in communities.iter().enumerate() {
        for &node in community.total_nodes() {
            community_of.insert(node, index);
        }
    }

    let mut paths = Vec::with_capacity(walks);
    for walk in 0..walks {
        let seed_community = &communities[walk % communities.len()];
        let mut members: Vec<VID> = seed_community.total_nodes().iter().copied().collect();
        members.sort();
        let mut current = members[rng.gen_range(0..members.len())];

        let mut visited = vec![false; communities.len()];
        let mut visited_count = 0usize;
        let visit = |node: VID, visited: &mut Vec<bool>, visited_count: &mut usize| {
            let com = community_of[&node];
            if !visited[com] {
                visited[com] = true;
                *visited_count += 1;
            }
        };
        visit(current, &mut visited, &mut visited_count);
        let mut path = vec![graph.name(current).to_string()];

        let mut steps = 0;
        while visited_count < communities.len() {
            if steps == max_steps {
                return Err(GraphError::StrandedWalk {
                    steps,
                    visited: visited_count,
                    communities: communities.len(),
                    path,
                });
            }
            let neighbours = graph.neighbours(current);
            if neighbours.is_empty() {
                return Err(GraphError::StrandedWalk {
                    steps,
                    visited: visited_count,
                    communities: communities.len(),
                    path,
                });
            }
            let choices: Vec<VID> = neighbours.keys().copied().collect();
            current = choices[rng.gen_range(0..choices.len())];
            visit(current, &mut visited, &mut visited_count);
            path.push(graph.name(current).to_string());
            steps += 1;
        }
        info!(walk, steps, "message reached every community");
        paths.push(path);
    }
    Ok(paths)
}
