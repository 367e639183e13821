//! Passage/level controller for multi-level community detection.
//!
//! Each level optimizes a fresh set of singleton communities with the
//! local-move phase, snapshots the result into the dendrogram, and contracts
//! the communities into the next level's hyper-nodes. The run ends when a
//! level fails to improve modularity, rolling back to the previous level's
//! partition.

use crate::{
    algorithms::community_detection::{
        community::Community,
        contraction::{create_hypernodes, level_zero_nodes, singleton_communities},
        local_move::run_passage,
        modularity::modularity,
    },
    core::utils::errors::GraphError,
    graph::Graph,
};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// Default bound on sweeps within a single passage.
pub const DEFAULT_MAX_SWEEPS: usize = 1000;

/// Accepted final partition of a run.
#[derive(Debug, Clone)]
pub struct LouvainResult {
    /// Communities of the accepted level. Read-only for consumers.
    pub communities: Vec<Community>,
    /// Modularity of the accepted partition.
    pub modularity: f64,
    /// Number of accepted levels (1 = the level-0 partition was final).
    pub levels: usize,
}

/// Serializable per-community summary for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct CommunitySummary {
    pub label: String,
    pub size: usize,
    pub members: Vec<String>,
}

impl LouvainResult {
    pub fn summaries(&self, graph: &Graph) -> Vec<CommunitySummary> {
        self.communities
            .iter()
            .map(|c| CommunitySummary {
                label: c.label(graph),
                size: c.total_nodes().len(),
                members: c
                    .member_names(graph)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
            .collect()
    }
}

/// Run multi-level modularity optimization over `graph`.
///
/// `max_sweeps` bounds the sweeps of every passage; blowing the budget
/// surfaces as [`GraphError::NotConverged`] carrying the partition of the
/// last level that did converge. A graph without edges yields the trivial
/// all-singleton partition.
pub fn louvain(graph: &Graph, max_sweeps: Option<usize>) -> Result<LouvainResult, GraphError> {
    if graph.count_nodes() == 0 {
        return Err(GraphError::EmptyGraph);
    }
    let m = graph.count_edges();
    let max_sweeps = max_sweeps.unwrap_or(DEFAULT_MAX_SWEEPS);

    let mut nodes = level_zero_nodes(graph);
    if m == 0 {
        warn!("graph has no edges, returning singleton communities");
        let (communities, _) = singleton_communities(&nodes);
        return Ok(LouvainResult {
            communities,
            modularity: 0.0,
            levels: 1,
        });
    }

    let start = Instant::now();
    let mut dendrogram: Vec<Vec<Community>> = Vec::new();
    let mut best_q = f64::NEG_INFINITY;
    let mut level = 0;
    loop {
        let (mut communities, mut assignment) = singleton_communities(&nodes);
        if level == 0 {
            best_q = modularity(&communities, m);
        }

        let passage_start = Instant::now();
        let sweeps = match run_passage(&mut communities, &nodes, &mut assignment, m, max_sweeps, level)
        {
            Ok(sweeps) => sweeps,
            Err(GraphError::NotConverged { level, sweeps, .. }) => {
                return Err(GraphError::NotConverged {
                    level,
                    sweeps,
                    last_stable: dendrogram.pop().unwrap_or_default(),
                })
            }
            Err(other) => return Err(other),
        };
        let q = modularity(&communities, m);
        let active: Vec<Community> = communities.into_iter().filter(|c| !c.is_empty()).collect();
        info!(
            level,
            sweeps,
            communities = active.len(),
            modularity = q,
            elapsed_ms = passage_start.elapsed().as_millis() as u64,
            "passage converged"
        );

        if level > 0 && q < best_q {
            // this level made things worse; the previous one is optimal
            let communities = dendrogram.pop().expect("level > 0 implies a snapshot");
            info!(
                levels = level,
                communities = communities.len(),
                modularity = best_q,
                total_elapsed_ms = start.elapsed().as_millis() as u64,
                "rolled back to previous level"
            );
            return Ok(LouvainResult {
                communities,
                modularity: best_q,
                levels: level,
            });
        }

        let merged = active.len() < nodes.len();
        best_q = q;
        dendrogram.push(active);
        // keep only the latest accepted snapshot around; earlier ones can
        // never be rolled back to
        if dendrogram.len() > 1 {
            dendrogram.remove(0);
        }

        let current = dendrogram.last().expect("just pushed");
        if current.len() == 1 || !merged {
            // contraction would reproduce the same graph; this level is final
            let communities = dendrogram.pop().expect("just pushed");
            info!(
                levels = level + 1,
                communities = communities.len(),
                modularity = best_q,
                total_elapsed_ms = start.elapsed().as_millis() as u64,
                "no further contraction possible"
            );
            return Ok(LouvainResult {
                communities,
                modularity: best_q,
                levels: level + 1,
            });
        }

        nodes = create_hypernodes(current, &assignment);
        level += 1;
    }
}

#[cfg(test)]
mod louvain_test {
    use super::*;
    use crate::{
        algorithms::community_detection::modularity::{
            edge_conservation_holds, recompute_modularity,
        },
        core::utils::logging::global_info_logger,
        graph_loader::example::karate_club::karate_club_graph,
    };
    use itertools::Itertools;
    use rustc_hash::FxHashSet;

    fn two_cliques_with_bridge(k: usize) -> Graph {
        let mut graph = Graph::new();
        for prefix in ["l", "r"] {
            for i in 0..k {
                for j in i + 1..k {
                    graph.add_edge(format!("{prefix}{i}"), format!("{prefix}{j}"), 1);
                }
            }
        }
        graph.add_edge("l0", "r0", 1);
        graph
    }

    fn assert_partition_complete(graph: &Graph, result: &LouvainResult) {
        let mut seen = FxHashSet::default();
        for community in &result.communities {
            for &node in community.total_nodes() {
                assert!(seen.insert(node), "node {node:?} appears twice");
            }
        }
        assert_eq!(seen.len(), graph.count_nodes());
    }

    #[test]
    fn test_two_cliques_split_at_the_bridge() {
        global_info_logger();
        let graph = two_cliques_with_bridge(5);
        let result = louvain(&graph, None).unwrap();
        assert_eq!(result.communities.len(), 2);
        assert_partition_complete(&graph, &result);

        let labels: Vec<String> = result
            .communities
            .iter()
            .map(|c| c.label(&graph))
            .sorted()
            .collect();
        assert_eq!(labels, vec!["|l0|l1|l2|l3|l4", "|r0|r1|r2|r3|r4"]);

        // the bridge counts as inter-community weight, not internal
        let m = graph.count_edges();
        assert_eq!(m, 21);
        for community in &result.communities {
            assert_eq!(community.internal_links(), 10);
        }
        let check = recompute_modularity(&graph, &result.communities);
        assert!((result.modularity - check).abs() < 1e-12);
    }

    #[test]
    fn test_complete_graph_is_one_community() {
        let mut graph = Graph::new();
        for i in 0..4 {
            for j in i + 1..4 {
                graph.add_edge(i.to_string(), j.to_string(), 1);
            }
        }
        let result = louvain(&graph, None).unwrap();
        assert_eq!(result.communities.len(), 1);
        assert_eq!(result.communities[0].total_nodes().len(), 4);
        assert!(result.modularity.abs() < 1e-12);
    }

    #[test]
    fn test_karate_club_partition() {
        global_info_logger();
        let graph = karate_club_graph();
        let result = louvain(&graph, None).unwrap();
        assert_partition_complete(&graph, &result);
        assert!(
            result.modularity > 0.3,
            "modularity {} too low",
            result.modularity
        );
        assert!((2..=8).contains(&result.communities.len()));
        let check = recompute_modularity(&graph, &result.communities);
        assert!((result.modularity - check).abs() < 1e-12);
        assert!(edge_conservation_holds(
            &result.communities,
            graph.count_edges()
        ));
    }

    #[test]
    fn test_runs_are_deterministic() {
        let graph = karate_club_graph();
        let first = louvain(&graph, None).unwrap();
        let second = louvain(&graph, None).unwrap();
        let labels = |r: &LouvainResult| {
            r.communities
                .iter()
                .map(|c| c.label(&graph))
                .sorted()
                .collect::<Vec<_>>()
        };
        assert_eq!(labels(&first), labels(&second));
        assert_eq!(first.modularity, second.modularity);
        assert_eq!(first.levels, second.levels);
    }

    #[test]
    fn test_edgeless_graph_stays_singleton() {
        let mut graph = Graph::new();
        graph.add_node("a");
        graph.add_node("b");
        let result = louvain(&graph, None).unwrap();
        assert_eq!(result.communities.len(), 2);
        assert_eq!(result.modularity, 0.0);
    }

    #[test]
    fn test_empty_graph_is_an_input_error() {
        let graph = Graph::new();
        assert!(matches!(
            louvain(&graph, None),
            Err(GraphError::EmptyGraph)
        ));
    }

    #[test]
    fn test_exhausted_budget_surfaces_not_converged() {
        let graph = two_cliques_with_bridge(4);
        let err = louvain(&graph, Some(0)).unwrap_err();
        match err {
            GraphError::NotConverged {
                level,
                sweeps,
                last_stable,
            } => {
                assert_eq!(level, 0);
                assert_eq!(sweeps, 0);
                assert!(last_stable.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_modularity_is_monotonic_over_levels() {
        let graph = karate_club_graph();
        let m = graph.count_edges();
        let nodes = level_zero_nodes(&graph);
        let (singles, _) = singleton_communities(&nodes);
        let q_singletons = modularity(&singles, m);
        let result = louvain(&graph, None).unwrap();
        assert!(result.modularity >= q_singletons);
    }
}
