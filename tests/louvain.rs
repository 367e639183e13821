use proptest::prelude::*;
use sociogram::{
    algorithms::{
        community_detection::{
            contraction::{level_zero_nodes, singleton_communities},
            local_move::run_passage,
            modularity::{edge_conservation_holds, modularity, recompute_modularity},
        },
        layout::fruchterman_reingold::fruchterman_reingold,
    },
    core::utils::logging::global_info_logger,
    prelude::*,
    vis::draw_communities,
};
use std::path::PathBuf;

fn graph_from_pairs(pairs: &[(u8, u8)]) -> Graph {
    let mut graph = Graph::new();
    for &(a, b) in pairs {
        if a == b {
            graph.add_node(a.to_string());
        } else {
            graph.add_edge(a.to_string(), b.to_string(), 1);
        }
    }
    graph
}

#[test]
fn end_to_end_on_the_sample_edge_list() {
    global_info_logger();
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "resource", "testgraph.txt"]
        .iter()
        .collect();
    let graph = EdgeListLoader::new(&path).load().unwrap();
    assert_eq!(graph.count_nodes(), 10);
    assert_eq!(graph.count_edges(), 21);

    let result = louvain(&graph, None).unwrap();
    assert_eq!(result.communities.len(), 2);

    let rankings = top_users(&graph, &result.communities, 2);
    assert_eq!(rankings.len(), 2);
    for (_, top) in &rankings {
        assert_eq!(top.len(), 2);
    }
    // the bridge endpoints have the highest degree in their cliques
    assert!(rankings.iter().any(|(_, top)| top[0] == "4"));
    assert!(rankings.iter().any(|(_, top)| top[0] == "5"));

    let walks = distribute_messages(&graph, &result.communities, 2, None, Some(99)).unwrap();
    assert_eq!(walks.len(), 2);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("partition.png");
    let positions = fruchterman_reingold(&graph, 100, 1.0, 0.95, 0.05, Some(99));
    draw_communities(&graph, &result.communities, &positions, &out, 800, 800).unwrap();
    assert!(out.exists());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn partition_properties_hold_on_random_graphs(
        pairs in prop::collection::vec((0u8..15, 0u8..15), 1..40)
    ) {
        let graph = graph_from_pairs(&pairs);
        let result = louvain(&graph, None).unwrap();

        // partition completeness: every node in exactly one community
        let mut seen = std::collections::HashSet::new();
        for community in &result.communities {
            for &node in community.total_nodes() {
                prop_assert!(seen.insert(node));
            }
        }
        prop_assert_eq!(seen.len(), graph.count_nodes());

        // edge conservation and exact incremental accounting
        prop_assert!(edge_conservation_holds(&result.communities, graph.count_edges()));
        let check = recompute_modularity(&graph, &result.communities);
        prop_assert!((result.modularity - check).abs() < 1e-9);
    }

    #[test]
    fn runs_are_deterministic_on_random_graphs(
        pairs in prop::collection::vec((0u8..12, 0u8..12), 1..30)
    ) {
        let graph = graph_from_pairs(&pairs);
        let first = louvain(&graph, None).unwrap();
        let second = louvain(&graph, None).unwrap();
        let labels = |r: &LouvainResult| {
            let mut all: Vec<String> = r.communities.iter().map(|c| c.label(&graph)).collect();
            all.sort();
            all
        };
        prop_assert_eq!(labels(&first), labels(&second));
        prop_assert_eq!(first.modularity, second.modularity);
    }

    #[test]
    fn remove_then_add_is_the_identity_after_a_passage(
        pairs in prop::collection::vec((0u8..10, 0u8..10), 1..30)
    ) {
        let graph = graph_from_pairs(&pairs);
        let m = graph.count_edges();
        prop_assume!(m > 0);
        let nodes = level_zero_nodes(&graph);
        let (mut communities, mut assignment) = singleton_communities(&nodes);
        run_passage(&mut communities, &nodes, &mut assignment, m, 1000, 0).unwrap();
        let q = modularity(&communities, m);

        for node in &nodes {
            let home = assignment.com(node.key());
            let before = communities[home.index()].clone();
            communities[home.index()].remove_node(node);
            communities[home.index()].add_node(node, &mut assignment);
            prop_assert_eq!(&communities[home.index()], &before);
        }
        prop_assert_eq!(modularity(&communities, m), q);
    }
}
