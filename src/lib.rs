//! # sociogram
//!
//! Multi-level modularity community detection for undirected,
//! weighted-by-multiplicity graphs, with the collaborators a social-graph
//! analysis needs around it: edge-list loading, per-community degree
//! centrality, random-walk message distribution and colored layout
//! rendering.
//!
//! The engine is the classic two-phase iteration: greedily move nodes into
//! the neighbouring community with the highest modularity gain until nothing
//! moves, then collapse each community into a hyper-node and repeat on the
//! contracted graph, rolling back one level as soon as modularity stops
//! improving.
//!
//! ## Example
//!
//! ```
//! use sociogram::prelude::*;
//!
//! let mut graph = Graph::new();
//! graph.add_edge("a", "b", 1);
//! graph.add_edge("b", "c", 1);
//! graph.add_edge("a", "c", 1);
//! graph.add_edge("c", "d", 1);
//!
//! let result = louvain(&graph, None)?;
//! assert!(!result.communities.is_empty());
//! # Ok::<(), GraphError>(())
//! ```

pub mod algorithms;
pub mod core;
pub mod graph;
pub mod graph_loader;
pub mod vis;

pub mod prelude {
    pub use crate::{
        algorithms::{
            centrality::degree_centrality::top_users,
            community_detection::louvain::{louvain, LouvainResult},
            pathing::random_walk::distribute_messages,
        },
        core::utils::errors::GraphError,
        graph::Graph,
        graph_loader::edge_list::EdgeListLoader,
    };
}
