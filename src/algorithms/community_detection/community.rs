//! Mutable entities of the multi-level community detection engine.
//!
//! A [`HyperNode`] is immutable once created: at level 0 it wraps a graph
//! vertex, after a contraction it stands for an entire community of the
//! previous level. A [`Community`] is the mutable aggregate nodes move in and
//! out of during a passage; [`Community::add_node`] and
//! [`Community::remove_node`] are exact inverses, which is the invariant the
//! whole incremental bookkeeping rests on.

use crate::{
    core::entities::{ComID, VID},
    graph::Graph,
};
use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct HyperNode {
    key: VID,
    /// Carried degree: the weighted level-0 degree, or after a contraction
    /// the previous community's `total_degree`.
    degree: u64,
    /// Edge weight folded inside this node (previous community's internal
    /// links); 0 at level 0.
    self_loop: u64,
    /// Neighbour key at this level -> collapsed edge multiplicity.
    neighbours: FxHashMap<VID, u64>,
    /// Original-level nodes this node stands for.
    total_nodes: FxHashSet<VID>,
}

impl HyperNode {
    pub(crate) fn new(
        key: VID,
        degree: u64,
        self_loop: u64,
        neighbours: FxHashMap<VID, u64>,
        total_nodes: FxHashSet<VID>,
    ) -> Self {
        Self {
            key,
            degree,
            self_loop,
            neighbours,
            total_nodes,
        }
    }

    pub fn key(&self) -> VID {
        self.key
    }

    pub fn degree(&self) -> u64 {
        self.degree
    }

    pub fn self_loop(&self) -> u64 {
        self.self_loop
    }

    pub fn neighbours(&self) -> &FxHashMap<VID, u64> {
        &self.neighbours
    }

    /// Number of distinct neighbours at this level; the degree the gain
    /// formula works with once nodes are grouped into communities.
    pub fn local_degree(&self) -> u64 {
        self.neighbours.len() as u64
    }

    pub fn total_nodes(&self) -> &FxHashSet<VID> {
        &self.total_nodes
    }
}

/// Mapping from node key to its current community, owned by the level
/// controller and threaded by reference through the optimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeAssignment {
    node_to_com: Vec<ComID>,
}

impl NodeAssignment {
    pub fn new_singletons(n: usize) -> Self {
        Self {
            node_to_com: (0..n).map(ComID).collect(),
        }
    }

    pub fn com(&self, node: VID) -> ComID {
        self.node_to_com[node.index()]
    }

    pub fn assign(&mut self, node: VID, com: ComID) {
        self.node_to_com[node.index()] = com;
    }

    pub fn num_nodes(&self) -> usize {
        self.node_to_com.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Community {
    id: ComID,
    /// Member key -> refcount-style counter: 1 for the member itself plus the
    /// edge weight from the member into the rest of the community.
    nodes: FxHashMap<VID, u64>,
    /// Original-level nodes contained in the community.
    total_nodes: FxHashSet<VID>,
    /// Outside node key at this level -> total edge weight from the community
    /// to that node. Zero-weight entries are pruned, with one exception: a
    /// freshly removed node parks its own (possibly zero) counter here until
    /// the following `add_node` re-homes it.
    neighbouring_communities: FxHashMap<VID, u64>,
    /// Weighted count of edges with both endpoints inside, including edges
    /// folded inside member hyper-nodes.
    internal_links: u64,
    /// Sum of member local degrees (distinct-neighbour counts at this level).
    degree: u64,
    /// Sum of member carried degrees; the quantity the modularity formula
    /// requires.
    total_degree: u64,
    size: usize,
}

impl Community {
    /// Singleton community holding just `node`, which becomes assigned to it.
    pub(crate) fn from_node(id: ComID, node: &HyperNode, assignment: &mut NodeAssignment) -> Self {
        let mut nodes = FxHashMap::default();
        nodes.insert(node.key(), 1);
        assignment.assign(node.key(), id);
        Self {
            id,
            nodes,
            total_nodes: node.total_nodes().clone(),
            neighbouring_communities: node.neighbours().clone(),
            internal_links: node.self_loop(),
            degree: node.local_degree(),
            total_degree: node.degree(),
            size: 1,
        }
    }

    /// Move `node` into the community.
    ///
    /// Contract: `node` is not a member, and `neighbouring_communities`
    /// records how much edge weight already runs from the community to
    /// `node` (possibly zero, parked there by a preceding [`remove_node`]).
    /// Violations mean the edge-conservation invariant is already broken and
    /// abort the process. Runs in O(deg(node)).
    pub fn add_node(&mut self, node: &HyperNode, assignment: &mut NodeAssignment) {
        let link_weight = match self.neighbouring_communities.remove(&node.key()) {
            Some(w) => w,
            None => panic!(
                "add_node: no recorded edge weight from community {:?} to node {:?}",
                self.id,
                node.key()
            ),
        };
        assert!(
            !self.nodes.contains_key(&node.key()),
            "add_node: node {:?} is already a member of community {:?}",
            node.key(),
            self.id
        );

        // Promote the counter; the +1 stands for the member itself and is
        // discounted again whenever the counter is read as an edge weight.
        self.nodes.insert(node.key(), link_weight + 1);
        self.internal_links += link_weight + node.self_loop();

        // Each neighbour of the incoming node either sits outside (cross
        // weight grows) or is already a member (its counter grows).
        for (&nbr, &w) in node.neighbours() {
            if let Some(counter) = self.nodes.get_mut(&nbr) {
                *counter += w;
            } else {
                *self.neighbouring_communities.entry(nbr).or_insert(0) += w;
            }
        }

        self.total_nodes.extend(node.total_nodes().iter().copied());
        self.degree += node.local_degree();
        self.total_degree += node.degree();
        self.size += 1;
        assignment.assign(node.key(), self.id);
    }

    /// Exact inverse of [`add_node`]. The node's counter moves back into
    /// `neighbouring_communities` (even at weight zero, so a following
    /// `add_node` finds it); neighbour counters are decremented with
    /// zero-weight cross entries pruned. Removing a non-member aborts.
    ///
    /// The assignment is deliberately left pointing at this community: until
    /// the node is re-homed it is the default "stay put" candidate.
    pub fn remove_node(&mut self, node: &HyperNode) {
        let counter = match self.nodes.remove(&node.key()) {
            Some(c) => c,
            None => panic!(
                "remove_node: node {:?} is not a member of community {:?}",
                node.key(),
                self.id
            ),
        };
        let link_weight = counter - 1;
        self.internal_links -= link_weight + node.self_loop();
        self.neighbouring_communities.insert(node.key(), link_weight);

        for (&nbr, &w) in node.neighbours() {
            if let Some(member) = self.nodes.get_mut(&nbr) {
                *member -= w;
            } else {
                let cross = self
                    .neighbouring_communities
                    .get_mut(&nbr)
                    .unwrap_or_else(|| {
                        panic!(
                            "remove_node: missing cross entry for neighbour {nbr:?} of {:?}",
                            node.key()
                        )
                    });
                *cross -= w;
                if *cross == 0 {
                    self.neighbouring_communities.remove(&nbr);
                }
            }
        }

        for child in node.total_nodes() {
            self.total_nodes.remove(child);
        }
        self.degree -= node.local_degree();
        self.total_degree -= node.degree();
        self.size -= 1;
    }

    pub fn id(&self) -> ComID {
        self.id
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn internal_links(&self) -> u64 {
        self.internal_links
    }

    pub fn degree(&self) -> u64 {
        self.degree
    }

    pub fn total_degree(&self) -> u64 {
        self.total_degree
    }

    pub fn nodes(&self) -> &FxHashMap<VID, u64> {
        &self.nodes
    }

    pub fn total_nodes(&self) -> &FxHashSet<VID> {
        &self.total_nodes
    }

    pub fn neighbouring_communities(&self) -> &FxHashMap<VID, u64> {
        &self.neighbouring_communities
    }

    /// Edge weight currently recorded from the community to an outside node.
    pub fn shared_link_weight(&self, node: VID) -> u64 {
        self.neighbouring_communities
            .get(&node)
            .copied()
            .unwrap_or(0)
    }

    /// Human-readable label, concatenating the sorted names of all contained
    /// original-level nodes. Display only; identity is [`Community::id`].
    pub fn label(&self, graph: &Graph) -> String {
        let mut members: Vec<VID> = self.total_nodes.iter().copied().collect();
        members.sort();
        let joined = members.iter().map(|&v| graph.name(v)).join("|");
        format!("|{joined}")
    }

    /// Sorted names of the contained original-level nodes.
    pub fn member_names<'a>(&self, graph: &'a Graph) -> Vec<&'a str> {
        let mut members: Vec<VID> = self.total_nodes.iter().copied().collect();
        members.sort();
        members.into_iter().map(|v| graph.name(v)).collect()
    }
}

#[cfg(test)]
mod community_test {
    use super::*;
    use crate::algorithms::community_detection::contraction::{
        level_zero_nodes, singleton_communities,
    };
    use pretty_assertions::assert_eq;

    /// Triangle a-b-c plus pendant d attached to c.
    fn fixture() -> (Graph, Vec<HyperNode>) {
        let mut graph = Graph::new();
        graph.add_edge("a", "b", 1);
        graph.add_edge("b", "c", 1);
        graph.add_edge("a", "c", 1);
        graph.add_edge("c", "d", 1);
        let nodes = level_zero_nodes(&graph);
        (graph, nodes)
    }

    #[test]
    fn test_assemble_triangle() {
        let (graph, nodes) = fixture();
        let (mut communities, mut assignment) = singleton_communities(&nodes);
        let a = graph.node("a").unwrap();
        let b = graph.node("b").unwrap();
        let c = graph.node("c").unwrap();
        let d = graph.node("d").unwrap();

        // move b and c into a's community
        let home = assignment.com(a);
        communities[assignment.com(b).index()].remove_node(&nodes[b.index()]);
        communities[home.index()].add_node(&nodes[b.index()], &mut assignment);
        communities[assignment.com(c).index()].remove_node(&nodes[c.index()]);
        communities[home.index()].add_node(&nodes[c.index()], &mut assignment);

        let community = &communities[home.index()];
        assert_eq!(community.size(), 3);
        assert_eq!(community.internal_links(), 3);
        assert_eq!(community.total_degree(), 2 + 2 + 3);
        assert_eq!(community.degree(), 2 + 2 + 3);
        // only the pendant d remains adjacent
        assert_eq!(community.shared_link_weight(d), 1);
        assert_eq!(community.neighbouring_communities().len(), 1);
        assert_eq!(community.label(&graph), "|a|b|c");
        // membership counters: 1 + edge weight into the rest
        assert_eq!(community.nodes()[&a], 3);
        assert_eq!(community.nodes()[&b], 3);
        assert_eq!(community.nodes()[&c], 3);
    }

    #[test]
    fn test_remove_then_add_restores_exactly() {
        let (graph, nodes) = fixture();
        let (mut communities, mut assignment) = singleton_communities(&nodes);
        let a = graph.node("a").unwrap();
        let home = assignment.com(a);
        for name in ["b", "c", "d"] {
            let v = graph.node(name).unwrap();
            communities[assignment.com(v).index()].remove_node(&nodes[v.index()]);
            communities[home.index()].add_node(&nodes[v.index()], &mut assignment);
        }

        for node in &nodes {
            let before = communities[home.index()].clone();
            communities[home.index()].remove_node(node);
            communities[home.index()].add_node(node, &mut assignment);
            assert_eq!(communities[home.index()], before);
        }
    }

    #[test]
    fn test_isolated_node_parks_zero_counter() {
        let mut graph = Graph::new();
        graph.add_edge("a", "b", 1);
        graph.add_node("lonely");
        let nodes = level_zero_nodes(&graph);
        let (mut communities, mut assignment) = singleton_communities(&nodes);
        let lonely = graph.node("lonely").unwrap();
        let home = assignment.com(lonely);

        let before = communities[home.index()].clone();
        communities[home.index()].remove_node(&nodes[lonely.index()]);
        assert_eq!(communities[home.index()].shared_link_weight(lonely), 0);
        assert!(communities[home.index()].is_empty());
        communities[home.index()].add_node(&nodes[lonely.index()], &mut assignment);
        assert_eq!(communities[home.index()], before);
    }

    #[test]
    #[should_panic(expected = "not a member")]
    fn test_remove_non_member_aborts() {
        let (graph, nodes) = fixture();
        let (mut communities, assignment) = singleton_communities(&nodes);
        let a = graph.node("a").unwrap();
        let b = graph.node("b").unwrap();
        communities[assignment.com(a).index()].remove_node(&nodes[b.index()]);
    }

    #[test]
    #[should_panic(expected = "no recorded edge weight")]
    fn test_add_without_cross_entry_aborts() {
        let mut graph = Graph::new();
        graph.add_edge("a", "b", 1);
        graph.add_edge("c", "d", 1);
        let nodes = level_zero_nodes(&graph);
        let (mut communities, mut assignment) = singleton_communities(&nodes);
        let a = graph.node("a").unwrap();
        let c = graph.node("c").unwrap();
        // c has no edge into a's community
        let home = assignment.com(a);
        communities[home.index()].add_node(&nodes[c.index()], &mut assignment);
    }
}
