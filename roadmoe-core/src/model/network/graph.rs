use hashbrown::HashMap;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use super::components::Edge;
use crate::EdgeIdx;

/// Directed junction graph; nodes carry junction ids, edges carry the index
/// of the road edge joining them
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    pub graph: DiGraph<String, EdgeIdx>,
    pub(crate) node_index: HashMap<String, NodeIndex>,
}

impl RoadGraph {
    /// Build from every normal edge. Parallel edges collapse into one link,
    /// the later edge winning.
    pub(crate) fn from_edges(edges: &[Edge]) -> Self {
        let mut road_graph = RoadGraph::default();
        for (idx, edge) in edges.iter().enumerate() {
            let (Some(from), Some(to)) = (&edge.from_id, &edge.to_id) else {
                continue;
            };
            let a = road_graph.node(from);
            let b = road_graph.node(to);
            road_graph.graph.update_edge(a, b, idx);
        }
        road_graph
    }

    fn node(&mut self, junction_id: &str) -> NodeIndex {
        if let Some(&node) = self.node_index.get(junction_id) {
            return node;
        }
        let node = self.graph.add_node(junction_id.to_string());
        self.node_index.insert(junction_id.to_string(), node);
        node
    }

    pub fn node_of(&self, junction_id: &str) -> Option<NodeIndex> {
        self.node_index.get(junction_id).copied()
    }

    pub fn junction_id(&self, node: NodeIndex) -> &str {
        &self.graph[node]
    }

    /// Road edge joining two consecutive path nodes
    pub fn edge_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIdx> {
        self.graph
            .find_edge(a, b)
            .map(|link| self.graph[link])
    }

    /// Nodes without incoming links
    pub fn entrances(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices().filter(|&node| {
            self.graph
                .neighbors_directed(node, Direction::Incoming)
                .next()
                .is_none()
        })
    }

    /// Nodes without outgoing links
    pub fn exits(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices().filter(|&node| {
            self.graph
                .neighbors_directed(node, Direction::Outgoing)
                .next()
                .is_none()
        })
    }
}
