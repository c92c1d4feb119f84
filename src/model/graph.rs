//! Graph — validated topology stored in a petgraph DiGraph.
//!
//! Node indices follow input order, so iterating the digraph yields nodes
//! in the order the graph builder produced them.

use std::collections::{HashMap, HashSet};

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::types::{Edge, GraphResult, Node, NodeType, RawEdge, RawNode};
use crate::error::ValidationError;

/// Normalized directed multigraph of topology nodes.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub digraph: DiGraph<Node, Edge>,
    /// Maps node id → petgraph NodeIndex.
    pub node_index: HashMap<String, NodeIndex>,
}

impl Graph {
    /// Validate raw builder output and shape it into a `Graph`.
    ///
    /// Rejects empty ids and types, duplicate node or edge ids, and edges
    /// whose endpoints are not in the node set.
    pub fn normalize(
        raw_nodes: Vec<RawNode>,
        raw_edges: Vec<RawEdge>,
    ) -> Result<Self, ValidationError> {
        let mut digraph: DiGraph<Node, Edge> =
            DiGraph::with_capacity(raw_nodes.len(), raw_edges.len());
        let mut node_index: HashMap<String, NodeIndex> = HashMap::with_capacity(raw_nodes.len());

        for (index, raw) in raw_nodes.into_iter().enumerate() {
            if raw.id.trim().is_empty() {
                return Err(ValidationError::EmptyNodeId { index });
            }
            if raw.kind.trim().is_empty() {
                return Err(ValidationError::EmptyNodeType { id: raw.id });
            }
            if node_index.contains_key(&raw.id) {
                return Err(ValidationError::DuplicateNodeId(raw.id));
            }
            let node = Node {
                kind: NodeType::parse(&raw.kind),
                id: raw.id,
                label: raw.label,
                data: raw.data,
            };
            let id = node.id.clone();
            let idx = digraph.add_node(node);
            node_index.insert(id, idx);
        }

        let mut edge_ids: HashSet<String> = HashSet::with_capacity(raw_edges.len());
        for (index, raw) in raw_edges.into_iter().enumerate() {
            if raw.id.trim().is_empty() {
                return Err(ValidationError::EmptyEdgeId { index });
            }
            if !edge_ids.insert(raw.id.clone()) {
                return Err(ValidationError::DuplicateEdgeId(raw.id));
            }
            let Some(&src) = node_index.get(&raw.source) else {
                return Err(ValidationError::DanglingEdge {
                    edge: raw.id,
                    endpoint: raw.source,
                });
            };
            let Some(&tgt) = node_index.get(&raw.target) else {
                return Err(ValidationError::DanglingEdge {
                    edge: raw.id,
                    endpoint: raw.target,
                });
            };
            let edge = Edge {
                id: raw.id,
                source: raw.source,
                target: raw.target,
                label: raw.label,
            };
            digraph.add_edge(src, tgt, edge);
        }

        Ok(Self {
            digraph,
            node_index,
        })
    }

    pub fn node_count(&self) -> usize {
        self.digraph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.digraph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.digraph.node_count() == 0
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&idx| &self.digraph[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Nodes in input order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.digraph.node_weights()
    }

    /// Edges in input order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.digraph.edge_weights()
    }

    /// Edges as `(source index, target index, edge)` in input order.
    pub fn edge_endpoints(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &Edge)> {
        self.digraph
            .edge_references()
            .map(|e| (e.source(), e.target(), e.weight()))
    }

    /// Returns true if the graph is a directed acyclic graph.
    pub fn is_dag(&self) -> bool {
        !is_cyclic_directed(&self.digraph)
    }
}

impl GraphResult {
    /// Normalize the response's nodes and edges, dropping stats and warnings.
    pub fn into_graph(self) -> Result<Graph, ValidationError> {
        Graph::normalize(self.nodes, self.edges)
    }
}

impl TryFrom<GraphResult> for Graph {
    type Error = ValidationError;

    fn try_from(result: GraphResult) -> Result<Self, Self::Error> {
        result.into_graph()
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_model_graph.rs"]
mod tests;
