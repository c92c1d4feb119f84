//! Graph model — validated nodes and edges plus the collaborator wire types.

pub mod graph;
pub mod types;

pub use graph::Graph;
pub use types::{
    ConfigFormat, Edge, GraphResult, GraphStats, Node, NodeType, RawEdge, RawNode,
    VisualizeRequest,
};
