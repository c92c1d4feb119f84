//! Layout engine — convenience API for full graph layout.

pub mod sugiyama;
pub mod types;

pub use sugiyama::{RankAssignment, SugiyamaLayout};
pub use types::{LayoutResult, Point, PositionedNode, Rect, RoutedEdge};

use log::warn;

use crate::config::LayoutConfig;
use crate::model::Graph;

/// Graphs beyond this many nodes still lay out, but slowly enough to note.
pub const MAX_LAYOUT_NODES: usize = 5_000;

/// Run the full layout pipeline with the default geometry.
pub fn full_layout(graph: &Graph) -> LayoutResult {
    full_layout_with_config(graph, &LayoutConfig::default())
}

/// Run the full layout pipeline with a custom config.
pub fn full_layout_with_config(graph: &Graph, config: &LayoutConfig) -> LayoutResult {
    if graph.node_count() > MAX_LAYOUT_NODES {
        warn!(
            "laying out {} nodes (practical bound is {})",
            graph.node_count(),
            MAX_LAYOUT_NODES
        );
    }
    SugiyamaLayout::new(config.clone()).layout(graph)
}
