//! Layout types: Point, Rect, PositionedNode, RoutedEdge, LayoutResult.

use std::collections::HashMap;

use crate::model::NodeType;

// ─── Point ───────────────────────────────────────────────────────────────────

/// A 2-D point in world or screen units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// ─── Rect ────────────────────────────────────────────────────────────────────

/// Axis-aligned box; `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Edges are inclusive.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Smallest rect covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }
}

// ─── PositionedNode ──────────────────────────────────────────────────────────

/// A graph node with its layout-assigned box.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub id: String,
    pub kind: NodeType,
    pub label: String,
    pub rank: usize,
    /// Index within the rank after crossing minimisation.
    pub order: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PositionedNode {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ─── RoutedEdge ──────────────────────────────────────────────────────────────

/// An edge with the control points the renderer draws through.
///
/// `points` runs from the source anchor to the target anchor in the edge's
/// original direction, even when the edge was reversed for ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: Option<String>,
    pub points: Vec<Point>,
}

// ─── LayoutResult ────────────────────────────────────────────────────────────

/// The full output of the layout pipeline.
#[derive(Debug, Clone, Default)]
pub struct LayoutResult {
    /// Positioned nodes in graph input order.
    pub nodes: Vec<PositionedNode>,
    /// Routed edges in graph input order.
    pub edges: Vec<RoutedEdge>,
    pub rank_count: usize,
    index: HashMap<String, usize>,
}

impl LayoutResult {
    pub fn new(nodes: Vec<PositionedNode>, edges: Vec<RoutedEdge>, rank_count: usize) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        Self {
            nodes,
            edges,
            rank_count,
            index,
        }
    }

    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Top-left corner of the node's box.
    pub fn position(&self, id: &str) -> Option<Point> {
        self.node(id).map(PositionedNode::position)
    }

    /// `nodeId → (x, y)` for every node.
    pub fn positions(&self) -> HashMap<String, Point> {
        self.nodes
            .iter()
            .map(|n| (n.id.clone(), n.position()))
            .collect()
    }

    /// Bounding box of all nodes and edge points, or `None` for an empty layout.
    pub fn bounds(&self) -> Option<Rect> {
        let mut rects = self.nodes.iter().map(PositionedNode::rect).chain(
            self.edges
                .iter()
                .flat_map(|e| e.points.iter())
                .map(|p| Rect::new(p.x, p.y, 0.0, 0.0)),
        );
        let first = rects.next()?;
        Some(rects.fold(first, |acc, r| acc.union(&r)))
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_types.rs"]
mod tests;
