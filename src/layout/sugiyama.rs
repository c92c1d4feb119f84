//! Sugiyama layered graph layout algorithm, left to right.
//!
//! Phases:
//!   1. Cycle breaking (DFS back-edges reversed for ranking only)
//!   2. Rank assignment (longest path from sources)
//!   3. Virtual node insertion for edges spanning several ranks
//!   4. Crossing minimisation (barycenter sweeps)
//!   5. Coordinate assignment
//!   6. Edge routing through virtual nodes
//!
//! Every phase works on dense indices: real nodes keep their graph index
//! `0..n`, virtual nodes are numbered from `n` upwards.

use std::collections::VecDeque;

use log::debug;

use super::types::{LayoutResult, Point, PositionedNode, RoutedEdge};
use crate::config::LayoutConfig;
use crate::model::Graph;

/// Horizontal and vertical reach of a self-loop beyond its node box.
const SELF_LOOP_REACH: f64 = 20.0;

// ─── Cycle Breaking + Rank Assignment ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Finished,
}

/// Ranks for the real nodes of a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankAssignment {
    /// Rank per node, indexed by graph node index.
    pub ranks: Vec<usize>,
    pub rank_count: usize,
    /// Per edge in input order: reversed for ranking because it closed a cycle.
    pub reversed: Vec<bool>,
}

impl RankAssignment {
    pub fn assign(graph: &Graph) -> Self {
        let n = graph.node_count();
        let endpoints: Vec<(usize, usize)> = graph
            .edge_endpoints()
            .map(|(s, t, _)| (s.index(), t.index()))
            .collect();
        Self::from_edges(n, &endpoints)
    }

    /// Rank `n` nodes connected by `(source, target)` index pairs.
    pub fn from_edges(n: usize, endpoints: &[(usize, usize)]) -> Self {
        let reversed = find_back_edges(n, endpoints);

        let mut succ: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut in_degree: Vec<usize> = vec![0; n];
        for (e, &(s, t)) in endpoints.iter().enumerate() {
            if s == t {
                continue;
            }
            let (u, v) = if reversed[e] { (t, s) } else { (s, t) };
            succ[u].push(v);
            in_degree[v] += 1;
        }

        // Longest path over the acyclic ranking graph, in Kahn order.
        let mut ranks: Vec<usize> = vec![0; n];
        let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        while let Some(u) = queue.pop_front() {
            for &v in &succ[u] {
                ranks[v] = ranks[v].max(ranks[u] + 1);
                in_degree[v] -= 1;
                if in_degree[v] == 0 {
                    queue.push_back(v);
                }
            }
        }

        let rank_count = ranks.iter().copied().max().map_or(0, |r| r + 1);

        Self {
            ranks,
            rank_count,
            reversed,
        }
    }
}

/// Iterative DFS in index order; an edge into a node still on the stack is a
/// back-edge. Self-loops are reported as back-edges too.
fn find_back_edges(n: usize, endpoints: &[(usize, usize)]) -> Vec<bool> {
    let mut out: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    for (e, &(s, t)) in endpoints.iter().enumerate() {
        out[s].push((t, e));
    }

    let mut mark = vec![Mark::Unvisited; n];
    let mut reversed = vec![false; endpoints.len()];
    // (node, next out-edge cursor)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if mark[root] != Mark::Unvisited {
            continue;
        }
        mark[root] = Mark::OnStack;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            if cursor < out[node].len() {
                frame.1 += 1;
                let (next, edge) = out[node][cursor];
                match mark[next] {
                    Mark::Unvisited => {
                        mark[next] = Mark::OnStack;
                        stack.push((next, 0));
                    }
                    Mark::OnStack => reversed[edge] = true,
                    Mark::Finished => {}
                }
            } else {
                mark[node] = Mark::Finished;
                stack.pop();
            }
        }
    }

    reversed
}

// ─── Virtual Node Insertion ──────────────────────────────────────────────────

/// Ranked graph of real and virtual items with links between adjacent ranks.
pub struct LayeredGraph {
    /// Number of real nodes; items `>= real_count` are virtual.
    pub real_count: usize,
    pub ranks: Vec<usize>,
    pub rank_count: usize,
    /// Neighbors one rank up (towards rank 0), per item.
    pub up: Vec<Vec<usize>>,
    /// Neighbors one rank down, per item.
    pub down: Vec<Vec<usize>>,
    /// Per edge: virtual items in ranking direction. Empty for short edges and self-loops.
    pub chains: Vec<Vec<usize>>,
}

impl LayeredGraph {
    pub fn build(endpoints: &[(usize, usize)], ra: &RankAssignment) -> Self {
        let real_count = ra.ranks.len();
        let mut ranks = ra.ranks.clone();
        let mut up: Vec<Vec<usize>> = vec![Vec::new(); real_count];
        let mut down: Vec<Vec<usize>> = vec![Vec::new(); real_count];
        let mut chains: Vec<Vec<usize>> = Vec::with_capacity(endpoints.len());

        for (e, &(s, t)) in endpoints.iter().enumerate() {
            let mut chain = Vec::new();
            if s != t {
                let (u, v) = if ra.reversed[e] { (t, s) } else { (s, t) };
                let mut prev = u;
                for r in ranks[u] + 1..ranks[v] {
                    let dummy = ranks.len();
                    ranks.push(r);
                    up.push(Vec::new());
                    down.push(Vec::new());
                    down[prev].push(dummy);
                    up[dummy].push(prev);
                    chain.push(dummy);
                    prev = dummy;
                }
                down[prev].push(v);
                up[v].push(prev);
            }
            chains.push(chain);
        }

        Self {
            real_count,
            ranks,
            rank_count: ra.rank_count,
            up,
            down,
            chains,
        }
    }

    pub fn item_count(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_virtual(&self, item: usize) -> bool {
        item >= self.real_count
    }

    /// Items grouped by rank, real nodes first in index order, then virtual ones.
    pub fn initial_layers(&self) -> Vec<Vec<usize>> {
        let mut layers: Vec<Vec<usize>> = vec![Vec::new(); self.rank_count];
        for (item, &rank) in self.ranks.iter().enumerate() {
            layers[rank].push(item);
        }
        layers
    }
}

// ─── Crossing Minimisation ───────────────────────────────────────────────────

fn positions_of(layers: &[Vec<usize>], item_count: usize) -> Vec<usize> {
    let mut pos = vec![0; item_count];
    for layer in layers {
        for (i, &item) in layer.iter().enumerate() {
            pos[item] = i;
        }
    }
    pos
}

/// Stable re-sort of one layer by neighbor barycenter. Items without
/// neighbors on the reference side keep their current index as key.
/// Returns whether the order changed.
fn reorder_layer(layer: &mut [usize], neighbors: &[Vec<usize>], pos: &mut [usize]) -> bool {
    let mut keyed: Vec<(f64, usize)> = layer
        .iter()
        .enumerate()
        .map(|(i, &item)| {
            let nbs = &neighbors[item];
            let key = if nbs.is_empty() {
                i as f64
            } else {
                nbs.iter().map(|&nb| pos[nb] as f64).sum::<f64>() / nbs.len() as f64
            };
            (key, item)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut changed = false;
    for (i, (_, item)) in keyed.into_iter().enumerate() {
        if layer[i] != item {
            changed = true;
        }
        layer[i] = item;
        pos[item] = i;
    }
    changed
}

/// Number of pairwise edge crossings between adjacent ranks.
pub fn count_crossings(layers: &[Vec<usize>], down: &[Vec<usize>], pos: &[usize]) -> usize {
    let mut total = 0usize;
    for r in 0..layers.len().saturating_sub(1) {
        let mut pairs: Vec<(usize, usize)> = layers[r]
            .iter()
            .flat_map(|&u| down[u].iter().map(move |&v| (pos[u], pos[v])))
            .collect();
        pairs.sort_unstable();

        // Inversions in target positions, counted with a Fenwick tree.
        let width = layers[r + 1].len();
        let mut tree = vec![0usize; width + 1];
        for (inserted, &(_, pv)) in pairs.iter().enumerate() {
            let mut at_or_below = 0;
            let mut i = pv + 1;
            while i > 0 {
                at_or_below += tree[i];
                i &= i - 1;
            }
            total += inserted - at_or_below;
            let mut i = pv + 1;
            while i <= width {
                tree[i] += 1;
                i += i & i.wrapping_neg();
            }
        }
    }
    total
}

/// Barycenter sweeps, down then up, for at most `passes` rounds or until a
/// round changes nothing. Returns the ordering with the fewest crossings.
pub fn minimise_crossings(lg: &LayeredGraph, passes: usize) -> Vec<Vec<usize>> {
    let mut layers = lg.initial_layers();
    let mut pos = positions_of(&layers, lg.item_count());

    let mut best = layers.clone();
    let mut best_crossings = count_crossings(&layers, &lg.down, &pos);

    for pass in 0..passes {
        if best_crossings == 0 {
            break;
        }
        let mut changed = false;
        for r in 1..layers.len() {
            changed |= reorder_layer(&mut layers[r], &lg.up, &mut pos);
        }
        for r in (0..layers.len().saturating_sub(1)).rev() {
            changed |= reorder_layer(&mut layers[r], &lg.down, &mut pos);
        }

        let crossings = count_crossings(&layers, &lg.down, &pos);
        debug!("ordering pass {}: {} crossings", pass + 1, crossings);
        if crossings < best_crossings {
            best = layers.clone();
            best_crossings = crossings;
        }
        if !changed {
            break;
        }
    }

    best
}

// ─── Coordinate Assignment ───────────────────────────────────────────────────

/// Top-left corners per item. Ranks become columns; within a column items
/// stack downwards and each column is centered against the tallest one.
pub fn assign_coordinates(
    layers: &[Vec<usize>],
    lg: &LayeredGraph,
    config: &LayoutConfig,
) -> Vec<Point> {
    let extent = |item: usize| {
        if lg.is_virtual(item) {
            config.edge_sep
        } else {
            config.node_height
        }
    };

    let layer_extents: Vec<f64> = layers
        .iter()
        .map(|layer| {
            let items: f64 = layer.iter().map(|&item| extent(item)).sum();
            items + config.node_sep * layer.len().saturating_sub(1) as f64
        })
        .collect();
    let tallest = layer_extents.iter().copied().fold(0.0, f64::max);

    let mut coords = vec![Point::new(0.0, 0.0); lg.item_count()];
    for (rank, layer) in layers.iter().enumerate() {
        let x = rank as f64 * (config.node_width + config.rank_sep);
        let mut y = (tallest - layer_extents[rank]) / 2.0;
        for &item in layer {
            coords[item] = Point::new(x, y);
            y += extent(item) + config.node_sep;
        }
    }
    coords
}

// ─── Edge Routing ────────────────────────────────────────────────────────────

fn route_points(
    s: usize,
    t: usize,
    reversed: bool,
    chain: &[usize],
    coords: &[Point],
    config: &LayoutConfig,
) -> Vec<Point> {
    let (w, h) = (config.node_width, config.node_height);
    let src = coords[s];
    let tgt = coords[t];

    if s == t {
        let top = src.y - SELF_LOOP_REACH;
        return vec![
            Point::new(src.x + w, src.y + h / 2.0),
            Point::new(src.x + w + SELF_LOOP_REACH, top),
            Point::new(src.x - SELF_LOOP_REACH, top),
            Point::new(src.x, src.y + h / 2.0),
        ];
    }

    let virtual_center = |item: usize| {
        let p = coords[item];
        Point::new(p.x + w / 2.0, p.y + config.edge_sep / 2.0)
    };

    let mut points = Vec::with_capacity(chain.len() + 2);
    if reversed {
        // Source sits right of target: leave from its left side.
        points.push(Point::new(src.x, src.y + h / 2.0));
        points.extend(chain.iter().rev().map(|&item| virtual_center(item)));
        points.push(Point::new(tgt.x + w, tgt.y + h / 2.0));
    } else {
        points.push(Point::new(src.x + w, src.y + h / 2.0));
        points.extend(chain.iter().map(|&item| virtual_center(item)));
        points.push(Point::new(tgt.x, tgt.y + h / 2.0));
    }
    points
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// Sugiyama layered layout engine.
pub struct SugiyamaLayout {
    pub config: LayoutConfig,
}

impl SugiyamaLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Run every phase. Never fails: cycles, self-loops, multi-edges and
    /// isolated nodes all end up with finite coordinates.
    pub fn layout(&self, graph: &Graph) -> LayoutResult {
        let config = &self.config;
        let endpoints: Vec<(usize, usize)> = graph
            .edge_endpoints()
            .map(|(s, t, _)| (s.index(), t.index()))
            .collect();

        let ra = RankAssignment::from_edges(graph.node_count(), &endpoints);
        let lg = LayeredGraph::build(&endpoints, &ra);
        let layers = minimise_crossings(&lg, config.ordering_passes);
        let coords = assign_coordinates(&layers, &lg, config);
        let order = positions_of(&layers, lg.item_count());

        debug!(
            "layout: {} nodes, {} edges, {} ranks, {} reversed, {} virtual",
            graph.node_count(),
            graph.edge_count(),
            ra.rank_count,
            ra.reversed.iter().filter(|&&r| r).count(),
            lg.item_count() - lg.real_count,
        );

        let nodes: Vec<PositionedNode> = graph
            .nodes()
            .enumerate()
            .map(|(i, node)| PositionedNode {
                id: node.id.clone(),
                kind: node.kind.clone(),
                label: node.label.clone(),
                rank: ra.ranks[i],
                order: order[i],
                x: coords[i].x,
                y: coords[i].y,
                width: config.node_width,
                height: config.node_height,
            })
            .collect();

        let edges: Vec<RoutedEdge> = graph
            .edge_endpoints()
            .enumerate()
            .map(|(e, (s, t, edge))| RoutedEdge {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                label: edge.label.clone(),
                points: route_points(
                    s.index(),
                    t.index(),
                    ra.reversed[e],
                    &lg.chains[e],
                    &coords,
                    config,
                ),
            })
            .collect();

        LayoutResult::new(nodes, edges, ra.rank_count)
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_sugiyama.rs"]
mod tests;
