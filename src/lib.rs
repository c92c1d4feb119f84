//! envoy-route-map — Envoy listener → route → cluster → endpoint topology
//! as a layered, filterable, clickable graph.
//!
//! Pipeline: graph-builder response → `Graph` (validated) → layered layout
//! (once per graph) → `VisibleSet` under the active filter → SVG surface.
//! `App` coordinates the pieces for interactive front ends; `render_graph`
//! runs them once.

pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod renderers;
pub mod selection;
pub mod view;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use app::App;
pub use config::AppConfig;
pub use error::Error;

use crate::layout::{Point, full_layout_with_config};
use crate::model::{Graph, GraphResult, Node};
use crate::renderers::{Renderer, SvgRenderer};
use crate::view::{FilterPredicate, Viewport, VisibleSet};

/// Validate, lay out, filter and render one graph to SVG, fitted to the
/// configured surface.
pub fn render_graph(
    result: &GraphResult,
    predicate: &FilterPredicate,
    config: &AppConfig,
) -> Result<String, Error> {
    let graph = Graph::normalize(result.nodes.clone(), result.edges.clone())?;
    let layout = full_layout_with_config(&graph, &config.layout);
    let mut viewport = Viewport::new(&config.viewport);
    if let Some(bounds) = layout.bounds() {
        viewport.fit_to(bounds);
    }
    let visible = VisibleSet::compute(&layout, predicate);
    Ok(SvgRenderer::new(config.render.clone()).render(&visible, &viewport))
}

/// Resolve a click at `screen` against the same fitted, filtered surface
/// `render_graph` draws. Nodes hidden by `predicate` are never hit.
pub fn pick_node(
    result: &GraphResult,
    predicate: &FilterPredicate,
    config: &AppConfig,
    screen: Point,
) -> Result<Option<Node>, Error> {
    let mut app = App::new(config.clone());
    app.load_graph(result.clone())?;
    app.set_predicate(predicate.clone());
    Ok(app.pick_at(screen).cloned())
}
