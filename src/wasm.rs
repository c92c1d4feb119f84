//! WASM bindings for envoy-route-map.
//!
//! Exposes `renderGraph` and `pickNode` to JavaScript via wasm-bindgen.
//! Both take the graph-builder response as JSON text and the same filter
//! arguments, so a pick only ever hits what the render shows.

use wasm_bindgen::prelude::*;

use crate::config::AppConfig;
use crate::layout::Point;
use crate::model::GraphResult;
use crate::view::{FilterPredicate, TypeFilter};

fn parse_graph(graph_json: &str) -> Result<GraphResult, JsError> {
    serde_json::from_str(graph_json).map_err(|e| JsError::new(&e.to_string()))
}

fn parse_predicate(type_filter: &str, search: &str) -> Result<FilterPredicate, JsError> {
    let type_filter: TypeFilter = type_filter
        .parse()
        .map_err(|e: crate::Error| JsError::new(&e.to_string()))?;
    Ok(FilterPredicate::new(type_filter, search))
}

fn sized_config(width: f64, height: f64) -> AppConfig {
    let mut config = AppConfig::default();
    config.viewport.width = width;
    config.viewport.height = height;
    config
}

/// Render the graph to SVG, fitted to `width × height`.
///
/// - `type_filter`: `"all"` or a node type such as `"cluster"`
/// - `search`: case-insensitive substring of label or id; empty matches all
#[wasm_bindgen(js_name = "renderGraph")]
pub fn render_graph(
    graph_json: &str,
    type_filter: &str,
    search: &str,
    width: f64,
    height: f64,
) -> Result<String, JsError> {
    let result = parse_graph(graph_json)?;
    let predicate = parse_predicate(type_filter, search)?;
    crate::render_graph(&result, &predicate, &sized_config(width, height))
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Node under the surface point `(x, y)` as JSON, or an empty string when
/// no visible node is hit. Takes the filter arguments `renderGraph` took.
#[wasm_bindgen(js_name = "pickNode")]
pub fn pick_node(
    graph_json: &str,
    type_filter: &str,
    search: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Result<String, JsError> {
    let result = parse_graph(graph_json)?;
    let predicate = parse_predicate(type_filter, search)?;
    let config = sized_config(width, height);
    match crate::pick_node(&result, &predicate, &config, Point::new(x, y)) {
        Ok(Some(node)) => serde_json::to_string(&node).map_err(|e| JsError::new(&e.to_string())),
        Ok(None) => Ok(String::new()),
        Err(e) => Err(JsError::new(&e.to_string())),
    }
}
