use super::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::client::StaticGraphSource;
use crate::model::{ConfigFormat, NodeType, RawEdge, RawNode};

fn chain_result() -> GraphResult {
    GraphResult {
        nodes: vec![
            RawNode::new("L1", "listener", "ingress"),
            RawNode::new("RC1", "route_config", "local_route"),
            RawNode::new("VH1", "virtual_host", "backend"),
            RawNode::new("R1", "route", "/"),
            RawNode::new("C1", "cluster", "backend_service"),
            RawNode::new("E1", "endpoint", "10.0.0.1:8080"),
        ],
        edges: vec![
            RawEdge::new("e1", "L1", "RC1"),
            RawEdge::new("e2", "RC1", "VH1"),
            RawEdge::new("e3", "VH1", "R1"),
            RawEdge::new("e4", "R1", "C1"),
            RawEdge::new("e5", "C1", "E1"),
        ],
        stats: GraphStats {
            listeners: 1,
            route_configs: 1,
            virtual_hosts: 1,
            routes: 1,
            clusters: 1,
            endpoints: 1,
        },
        warnings: vec!["cluster backend_service has no health check".to_string()],
    }
}

fn pair_result() -> GraphResult {
    GraphResult {
        nodes: vec![
            RawNode::new("A", "listener", "a"),
            RawNode::new("B", "cluster", "b"),
        ],
        edges: vec![RawEdge::new("ab", "A", "B")],
        ..Default::default()
    }
}

fn request() -> VisualizeRequest {
    VisualizeRequest::new(vec!["static_resources: {}".to_string()], ConfigFormat::Auto)
}

fn loaded_app() -> App {
    let mut app = App::default();
    app.load_graph(chain_result()).unwrap();
    app
}

/// Screen point at the center of node `id` under the current viewport.
fn screen_center(app: &App, id: &str) -> Point {
    let rect = app.layout().unwrap().node(id).unwrap().rect();
    app.viewport().world_to_screen(rect.center())
}

struct PanickingRenderer;

impl Renderer for PanickingRenderer {
    fn render(&self, _visible: &VisibleSet<'_>, _viewport: &Viewport) -> String {
        panic!("surface lost");
    }
}

// ── Visualize lifecycle ──────────────────────────────────────────────────

#[test]
fn test_starts_idle() {
    let app = App::default();
    assert!(!app.is_loading());
    assert!(app.error().is_none());
    assert!(app.graph().is_none());
    assert!(app.visible().is_none());
    assert!(app.warnings().is_empty());
    assert_eq!(app.layout_generation(), 0);
}

#[test]
fn test_second_request_while_loading_is_busy() {
    let mut app = App::default();
    app.begin_visualize(&request()).unwrap();
    assert!(app.is_loading());
    assert_eq!(app.begin_visualize(&request()), Err(VisualizeError::Busy));
    app.finish_visualize(Ok(chain_result())).unwrap();
    assert!(!app.is_loading());
    assert_eq!(app.graph().unwrap().node_count(), 6);
}

#[test]
fn test_empty_request_rejected() {
    let mut app = App::default();
    let req = VisualizeRequest::new(vec!["".to_string(), "  \n".to_string()], ConfigFormat::Auto);
    assert_eq!(app.begin_visualize(&req), Err(VisualizeError::EmptyRequest));
    assert!(!app.is_loading());
    let req = VisualizeRequest::new(vec![], ConfigFormat::Auto);
    assert_eq!(app.begin_visualize(&req), Err(VisualizeError::EmptyRequest));
}

#[test]
fn test_begin_clears_previous_graph() {
    let mut app = loaded_app();
    app.select_node("C1");
    app.begin_visualize(&request()).unwrap();
    assert!(app.graph().is_none());
    assert!(app.selection().is_none());
}

#[test]
fn test_builder_error_shown_verbatim() {
    let mut app = loaded_app();
    app.begin_visualize(&request()).unwrap();
    let err = app
        .finish_visualize(Err(BuilderError::Service {
            status: 400,
            detail: "Failed to parse YAML: mapping values are not allowed here".to_string(),
        }))
        .unwrap_err();
    assert!(matches!(err, VisualizeError::Builder(_)));
    assert_eq!(
        app.error(),
        Some("Failed to parse YAML: mapping values are not allowed here")
    );
    assert!(app.graph().is_none());
    assert!(!app.is_loading());
    assert_eq!(app.render_svg(), Err(RenderError::NoGraph));
}

#[test]
fn test_invalid_graph_rejected() {
    let mut app = App::default();
    let mut bad = pair_result();
    bad.edges.push(RawEdge::new("bx", "B", "X"));
    app.begin_visualize(&request()).unwrap();
    let err = app.finish_visualize(Ok(bad)).unwrap_err();
    assert!(matches!(err, VisualizeError::Validation(ValidationError::DanglingEdge { .. })));
    assert!(app.error().unwrap().starts_with("invalid graph:"));
    assert!(app.graph().is_none());
    assert_eq!(app.layout_generation(), 0);
}

#[test]
fn test_success_clears_error() {
    let mut app = App::default();
    app.begin_visualize(&request()).unwrap();
    let _ = app.finish_visualize(Err(BuilderError::Transport("refused".to_string())));
    assert!(app.error().is_some());
    app.begin_visualize(&request()).unwrap();
    assert!(app.error().is_none());
    app.finish_visualize(Ok(pair_result())).unwrap();
    assert!(app.error().is_none());
}

#[tokio::test]
async fn test_visualize_through_builder() {
    let mut app = App::default();
    let source = StaticGraphSource::new(chain_result());
    app.visualize(&source, request()).await.unwrap();
    assert!(!app.is_loading());
    assert_eq!(app.stats().unwrap().clusters, 1);
    assert_eq!(app.warnings().len(), 1);
    assert_eq!(app.layout().unwrap().rank_count, 6);
}

#[tokio::test]
async fn test_visualize_failure_through_builder() {
    let mut app = loaded_app();
    let source = StaticGraphSource::failing(BuilderError::Service {
        status: 422,
        detail: "field required".to_string(),
    });
    assert!(app.visualize(&source, request()).await.is_err());
    assert_eq!(app.error(), Some("field required"));
    assert!(app.graph().is_none());
}

// ── Graph replacement ────────────────────────────────────────────────────

#[test]
fn test_new_graph_resets_view_state() {
    let mut app = loaded_app();
    app.select_node("C1");
    app.set_type_filter(TypeFilter::Only(NodeType::Cluster));
    app.set_search("backend");
    app.zoom_at(3.0, Point::new(10.0, 10.0));
    app.pan_by(500.0, 500.0);

    app.load_graph(pair_result()).unwrap();
    assert!(app.selection().is_none());
    assert!(app.predicate().is_unfiltered());

    let mut fitted = Viewport::new(&app.config().viewport);
    fitted.fit_to(app.layout().unwrap().bounds().unwrap());
    assert_eq!(app.viewport(), &fitted);
    assert_eq!(app.layout_generation(), 2);
}

#[test]
fn test_new_graph_keeps_surface_size() {
    let mut app = loaded_app();
    app.resize(640.0, 480.0);
    app.load_graph(pair_result()).unwrap();
    assert_eq!((app.viewport().width, app.viewport().height), (640.0, 480.0));
}

#[test]
fn test_clear() {
    let mut app = loaded_app();
    app.select_node("L1");
    app.clear();
    assert!(app.graph().is_none());
    assert!(app.selection().is_none());
}

// ── Filter / viewport are view-level only ────────────────────────────────

#[test]
fn test_filter_and_viewport_do_not_relayout() {
    let mut app = loaded_app();
    let before = app.layout().unwrap().positions();
    app.set_type_filter(TypeFilter::Only(NodeType::Cluster));
    app.set_search("back");
    app.pan_by(10.0, 0.0);
    app.zoom_at(1.5, Point::new(0.0, 0.0));
    app.set_zoom(0.5);
    app.resize(300.0, 300.0);
    app.fit_view();
    assert_eq!(app.layout_generation(), 1);
    assert_eq!(app.layout().unwrap().positions(), before);
}

#[test]
fn test_visible_follows_predicate() {
    let mut app = loaded_app();
    app.set_type_filter(TypeFilter::Only(NodeType::Cluster));
    let visible = app.visible().unwrap();
    assert_eq!(visible.node_ids(), vec!["C1"]);
    assert!(visible.edges.is_empty());
}

#[test]
fn test_set_predicate() {
    let mut app = loaded_app();
    app.set_predicate(FilterPredicate::new(TypeFilter::All, "10.0.0"));
    assert_eq!(app.visible().unwrap().node_ids(), vec!["E1"]);
}

#[test]
fn test_fit_view_restores_fit() {
    let mut app = loaded_app();
    let fitted = app.viewport().clone();
    app.pan_by(-400.0, 90.0);
    app.set_zoom(3.0);
    app.fit_view();
    assert_eq!(app.viewport(), &fitted);
}

// ── Selection ────────────────────────────────────────────────────────────

#[test]
fn test_pick_at_node() {
    let mut app = loaded_app();
    let at = screen_center(&app, "VH1");
    assert_eq!(app.pick_at(at).map(|n| n.id.clone()), Some("VH1".to_string()));
    assert_eq!(app.selection().unwrap().id, "VH1");
}

#[test]
fn test_pick_empty_space_clears() {
    let mut app = loaded_app();
    app.select_node("L1");
    assert!(app.pick_at(Point::new(-5000.0, -5000.0)).is_none());
    assert!(app.selection().is_none());
}

#[test]
fn test_pick_ignores_filtered_nodes() {
    let mut app = loaded_app();
    let at = screen_center(&app, "L1");
    app.set_type_filter(TypeFilter::Only(NodeType::Cluster));
    assert!(app.pick_at(at).is_none());
}

#[test]
fn test_pick_without_graph() {
    let mut app = App::default();
    assert!(app.pick_at(Point::new(0.0, 0.0)).is_none());
    assert!(app.select_node("L1").is_none());
}

#[test]
fn test_select_node_ignores_filter() {
    let mut app = loaded_app();
    app.set_type_filter(TypeFilter::Only(NodeType::Cluster));
    assert_eq!(app.select_node("E1").unwrap().kind, NodeType::Endpoint);
}

#[test]
fn test_select_unknown_keeps_current() {
    let mut app = loaded_app();
    app.select_node("C1");
    assert!(app.select_node("missing").is_none());
    assert_eq!(app.selection().unwrap().id, "C1");
}

#[test]
fn test_selection_listener() {
    let mut app = loaded_app();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    app.subscribe_selection(move |n| sink.borrow_mut().push(n.map(|n| n.id.clone())));
    app.select_node("R1");
    app.dismiss_selection();
    assert_eq!(*seen.borrow(), vec![Some("R1".to_string()), None]);
}

// ── Rendering ────────────────────────────────────────────────────────────

#[test]
fn test_render_svg() {
    let app = loaded_app();
    let svg = app.render_svg().unwrap();
    assert!(svg.starts_with("<svg"));
    for id in ["L1", "RC1", "VH1", "R1", "C1", "E1"] {
        assert!(svg.contains(&format!(r#"data-id="{}""#, id)));
    }
}

#[test]
fn test_render_panic_contained() {
    let app = loaded_app();
    let err = app.render_with(&PanickingRenderer).unwrap_err();
    assert_eq!(err, RenderError::Panicked("surface lost".to_string()));
    assert!(app.render_svg().is_ok());
    assert!(app.graph().is_some());
}

#[test]
fn test_render_without_graph() {
    assert_eq!(App::default().render_svg(), Err(RenderError::NoGraph));
}
