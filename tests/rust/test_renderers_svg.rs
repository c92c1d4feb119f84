use super::*;
use crate::layout::{LayoutResult, full_layout};
use crate::model::{Graph, NodeType, RawEdge, RawNode};
use crate::view::{FilterPredicate, TypeFilter};

fn small_layout() -> LayoutResult {
    let mut edge = RawEdge::new("e1", "L1", "C1");
    edge.label = Some("prefix /".to_string());
    let graph = Graph::normalize(
        vec![
            RawNode::new("L1", "listener", "ingress <http>"),
            RawNode::new("C1", "cluster", "backend"),
        ],
        vec![edge],
    )
    .unwrap();
    full_layout(&graph)
}

fn render(layout: &LayoutResult, predicate: &FilterPredicate) -> String {
    let visible = VisibleSet::compute(layout, predicate);
    SvgRenderer::default().render(&visible, &Viewport::default())
}

#[test]
fn test_escape() {
    assert_eq!(escape(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
}

#[test]
fn test_fit_label_short_unchanged() {
    assert_eq!(fit_label("backend", 180.0, 12.0), "backend");
}

#[test]
fn test_fit_label_truncates() {
    let long = "outbound|8080||very-long-service-name.default.svc.cluster.local";
    let fitted = fit_label(long, 180.0, 12.0);
    assert!(fitted.ends_with('…'));
    // (180 - 16) / 7.2 = 22 chars
    assert_eq!(fitted.chars().count(), 22);
}

#[test]
fn test_edge_path_shape() {
    let d = edge_path(&[Point::new(0.0, 0.0), Point::new(100.0, 50.0)]);
    assert_eq!(d, "M0.0,0.0 C50.0,0.0 50.0,50.0 100.0,50.0");
    assert_eq!(edge_path(&[]), "");
}

#[test]
fn test_edge_path_backwards_handles() {
    let d = edge_path(&[Point::new(100.0, 0.0), Point::new(90.0, 0.0)]);
    assert_eq!(d, "M100.0,0.0 C75.0,0.0 115.0,0.0 90.0,0.0");
}

#[test]
fn test_render_document_frame() {
    let svg = render(&small_layout(), &FilterPredicate::default());
    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert!(svg.contains(r#"id="arrowhead""#));
    assert!(svg.contains(r##"fill="#030712""##));
    assert!(svg.contains("translate(0.00,0.00) scale(1.0000)"));
}

#[test]
fn test_render_nodes_and_edges() {
    let svg = render(&small_layout(), &FilterPredicate::default());
    assert!(svg.contains(r#"data-id="L1""#));
    assert!(svg.contains(r#"data-id="C1""#));
    assert!(svg.contains(r#"data-id="e1""#));
    assert!(svg.contains(r#"marker-end="url(#arrowhead)""#));
    assert!(svg.contains(NodeType::Listener.color()));
    assert!(svg.contains(NodeType::Cluster.color()));
    assert!(svg.contains("prefix /"));
}

#[test]
fn test_render_escapes_labels() {
    let svg = render(&small_layout(), &FilterPredicate::default());
    assert!(svg.contains("ingress &lt;http&gt;"));
    assert!(!svg.contains("<http>"));
}

#[test]
fn test_edges_drawn_before_nodes() {
    let svg = render(&small_layout(), &FilterPredicate::default());
    let edge_at = svg.find(r#"data-id="e1""#).unwrap();
    let node_at = svg.find(r#"data-id="L1""#).unwrap();
    assert!(edge_at < node_at);
}

#[test]
fn test_render_only_visible() {
    let pred = FilterPredicate::new(TypeFilter::Only(NodeType::Cluster), "");
    let svg = render(&small_layout(), &pred);
    assert!(svg.contains(r#"data-id="C1""#));
    assert!(!svg.contains(r#"data-id="L1""#));
    assert!(!svg.contains(r#"data-id="e1""#));
}

#[test]
fn test_render_empty_visible_set() {
    let pred = FilterPredicate::new(TypeFilter::All, "no-such-node");
    let svg = render(&small_layout(), &pred);
    assert!(svg.contains("<svg"));
    assert!(!svg.contains("data-id"));
}

#[test]
fn test_render_uses_viewport_transform() {
    let layout = small_layout();
    let visible = VisibleSet::compute(&layout, &FilterPredicate::default());
    let mut vp = Viewport::default();
    vp.pan_by(12.5, -4.0);
    vp.zoom_at(2.0, Point::new(0.0, 0.0));
    let svg = SvgRenderer::default().render(&visible, &vp);
    assert!(svg.contains("translate(25.00,-8.00) scale(2.0000)"));
}

#[test]
fn test_unknown_type_gray() {
    let graph = Graph::normalize(vec![RawNode::new("S1", "secret", "tls")], vec![]).unwrap();
    let svg = render(&full_layout(&graph), &FilterPredicate::default());
    assert!(svg.contains(r#"class="node node-secret""#));
    assert!(svg.contains("#4b5563"));
}
