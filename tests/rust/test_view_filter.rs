use super::*;
use crate::layout::full_layout;
use crate::model::{Graph, RawEdge, RawNode};

fn envoy_layout() -> LayoutResult {
    let nodes = vec![
        RawNode::new("L1", "listener", "ingress_http"),
        RawNode::new("RC1", "route_config", "local_route"),
        RawNode::new("VH1", "virtual_host", "backend_vh"),
        RawNode::new("R1", "route", "/api"),
        RawNode::new("C1", "cluster", "Backend_Service"),
        RawNode::new("E1", "endpoint", "10.0.0.1:8080"),
    ];
    let edges = vec![
        RawEdge::new("e1", "L1", "RC1"),
        RawEdge::new("e2", "RC1", "VH1"),
        RawEdge::new("e3", "VH1", "R1"),
        RawEdge::new("e4", "R1", "C1"),
        RawEdge::new("e5", "C1", "E1"),
    ];
    full_layout(&Graph::normalize(nodes, edges).unwrap())
}

fn only(kind: NodeType) -> FilterPredicate {
    FilterPredicate::new(TypeFilter::Only(kind), "")
}

// ── TypeFilter ───────────────────────────────────────────────────────────

#[test]
fn test_type_filter_parse() {
    assert_eq!("all".parse::<TypeFilter>().unwrap(), TypeFilter::All);
    assert_eq!("ALL".parse::<TypeFilter>().unwrap(), TypeFilter::All);
    assert_eq!(
        " cluster ".parse::<TypeFilter>().unwrap(),
        TypeFilter::Only(NodeType::Cluster)
    );
    assert_eq!(
        "secret".parse::<TypeFilter>().unwrap(),
        TypeFilter::Only(NodeType::Other("secret".to_string()))
    );
}

#[test]
fn test_type_filter_parse_empty() {
    assert!(matches!(
        "  ".parse::<TypeFilter>(),
        Err(Error::UnknownTypeFilter(_))
    ));
}

#[test]
fn test_type_filter_matches() {
    assert!(TypeFilter::All.matches(&NodeType::Route));
    assert!(TypeFilter::Only(NodeType::Route).matches(&NodeType::Route));
    assert!(!TypeFilter::Only(NodeType::Route).matches(&NodeType::Cluster));
}

// ── SearchMatcher ────────────────────────────────────────────────────────

#[test]
fn test_search_empty_matches_everything() {
    let m = SearchMatcher::new("");
    assert!(m.is_match(""));
    assert!(m.is_match("anything"));
}

#[test]
fn test_search_case_insensitive() {
    let m = SearchMatcher::new("BACKEND");
    assert!(m.is_match("backend_service"));
    assert!(m.is_match("my-Backend"));
    assert!(!m.is_match("frontend"));
}

#[test]
fn test_search_metacharacters_literal() {
    let m = SearchMatcher::new("10.0.0.1:*");
    assert!(!m.is_match("10x0x0x1:8080"));
    let m = SearchMatcher::new("0.0.1");
    assert!(m.is_match("10.0.0.1:8080"));
    assert!(!m.is_match("10a0b0c1"));
    let m = SearchMatcher::new("(api");
    assert!(m.is_match("/(api)/v1"));
}

// ── VisibleSet ───────────────────────────────────────────────────────────

#[test]
fn test_unfiltered_shows_everything() {
    let lr = envoy_layout();
    let pred = FilterPredicate::default();
    assert!(pred.is_unfiltered());
    let vs = VisibleSet::compute(&lr, &pred);
    assert_eq!(vs.nodes.len(), 6);
    assert_eq!(vs.edges.len(), 5);
    assert_eq!(vs.node_ids(), vec!["L1", "RC1", "VH1", "R1", "C1", "E1"]);
}

#[test]
fn test_cluster_filter_hides_edges() {
    let lr = envoy_layout();
    let vs = VisibleSet::compute(&lr, &only(NodeType::Cluster));
    assert_eq!(vs.node_ids(), vec!["C1"]);
    assert!(vs.edges.is_empty());
    assert!(vs.contains_node("C1"));
    assert!(!vs.contains_node("E1"));
}

#[test]
fn test_search_matches_label_or_id() {
    let lr = envoy_layout();
    let by_label = VisibleSet::compute(&lr, &FilterPredicate::new(TypeFilter::All, "backend"));
    assert_eq!(by_label.node_ids(), vec!["VH1", "C1"]);

    let by_id = VisibleSet::compute(&lr, &FilterPredicate::new(TypeFilter::All, "rc1"));
    assert_eq!(by_id.node_ids(), vec!["RC1"]);
}

#[test]
fn test_type_and_search_combined() {
    let lr = envoy_layout();
    let pred = FilterPredicate::new(TypeFilter::Only(NodeType::Cluster), "backend");
    assert_eq!(VisibleSet::compute(&lr, &pred).node_ids(), vec!["C1"]);
    let pred = FilterPredicate::new(TypeFilter::Only(NodeType::Listener), "backend");
    assert!(VisibleSet::compute(&lr, &pred).is_empty());
}

#[test]
fn test_edge_visible_iff_both_endpoints() {
    let lr = envoy_layout();
    for pred in [
        FilterPredicate::default(),
        only(NodeType::Route),
        FilterPredicate::new(TypeFilter::All, "c"),
        FilterPredicate::new(TypeFilter::All, "1"),
        FilterPredicate::new(TypeFilter::All, "nothing-matches"),
    ] {
        let vs = VisibleSet::compute(&lr, &pred);
        for e in &lr.edges {
            let both = vs.contains_node(&e.source) && vs.contains_node(&e.target);
            assert_eq!(vs.contains_edge(&e.id), both, "edge {} under {:?}", e.id, pred);
        }
    }
}

#[test]
fn test_visible_is_subset() {
    let lr = envoy_layout();
    let all = VisibleSet::compute(&lr, &FilterPredicate::default());
    let some = VisibleSet::compute(&lr, &FilterPredicate::new(TypeFilter::All, "_"));
    assert!(some.nodes.len() <= all.nodes.len());
    for id in some.node_ids() {
        assert!(all.contains_node(id));
    }
    for id in some.edge_ids() {
        assert!(all.contains_edge(id));
    }
}

#[test]
fn test_filter_keeps_coordinates() {
    let lr = envoy_layout();
    let before = lr.node("C1").unwrap().position();
    let vs = VisibleSet::compute(&lr, &only(NodeType::Cluster));
    assert_eq!(vs.nodes[0].position(), before);
}

#[test]
fn test_search_stable_across_calls() {
    let lr = envoy_layout();
    let pred = FilterPredicate::new(TypeFilter::All, "route");
    let first = VisibleSet::compute(&lr, &pred).node_ids();
    let second = VisibleSet::compute(&lr, &pred).node_ids();
    assert_eq!(first, second);
}
