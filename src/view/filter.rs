//! Filter/search overlay — derives the visible subgraph from a finished
//! layout. Borrowing the layout keeps node coordinates untouched.

use std::collections::HashSet;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};

use crate::error::Error;
use crate::layout::{LayoutResult, PositionedNode, RoutedEdge};
use crate::model::NodeType;

// ─── TypeFilter ──────────────────────────────────────────────────────────────

/// One node type, or every type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(NodeType),
}

impl TypeFilter {
    pub fn matches(&self, kind: &NodeType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(t) => t == kind,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::UnknownTypeFilter(s.to_string()));
        }
        if s.eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        Ok(TypeFilter::Only(NodeType::parse(s)))
    }
}

// ─── Search ──────────────────────────────────────────────────────────────────

/// Case-insensitive literal substring matcher, compiled once per term.
#[derive(Debug, Clone)]
pub enum SearchMatcher {
    Everything,
    Pattern(Regex),
    /// Fallback when the term is too large to compile; holds the lowercased term.
    Lowercase(String),
}

impl SearchMatcher {
    pub fn new(term: &str) -> Self {
        if term.is_empty() {
            return SearchMatcher::Everything;
        }
        match RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => SearchMatcher::Pattern(re),
            Err(_) => SearchMatcher::Lowercase(term.to_lowercase()),
        }
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        match self {
            SearchMatcher::Everything => true,
            SearchMatcher::Pattern(re) => re.is_match(haystack),
            SearchMatcher::Lowercase(term) => haystack.to_lowercase().contains(term.as_str()),
        }
    }
}

// ─── FilterPredicate ─────────────────────────────────────────────────────────

/// The active `{type, search}` filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPredicate {
    pub type_filter: TypeFilter,
    pub search: String,
}

impl FilterPredicate {
    pub fn new(type_filter: TypeFilter, search: impl Into<String>) -> Self {
        Self {
            type_filter,
            search: search.into(),
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.type_filter == TypeFilter::All && self.search.is_empty()
    }
}

// ─── VisibleSet ──────────────────────────────────────────────────────────────

/// Nodes and edges currently eligible for rendering, in layout order.
#[derive(Debug, Clone, Default)]
pub struct VisibleSet<'a> {
    pub nodes: Vec<&'a PositionedNode>,
    pub edges: Vec<&'a RoutedEdge>,
    ids: HashSet<&'a str>,
}

impl<'a> VisibleSet<'a> {
    /// A node is visible iff it passes both the type filter and the search;
    /// an edge is visible iff both of its endpoints are.
    pub fn compute(layout: &'a LayoutResult, predicate: &FilterPredicate) -> Self {
        let matcher = SearchMatcher::new(&predicate.search);
        let nodes: Vec<&PositionedNode> = layout
            .nodes
            .iter()
            .filter(|n| predicate.type_filter.matches(&n.kind))
            .filter(|n| matcher.is_match(&n.label) || matcher.is_match(&n.id))
            .collect();
        let ids: HashSet<&str> = nodes.iter().map(|&n| n.id.as_str()).collect();
        let edges = layout
            .edges
            .iter()
            .filter(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
            .collect();
        Self { nodes, edges, ids }
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edges.iter().any(|e| e.id == id)
    }

    pub fn node_ids(&self) -> Vec<&'a str> {
        self.nodes.iter().map(|&n| n.id.as_str()).collect()
    }

    pub fn edge_ids(&self) -> Vec<&'a str> {
        self.edges.iter().map(|&e| e.id.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_view_filter.rs"]
mod tests;
