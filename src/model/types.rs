//! Wire and domain types: node types, nodes, edges, stats, and the
//! graph-builder request/response shapes.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─── NodeType ────────────────────────────────────────────────────────────────

/// Semantic type of a topology node.
///
/// The known Envoy resource kinds are enumerated; any other non-empty type
/// string survives as `Other` so newer builders do not break rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Listener,
    Filter,
    RouteConfig,
    VirtualHost,
    Route,
    Cluster,
    Endpoint,
    Other(String),
}

impl NodeType {
    /// The known types, in topology order.
    pub const KNOWN: [NodeType; 7] = [
        NodeType::Listener,
        NodeType::Filter,
        NodeType::RouteConfig,
        NodeType::VirtualHost,
        NodeType::Route,
        NodeType::Cluster,
        NodeType::Endpoint,
    ];

    pub fn parse(s: &str) -> Self {
        match s {
            "listener" => NodeType::Listener,
            "filter" => NodeType::Filter,
            "route_config" => NodeType::RouteConfig,
            "virtual_host" => NodeType::VirtualHost,
            "route" => NodeType::Route,
            "cluster" => NodeType::Cluster,
            "endpoint" => NodeType::Endpoint,
            other => NodeType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Listener => "listener",
            NodeType::Filter => "filter",
            NodeType::RouteConfig => "route_config",
            NodeType::VirtualHost => "virtual_host",
            NodeType::Route => "route",
            NodeType::Cluster => "cluster",
            NodeType::Endpoint => "endpoint",
            NodeType::Other(s) => s,
        }
    }

    /// Fill color used by the render surface. Unknown types share one gray.
    pub fn color(&self) -> &'static str {
        match self {
            NodeType::Listener => "#2563eb",
            NodeType::Filter => "#9333ea",
            NodeType::RouteConfig => "#7c3aed",
            NodeType::VirtualHost => "#db2777",
            NodeType::Route => "#ea580c",
            NodeType::Cluster => "#16a34a",
            NodeType::Endpoint => "#0891b2",
            NodeType::Other(_) => "#4b5563",
        }
    }
}

impl From<String> for NodeType {
    fn from(s: String) -> Self {
        NodeType::parse(&s)
    }
}

impl From<NodeType> for String {
    fn from(t: NodeType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Raw records (as returned by the graph builder) ──────────────────────────

/// A node exactly as the collaborator sent it; not yet validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl RawNode {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            label: label.into(),
            data: Map::new(),
        }
    }
}

/// An edge exactly as the collaborator sent it; not yet validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl RawEdge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: None,
        }
    }
}

// ─── Validated records ───────────────────────────────────────────────────────

/// A validated topology node. Read-only once the graph is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeType,
    pub label: String,
    /// Domain attributes, shown verbatim on inspection.
    pub data: Map<String, Value>,
}

/// A validated edge; both endpoints exist in the owning graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

// ─── Collaborator contract ───────────────────────────────────────────────────

/// Per-kind resource counts reported by the graph builder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphStats {
    pub listeners: usize,
    pub route_configs: usize,
    pub virtual_hosts: usize,
    pub routes: usize,
    pub clusters: usize,
    pub endpoints: usize,
}

impl GraphStats {
    /// `(label, count)` pairs in display order.
    pub fn entries(&self) -> [(&'static str, usize); 6] {
        [
            ("Listeners", self.listeners),
            ("Route configs", self.route_configs),
            ("Virtual hosts", self.virtual_hosts),
            ("Routes", self.routes),
            ("Clusters", self.clusters),
            ("Endpoints", self.endpoints),
        ]
    }
}

/// Graph-builder response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphResult {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
    #[serde(default)]
    pub stats: GraphStats,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// How the graph builder should parse the submitted documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    #[default]
    Auto,
    Json,
    Yaml,
}

impl ConfigFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Some(ConfigFormat::Auto),
            "json" => Some(ConfigFormat::Json),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            _ => None,
        }
    }
}

/// Graph-builder request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizeRequest {
    pub configs: Vec<String>,
    #[serde(default)]
    pub format: ConfigFormat,
}

impl VisualizeRequest {
    pub fn new(configs: Vec<String>, format: ConfigFormat) -> Self {
        Self { configs, format }
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_model_types.rs"]
mod tests;
