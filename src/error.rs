//! Error types shared across the crate.
//!
//! Layout never fails (degenerate graphs fall back to a deterministic layout),
//! so there is no layout error here.

use thiserror::Error;

/// Malformed graph input, rejected before layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("node #{index} has an empty id")]
    EmptyNodeId { index: usize },
    #[error("node '{id}' has an empty type")]
    EmptyNodeType { id: String },
    #[error("duplicate node id '{0}'")]
    DuplicateNodeId(String),
    #[error("edge #{index} has an empty id")]
    EmptyEdgeId { index: usize },
    #[error("duplicate edge id '{0}'")]
    DuplicateEdgeId(String),
    #[error("edge '{edge}' references unknown node '{endpoint}'")]
    DanglingEdge { edge: String, endpoint: String },
}

/// Failure reported by the graph-builder collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    /// The service answered with a non-success status.
    #[error("{detail}")]
    Service { status: u16, detail: String },
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),
    /// The response body was not a graph.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl BuilderError {
    /// Human-readable message, shown to the user verbatim.
    pub fn detail(&self) -> String {
        match self {
            BuilderError::Service { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

/// A failure contained by the render boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("no graph loaded")]
    NoGraph,
    #[error("renderer panicked: {0}")]
    Panicked(String),
}

/// Why a visualize attempt did not produce a graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisualizeError {
    #[error("a visualize request is already in progress")]
    Busy,
    #[error("no configuration documents supplied")]
    EmptyRequest,
    #[error(transparent)]
    Builder(#[from] BuilderError),
    #[error("invalid graph: {0}")]
    Validation(#[from] ValidationError),
}

/// Crate-level error for the one-shot entry points.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Visualize(#[from] VisualizeError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("unknown node type filter '{0}'")]
    UnknownTypeFilter(String),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
