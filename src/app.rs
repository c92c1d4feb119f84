//! Coordinator — the single owner of the current graph, its layout, the
//! viewport, the filter predicate and the loading/error state.
//!
//! Front ends drive it through entry points only. Layout runs once per
//! accepted graph; every other interaction is a view-level recomputation.

use std::panic::{self, AssertUnwindSafe};

use log::{error, info, warn};

use crate::client::GraphBuilder;
use crate::config::AppConfig;
use crate::error::{BuilderError, RenderError, ValidationError, VisualizeError};
use crate::layout::{self, LayoutResult, Point};
use crate::model::{Graph, GraphResult, GraphStats, Node, VisualizeRequest};
use crate::renderers::{Renderer, SvgRenderer};
use crate::selection::SelectionController;
use crate::view::{FilterPredicate, TypeFilter, Viewport, VisibleSet};

/// Everything derived from one successful visualize response.
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    pub graph: Graph,
    pub layout: LayoutResult,
    pub stats: GraphStats,
    pub warnings: Vec<String>,
}

#[derive(Debug)]
pub struct App {
    config: AppConfig,
    loaded: Option<LoadedGraph>,
    viewport: Viewport,
    predicate: FilterPredicate,
    selection: SelectionController,
    loading: bool,
    error: Option<String>,
    layout_generation: u64,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let viewport = Viewport::new(&config.viewport);
        Self {
            config,
            loaded: None,
            viewport,
            predicate: FilterPredicate::default(),
            selection: SelectionController::new(),
            loading: false,
            error: None,
            layout_generation: 0,
        }
    }

    // ── Read access ──────────────────────────────────────────────────────────

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message from the last failed attempt, shown verbatim.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn loaded(&self) -> Option<&LoadedGraph> {
        self.loaded.as_ref()
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.loaded.as_ref().map(|l| &l.graph)
    }

    pub fn layout(&self) -> Option<&LayoutResult> {
        self.loaded.as_ref().map(|l| &l.layout)
    }

    pub fn stats(&self) -> Option<&GraphStats> {
        self.loaded.as_ref().map(|l| &l.stats)
    }

    pub fn warnings(&self) -> &[String] {
        self.loaded
            .as_ref()
            .map(|l| l.warnings.as_slice())
            .unwrap_or_default()
    }

    pub fn predicate(&self) -> &FilterPredicate {
        &self.predicate
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> Option<&Node> {
        self.selection.current()
    }

    /// Incremented each time a graph is laid out.
    pub fn layout_generation(&self) -> u64 {
        self.layout_generation
    }

    // ── Visualize lifecycle ──────────────────────────────────────────────────

    /// Enter the loading state for `request`.
    ///
    /// Rejects a second submission while one is pending. Clears the previous
    /// graph, selection and error so nothing stale stays on screen.
    pub fn begin_visualize(&mut self, request: &VisualizeRequest) -> Result<(), VisualizeError> {
        if self.loading {
            warn!("visualize rejected: request already in progress");
            return Err(VisualizeError::Busy);
        }
        if request.configs.iter().all(|c| c.trim().is_empty()) {
            return Err(VisualizeError::EmptyRequest);
        }
        self.loading = true;
        self.error = None;
        self.loaded = None;
        self.selection.dismiss();
        Ok(())
    }

    /// Apply the collaborator's answer and leave the loading state.
    pub fn finish_visualize(
        &mut self,
        outcome: Result<GraphResult, BuilderError>,
    ) -> Result<(), VisualizeError> {
        self.loading = false;
        match outcome {
            Ok(result) => self.load_graph(result).map_err(VisualizeError::from),
            Err(e) => {
                warn!("visualize failed: {}", e);
                self.error = Some(e.detail());
                self.loaded = None;
                Err(e.into())
            }
        }
    }

    /// Submit `request` to `builder` and apply the result.
    pub async fn visualize<B>(
        &mut self,
        builder: &B,
        request: VisualizeRequest,
    ) -> Result<(), VisualizeError>
    where
        B: GraphBuilder + Sync + ?Sized,
    {
        self.begin_visualize(&request)?;
        let outcome = builder.build(&request).await;
        self.finish_visualize(outcome)
    }

    /// Replace the current graph wholesale: validate, lay out once, reset
    /// viewport, predicate and selection.
    pub fn load_graph(&mut self, result: GraphResult) -> Result<(), ValidationError> {
        self.selection.dismiss();
        let graph = match Graph::normalize(result.nodes, result.edges) {
            Ok(g) => g,
            Err(e) => {
                warn!("graph rejected: {}", e);
                self.error = Some(format!("invalid graph: {}", e));
                self.loaded = None;
                return Err(e);
            }
        };

        let layout = layout::full_layout_with_config(&graph, &self.config.layout);
        self.layout_generation += 1;

        let mut viewport = Viewport::new(&self.config.viewport);
        viewport.resize(self.viewport.width, self.viewport.height);
        if let Some(bounds) = layout.bounds() {
            viewport.fit_to(bounds);
        }
        self.viewport = viewport;
        self.predicate = FilterPredicate::default();
        self.error = None;

        info!(
            "graph loaded: {} nodes, {} edges, {} ranks, {} warnings",
            graph.node_count(),
            graph.edge_count(),
            layout.rank_count,
            result.warnings.len()
        );
        self.loaded = Some(LoadedGraph {
            graph,
            layout,
            stats: result.stats,
            warnings: result.warnings,
        });
        Ok(())
    }

    /// Drop the current graph and selection.
    pub fn clear(&mut self) {
        self.loaded = None;
        self.selection.dismiss();
    }

    // ── Filter / search ──────────────────────────────────────────────────────

    pub fn set_type_filter(&mut self, type_filter: TypeFilter) {
        self.predicate.type_filter = type_filter;
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.predicate.search = term.into();
    }

    pub fn set_predicate(&mut self, predicate: FilterPredicate) {
        self.predicate = predicate;
    }

    /// The current VisibleSet, or `None` without a graph.
    pub fn visible(&self) -> Option<VisibleSet<'_>> {
        self.loaded
            .as_ref()
            .map(|l| VisibleSet::compute(&l.layout, &self.predicate))
    }

    // ── Viewport ─────────────────────────────────────────────────────────────

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.viewport.pan_by(dx, dy);
    }

    pub fn zoom_at(&mut self, factor: f64, anchor: Point) {
        self.viewport.zoom_at(factor, anchor);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.viewport.set_zoom(zoom);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
    }

    /// Fit the whole graph, not just the visible part, into view.
    pub fn fit_view(&mut self) {
        if let Some(bounds) = self.layout().and_then(LayoutResult::bounds) {
            self.viewport.fit_to(bounds);
        }
    }

    // ── Selection ────────────────────────────────────────────────────────────

    pub fn subscribe_selection(&mut self, listener: impl FnMut(Option<&Node>) + 'static) {
        self.selection.subscribe(listener);
    }

    /// Resolve a click on the surface. Empty space clears the selection.
    pub fn pick_at(&mut self, screen: Point) -> Option<&Node> {
        let loaded = self.loaded.as_ref()?;
        let visible = VisibleSet::compute(&loaded.layout, &self.predicate);
        let hit = self
            .viewport
            .hit_test(screen, &visible)
            .map(|n| n.id.clone());
        match hit {
            Some(id) => self.selection.pick(&loaded.graph, &id),
            None => {
                self.selection.dismiss();
                None
            }
        }
    }

    /// Select by id, regardless of the active filter.
    pub fn select_node(&mut self, node_id: &str) -> Option<&Node> {
        let loaded = self.loaded.as_ref()?;
        self.selection.pick(&loaded.graph, node_id)
    }

    pub fn dismiss_selection(&mut self) {
        self.selection.dismiss();
    }

    // ── Rendering ────────────────────────────────────────────────────────────

    pub fn render_svg(&self) -> Result<String, RenderError> {
        self.render_with(&SvgRenderer::new(self.config.render.clone()))
    }

    /// Render through `renderer` inside a failure boundary: a panic is
    /// logged and returned as an error, and the coordinator stays usable.
    pub fn render_with(&self, renderer: &dyn Renderer) -> Result<String, RenderError> {
        let visible = self.visible().ok_or(RenderError::NoGraph)?;
        panic::catch_unwind(AssertUnwindSafe(|| renderer.render(&visible, &self.viewport)))
            .map_err(|payload| {
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!("render failed: {}", msg);
                RenderError::Panicked(msg)
            })
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_app.rs"]
mod tests;
