//! SVG renderer — draws the visible subgraph under the viewport transform.
//!
//! Edges go first so nodes paint over them. Every node group carries a
//! `data-id` attribute so a host page can map DOM clicks back to ids.

use std::fmt::Write as _;

use super::Renderer;
use crate::config::RenderConfig;
use crate::layout::{Point, PositionedNode, RoutedEdge};
use crate::view::{Viewport, VisibleSet};

/// Minimum horizontal handle length for edge curves.
const MIN_CURVE_HANDLE: f64 = 25.0;
/// Approximate glyph width as a fraction of the font size.
const GLYPH_WIDTH: f64 = 0.6;
const LABEL_PADDING: f64 = 8.0;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Trim a label to what fits in `width` at `font_size`, with an ellipsis.
fn fit_label(label: &str, width: f64, font_size: f64) -> String {
    let max_chars = ((width - 2.0 * LABEL_PADDING) / (font_size * GLYPH_WIDTH)).floor();
    let max_chars = if max_chars.is_finite() && max_chars > 1.0 {
        max_chars as usize
    } else {
        1
    };
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let mut out: String = label.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

/// Chain of cubic Béziers through `points`, each segment leaving and
/// entering horizontally.
fn edge_path(points: &[Point]) -> String {
    let mut d = String::new();
    let Some(first) = points.first() else {
        return d;
    };
    let _ = write!(d, "M{:.1},{:.1}", first.x, first.y);
    for pair in points.windows(2) {
        let (s, t) = (pair[0], pair[1]);
        let dx = t.x - s.x;
        let dir = if dx < 0.0 { -1.0 } else { 1.0 };
        let handle = (dx.abs() / 2.0).max(MIN_CURVE_HANDLE) * dir;
        let _ = write!(
            d,
            " C{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
            s.x + handle,
            s.y,
            t.x - handle,
            t.y,
            t.x,
            t.y
        );
    }
    d
}

// ── Renderer ─────────────────────────────────────────────────────────────────

/// Renders a `VisibleSet` to a standalone SVG document.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    pub config: RenderConfig,
}

impl SvgRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    fn render_edge(&self, edge: &RoutedEdge) -> String {
        if edge.points.len() < 2 {
            return String::new();
        }
        let c = &self.config;
        let mut out = format!(
            r#"<path data-id="{}" d="{}" fill="none" stroke="{}" stroke-width="{}" marker-end="url(#arrowhead)"/>"#,
            escape(&edge.id),
            edge_path(&edge.points),
            c.edge_color,
            c.edge_width
        );
        if let Some(label) = edge.label.as_deref().filter(|l| !l.is_empty()) {
            let mid = edge.points[edge.points.len() / 2];
            let _ = write!(
                out,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="{}" fill="{}">{}</text>"#,
                mid.x,
                mid.y - 6.0,
                c.font_size - 2.0,
                c.edge_color,
                escape(label)
            );
        }
        out
    }

    fn render_node(&self, node: &PositionedNode) -> String {
        let c = &self.config;
        let center = node.rect().center();
        let label = fit_label(&node.label, node.width, c.font_size);
        format!(
            concat!(
                r#"<g class="node node-{kind}" data-id="{id}">"#,
                r#"<title>{title}</title>"#,
                r##"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" rx="{r}" fill="{fill}" stroke="#555" stroke-width="1"/>"##,
                r#"<text x="{cx:.1}" y="{cy:.1}" dominant-baseline="central" text-anchor="middle" font-family="sans-serif" font-size="{fs}" fill="{fg}">{label}</text>"#,
                "</g>"
            ),
            kind = escape(node.kind.as_str()),
            id = escape(&node.id),
            title = escape(&node.label),
            x = node.x,
            y = node.y,
            w = node.width,
            h = node.height,
            r = c.corner_radius,
            fill = node.kind.color(),
            cx = center.x,
            cy = center.y,
            fs = c.font_size,
            fg = c.label_color,
            label = escape(&label),
        )
    }
}

impl Renderer for SvgRenderer {
    fn render(&self, visible: &VisibleSet<'_>, viewport: &Viewport) -> String {
        let (w, h) = (viewport.width, viewport.height);
        let offset = viewport.offset();
        let c = &self.config;

        let mut parts = vec![
            format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
            ),
            "<defs>".to_string(),
            format!(
                r#"  <marker id="arrowhead" markerWidth="10" markerHeight="7" refX="10" refY="3.5" orient="auto"><polygon points="0 0, 10 3.5, 0 7" fill="{}"/></marker>"#,
                c.edge_color
            ),
            "</defs>".to_string(),
            format!(r#"<rect width="{w}" height="{h}" fill="{}"/>"#, c.background),
            format!(
                r#"<g transform="translate({:.2},{:.2}) scale({:.4})">"#,
                offset.x,
                offset.y,
                viewport.zoom()
            ),
        ];

        parts.extend(
            visible
                .edges
                .iter()
                .map(|e| self.render_edge(e))
                .filter(|s| !s.is_empty()),
        );
        parts.extend(visible.nodes.iter().map(|n| self.render_node(n)));

        parts.push("</g>".to_string());
        parts.push("</svg>".to_string());
        parts.join("\n")
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_renderers_svg.rs"]
mod tests;
