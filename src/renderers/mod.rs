//! Renderer trait and the SVG render surface.

pub mod svg;

pub use svg::SvgRenderer;

use crate::view::{Viewport, VisibleSet};

/// Trait for render surfaces.
///
/// Implementations draw only what the `VisibleSet` holds, under the given
/// viewport transform.
pub trait Renderer {
    fn render(&self, visible: &VisibleSet<'_>, viewport: &Viewport) -> String;
}
