//! Viewport — pan/zoom transform of the render surface plus hit-testing.
//!
//! `screen = world * zoom + offset`.

use crate::config::ViewportConfig;
use crate::layout::{Point, PositionedNode, Rect};

use super::filter::VisibleSet;

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    zoom: f64,
    offset: Point,
    min_zoom: f64,
    max_zoom: f64,
    fit_padding: f64,
}

impl Viewport {
    pub fn new(config: &ViewportConfig) -> Self {
        let lo = config.min_zoom.min(config.max_zoom);
        let hi = config.min_zoom.max(config.max_zoom);
        let min_zoom = if lo.is_finite() && lo > 0.0 { lo } else { 0.1 };
        let max_zoom = if hi.is_finite() && hi >= min_zoom { hi } else { min_zoom.max(4.0) };
        Self {
            width: config.width.max(1.0),
            height: config.height.max(1.0),
            zoom: 1.0_f64.clamp(min_zoom, max_zoom),
            offset: Point::new(0.0, 0.0),
            min_zoom,
            max_zoom,
            fit_padding: config.fit_padding.max(0.0),
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn zoom_bounds(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    fn clamp_zoom(&self, z: f64) -> f64 {
        z.clamp(self.min_zoom, self.max_zoom)
    }

    pub fn world_to_screen(&self, p: Point) -> Point {
        Point::new(
            p.x * self.zoom + self.offset.x,
            p.y * self.zoom + self.offset.y,
        )
    }

    pub fn screen_to_world(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.offset.x) / self.zoom,
            (p.y - self.offset.y) / self.zoom,
        )
    }

    /// Drag by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.offset.x += dx;
            self.offset.y += dy;
        }
    }

    /// Multiply zoom by `factor`, keeping the world point under `anchor` fixed.
    pub fn zoom_at(&mut self, factor: f64, anchor: Point) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let world = self.screen_to_world(anchor);
        self.zoom = self.clamp_zoom(self.zoom * factor);
        self.offset = Point::new(anchor.x - world.x * self.zoom, anchor.y - world.y * self.zoom);
    }

    /// Set an absolute zoom about the surface center.
    pub fn set_zoom(&mut self, zoom: f64) {
        if !zoom.is_finite() || zoom <= 0.0 {
            return;
        }
        let factor = self.clamp_zoom(zoom) / self.zoom;
        self.zoom_at(factor, self.center());
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        if width.is_finite() && height.is_finite() {
            self.width = width.max(1.0);
            self.height = height.max(1.0);
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Zoom and center so `bounds` plus padding fills the surface.
    pub fn fit_to(&mut self, bounds: Rect) {
        let pad = 1.0 + 2.0 * self.fit_padding;
        let w = (bounds.width * pad).max(1.0);
        let h = (bounds.height * pad).max(1.0);
        self.zoom = self.clamp_zoom((self.width / w).min(self.height / h));
        let c = bounds.center();
        self.offset = Point::new(
            self.width / 2.0 - c.x * self.zoom,
            self.height / 2.0 - c.y * self.zoom,
        );
    }

    /// The part of the world currently on screen.
    pub fn visible_world_rect(&self) -> Rect {
        let tl = self.screen_to_world(Point::new(0.0, 0.0));
        Rect::new(tl.x, tl.y, self.width / self.zoom, self.height / self.zoom)
    }

    /// Topmost visible node under a screen point. Later nodes draw on top.
    pub fn hit_test<'a>(
        &self,
        screen: Point,
        visible: &VisibleSet<'a>,
    ) -> Option<&'a PositionedNode> {
        let world = self.screen_to_world(screen);
        visible
            .nodes
            .iter()
            .rev()
            .find(|n| n.rect().contains(world))
            .copied()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&ViewportConfig::default())
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_view_viewport.rs"]
mod tests;
