//! Pan/zoom mapping between world (layout) and screen pixels.

use flow_core::Point;

/// `screen = world * zoom + pan`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Viewport {
    pub pan_x: f32,
    pub pan_y: f32,
    pub zoom:  f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Viewport {
    pub const MIN_ZOOM: f32 = 0.05;
    pub const MAX_ZOOM: f32 = 20.0;

    pub fn new(pan_x: f32, pan_y: f32, zoom: f32) -> Self {
        Self { pan_x, pan_y, zoom }.sanitized()
    }

    /// Non-finite pan → 0; zoom clamped to `[MIN_ZOOM, MAX_ZOOM]`, with
    /// non-finite or non-positive zoom mapped to `MIN_ZOOM`.
    pub fn sanitized(self) -> Self {
        let finite_or_zero = |v: f32| if v.is_finite() { v } else { 0.0 };
        let zoom = if self.zoom.is_finite() && self.zoom > 0.0 {
            self.zoom.clamp(Self::MIN_ZOOM, Self::MAX_ZOOM)
        } else {
            Self::MIN_ZOOM
        };
        Self { pan_x: finite_or_zero(self.pan_x), pan_y: finite_or_zero(self.pan_y), zoom }
    }

    #[inline]
    pub fn to_screen(&self, world: Point) -> Point {
        Point::new(world.x * self.zoom + self.pan_x, world.y * self.zoom + self.pan_y)
    }

    #[inline]
    pub fn to_world(&self, screen: Point) -> Point {
        Point::new((screen.x - self.pan_x) / self.zoom, (screen.y - self.pan_y) / self.zoom)
    }

    /// Shift the view by a screen-space delta.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan_x += dx;
        self.pan_y += dy;
        *self = self.sanitized();
    }

    /// Scale by `factor` keeping the world point under `anchor` fixed.
    pub fn zoom_at(&mut self, anchor: Point, factor: f32) {
        let world = self.to_world(anchor);
        self.zoom = (self.zoom * factor).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
        if !self.zoom.is_finite() {
            self.zoom = Self::MIN_ZOOM;
        }
        self.pan_x = anchor.x - world.x * self.zoom;
        self.pan_y = anchor.y - world.y * self.zoom;
        *self = self.sanitized();
    }

    /// World-space rectangle `(min, max)` covered by a `width × height`
    /// screen.
    pub fn visible_world(&self, width: u32, height: u32) -> (Point, Point) {
        let min = self.to_world(Point::ZERO);
        let max = self.to_world(Point::new(width as f32, height as f32));
        (min, max)
    }
}
