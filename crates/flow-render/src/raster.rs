//! `tiny-skia` raster backend.

use std::path::Path;

use tiny_skia::{Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use flow_core::{Point, Rgba};

use crate::{Canvas, RenderError, RenderResult, Viewport};

/// A CPU raster surface.
pub struct PixmapCanvas {
    pixmap:    Pixmap,
    transform: Transform,
}

impl PixmapCanvas {
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(RenderError::PixmapAlloc { width, height })?;
        Ok(Self { pixmap, transform: Transform::identity() })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight-alpha RGBA of one pixel, or `None` out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba::new(c.red(), c.green(), c.blue(), c.alpha()))
    }

    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        self.pixmap.encode_png().map_err(|_| RenderError::PngEncode)
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        std::fs::write(path, self.encode_png()?)?;
        Ok(())
    }
}

fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

impl Canvas for PixmapCanvas {
    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn clear(&mut self, color: Rgba) {
        self.pixmap.fill(Color::from_rgba8(color.r, color.g, color.b, color.a));
    }

    fn reset_transform(&mut self) {
        self.transform = Transform::identity();
    }

    fn set_transform(&mut self, viewport: &Viewport) {
        self.transform =
            Transform::from_row(viewport.zoom, 0.0, 0.0, viewport.zoom, viewport.pan_x, viewport.pan_y);
    }

    fn stroke_polyline(&mut self, points: &[Point], color: Rgba, width: f32) {
        let [first, rest @ ..] = points else { return };
        if rest.is_empty() || color.a == 0 {
            return;
        }
        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        for p in rest {
            pb.line_to(p.x, p.y);
        }
        let Some(path) = pb.finish() else { return };
        let stroke = Stroke {
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(&path, &paint(color), &stroke, self.transform, None);
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba) {
        if color.a == 0 {
            return;
        }
        let Some(path) = PathBuilder::from_circle(center.x, center.y, radius) else { return };
        self.pixmap.fill_path(&path, &paint(color), FillRule::Winding, self.transform, None);
    }
}
