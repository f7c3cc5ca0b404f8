//! The drawing surface abstraction.

use flow_core::{Point, Rgba};

use crate::Viewport;

/// Minimal immediate-mode surface the renderer draws onto.
///
/// Geometry is given in world coordinates; the canvas applies whatever
/// transform was last set.
pub trait Canvas {
    /// Surface size in screen pixels.
    fn size(&self) -> (u32, u32);

    fn clear(&mut self, color: Rgba);

    fn reset_transform(&mut self);

    fn set_transform(&mut self, viewport: &Viewport);

    /// Stroke a connected polyline.  Fewer than two points draws nothing.
    fn stroke_polyline(&mut self, points: &[Point], color: Rgba, width: f32);

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Rgba),
    ResetTransform,
    SetTransform(Viewport),
    Polyline { points: Vec<Point>, color: Rgba, width: f32 },
    Circle { center: Point, radius: f32, color: Rgba },
}

/// A canvas that records every call.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    pub width:    u32,
    pub height:   u32,
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, commands: Vec::new() }
    }

    pub fn polylines(&self) -> impl Iterator<Item = (&[Point], Rgba, f32)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Polyline { points, color, width } => Some((points.as_slice(), *color, *width)),
            _ => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = (Point, f32, Rgba)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Circle { center, radius, color } => Some((*center, *radius, *color)),
            _ => None,
        })
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Rgba) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn reset_transform(&mut self) {
        self.commands.push(DrawCommand::ResetTransform);
    }

    fn set_transform(&mut self, viewport: &Viewport) {
        self.commands.push(DrawCommand::SetTransform(*viewport));
    }

    fn stroke_polyline(&mut self, points: &[Point], color: Rgba, width: f32) {
        if points.len() < 2 {
            return;
        }
        self.commands.push(DrawCommand::Polyline { points: points.to_vec(), color, width });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }
}
