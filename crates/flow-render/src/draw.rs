//! Per-frame drawing.

use tracing::trace;

use flow_core::{Point, Rgba};
use flow_graph::{CubicCurve, PathRouter, Topology};
use flow_particles::{Particle, ParticlePool};

use crate::{Canvas, Viewport};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderOptions {
    pub background:        Rgba,
    pub show_trajectories: bool,
    pub show_trails:       bool,
    pub show_particles:    bool,
    /// Line segments per edge curve.  Default: 32.
    pub curve_segments:    usize,
    /// Trail stroke width as a fraction of the particle radius.  Default: 0.8.
    pub trail_width_scale: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            background:        Rgba::rgb(18, 18, 24),
            show_trajectories: true,
            show_trails:       true,
            show_particles:    true,
            curve_segments:    32,
            trail_width_scale: 0.8,
        }
    }
}

/// Counts of what one [`draw`] call emitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub trajectories:   usize,
    pub trail_segments: usize,
    pub heads:          usize,
    /// Particles skipped because their head lies outside the view.
    pub culled:         usize,
}

/// Draw one frame.
///
/// Clears the canvas, resets the transform, applies the viewport, then
/// draws in order:
///
/// 1. trajectories of every edge in two passes: unhighlighted edges with the
///    base style, then highlighted edges on top with the selected style;
/// 2. each particle's trail as a gradient from its color to transparent;
/// 3. each particle's head as a filled circle at its newest trail point.
///
/// Particles whose head is outside the visible area (padded by their
/// radius) are skipped.  Reads only; the topology and pool are untouched.
pub fn draw<C, R>(
    canvas: &mut C,
    topology: &Topology,
    pool: &ParticlePool<R>,
    viewport: &Viewport,
    options: &RenderOptions,
) -> FrameStats
where
    C: Canvas + ?Sized,
    R: PathRouter,
{
    let mut stats = FrameStats::default();
    let viewport = viewport.sanitized();

    canvas.clear(options.background);
    canvas.reset_transform();
    canvas.set_transform(&viewport);

    if options.show_trajectories {
        stats.trajectories = draw_trajectories(canvas, topology, pool, options);
    }

    if options.show_trails || options.show_particles {
        let (width, height) = canvas.size();
        let (min, max) = viewport.visible_world(width, height);
        for p in pool.particles() {
            let Some(head) = p.head() else { continue };
            if !within(head, min, max, p.radius) {
                stats.culled += 1;
                continue;
            }
            if options.show_trails {
                stats.trail_segments += draw_trail(canvas, p, options.trail_width_scale);
            }
            if options.show_particles {
                canvas.fill_circle(head, p.radius, p.color);
                stats.heads += 1;
            }
        }
    }

    trace!(?stats, "frame drawn");
    stats
}

fn draw_trajectories<C, R>(
    canvas: &mut C,
    topology: &Topology,
    pool: &ParticlePool<R>,
    options: &RenderOptions,
) -> usize
where
    C: Canvas + ?Sized,
    R: PathRouter,
{
    let style = &pool.config().trajectory;
    let mut drawn = 0;
    for selected_pass in [false, true] {
        let (color, width) = if selected_pass {
            (style.selected_color, style.selected_width)
        } else {
            (style.color, style.width)
        };
        for edge in topology.edges() {
            if pool.is_highlighted(edge.id) != selected_pass {
                continue;
            }
            let Some((source, target)) = topology.edge_endpoints(edge.id) else { continue };
            let points = CubicCurve::vertical_s(source, target).flatten(options.curve_segments);
            canvas.stroke_polyline(&points, color, width);
            drawn += 1;
        }
    }
    drawn
}

/// Trail points are newest-first; segment `i` fades linearly from the
/// particle's color at the head to fully transparent at the tail.
fn draw_trail<C: Canvas + ?Sized>(canvas: &mut C, p: &Particle, width_scale: f32) -> usize {
    let points: Vec<Point> = p.trail.iter().copied().collect();
    let segments = points.len().saturating_sub(1);
    if segments == 0 {
        return 0;
    }
    let width = p.radius * width_scale;
    for (i, pair) in points.windows(2).enumerate() {
        let alpha = 1.0 - i as f32 / segments as f32;
        canvas.stroke_polyline(pair, p.color.fade(alpha), width);
    }
    segments
}

#[inline]
fn within(p: Point, min: Point, max: Point, pad: f32) -> bool {
    p.x >= min.x - pad && p.x <= max.x + pad && p.y >= min.y - pad && p.y <= max.y + pad
}
