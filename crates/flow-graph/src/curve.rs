//! Edge geometry: a cubic Bézier per edge.
//!
//! Every edge is drawn as a vertical S-curve.  With source `S`, target `T`
//! and `mid_y = (S.y + T.y) / 2` the control points are
//!
//! ```text
//! P0 = S    P1 = (S.x, mid_y)    P2 = (T.x, mid_y)    P3 = T
//! ```
//!
//! so edges leave the source and enter the target vertically, which suits
//! top-to-bottom layouts.  Particles, trails, and trajectory strokes all use
//! the same curve, so a particle always sits exactly on its drawn edge.

use flow_core::Point;

/// A cubic Bézier segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CubicCurve {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicCurve {
    pub fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// The vertical S-curve between two node positions.
    pub fn vertical_s(source: Point, target: Point) -> Self {
        let mid_y = (source.y + target.y) * 0.5;
        Self {
            p0: source,
            p1: Point::new(source.x, mid_y),
            p2: Point::new(target.x, mid_y),
            p3: target,
        }
    }

    /// Position at parameter `t` (clamped to `[0, 1]`).  Returns the exact
    /// endpoints at `t = 0` and `t = 1`.
    pub fn point_at(&self, t: f32) -> Point {
        if t.is_nan() || t <= 0.0 {
            return self.p0;
        }
        if t >= 1.0 {
            return self.p3;
        }
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        Point::new(
            a * self.p0.x + b * self.p1.x + c * self.p2.x + d * self.p3.x,
            a * self.p0.y + b * self.p1.y + c * self.p2.y + d * self.p3.y,
        )
    }

    /// First derivative at `t` (clamped to `[0, 1]`).
    pub fn tangent_at(&self, t: f32) -> Point {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mt = 1.0 - t;
        (self.p1 - self.p0) * (3.0 * mt * mt)
            + (self.p2 - self.p1) * (6.0 * mt * t)
            + (self.p3 - self.p2) * (3.0 * t * t)
    }

    /// Unit normal at `t`.
    ///
    /// Where the derivative vanishes (a control point coincides with its
    /// endpoint, e.g. a horizontal edge) the chord direction is used; a
    /// degenerate curve with identical endpoints falls back to `+x`.
    pub fn normal_at(&self, t: f32) -> Point {
        self.tangent_at(t)
            .normalized()
            .or_else(|| (self.p3 - self.p0).normalized())
            .map(Point::perp)
            .unwrap_or(Point::new(1.0, 0.0))
    }

    /// Position at `t` shifted sideways by `offset` pixels along the normal.
    #[inline]
    pub fn offset_point_at(&self, t: f32, offset: f32) -> Point {
        if offset == 0.0 {
            return self.point_at(t);
        }
        self.point_at(t) + self.normal_at(t) * offset
    }

    /// Sample the curve into `segments + 1` points (at least two).
    pub fn flatten(&self, segments: usize) -> Vec<Point> {
        let n = segments.max(1);
        (0..=n).map(|i| self.point_at(i as f32 / n as f32)).collect()
    }
}
