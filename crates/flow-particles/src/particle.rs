//! A single animated marker and its bounded trail.

use std::collections::VecDeque;

use flow_core::{EdgeId, NodeId, ParticleId, Point, Rgba};

// ── Trail ─────────────────────────────────────────────────────────────────────

/// Bounded history of recent positions, most recent first.
///
/// The length never exceeds `max_len`; pushing onto a full trail drops the
/// oldest point.
#[derive(Clone, Debug, Default)]
pub struct Trail {
    points:  VecDeque<Point>,
    max_len: usize,
}

impl Trail {
    pub fn new(max_len: usize) -> Self {
        Self { points: VecDeque::with_capacity(max_len), max_len }
    }

    /// Prepend `p` and drop points beyond `max_len`.
    pub fn push(&mut self, p: Point) {
        self.points.push_front(p);
        self.points.truncate(self.max_len);
    }

    /// The most recent position.
    #[inline]
    pub fn head(&self) -> Option<Point> {
        self.points.front().copied()
    }

    /// Points from most recent to oldest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Point> + '_ {
        self.points.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Change the bound, truncating immediately if it shrank.
    pub fn set_max_len(&mut self, max_len: usize) {
        self.max_len = max_len;
        self.points.truncate(max_len);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

// ── Particle ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Particle {
    pub id:             ParticleId,
    /// Node the path was sampled from.
    pub origin:         NodeId,
    /// Ordered edges to traverse.  Never empty for a live particle.
    pub path:           Vec<EdgeId>,
    /// Index into `path`.  `< path.len()` while live; equal to `path.len()`
    /// once finished.
    pub edge_index:     usize,
    /// Position along the current edge, in `[0, 1)`.
    pub progress:       f32,
    /// Speed multiplier sampled at spawn.
    pub speed:          f32,
    pub color:          Rgba,
    pub radius:         f32,
    /// Sideways offset from the edge curve, in pixels.
    pub lateral_offset: f32,
    pub trail:          Trail,
}

impl Particle {
    /// The edge the particle is on, or `None` once finished.
    #[inline]
    pub fn current_edge(&self) -> Option<EdgeId> {
        self.path.get(self.edge_index).copied()
    }

    /// `true` once the particle has run off the end of its path.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.edge_index >= self.path.len()
    }

    /// Where the head is drawn: the most recent trail point.
    #[inline]
    pub fn head(&self) -> Option<Point> {
        self.trail.head()
    }
}
