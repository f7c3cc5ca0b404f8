//! The `ParticlePool`: owns every live particle.

use std::time::Duration;

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use flow_core::{EdgeId, NodeId, ParticleId, SimRng, SimTime};
use flow_graph::{CubicCurve, PathRouter, Topology, WeightedWalkRouter};

use crate::{Particle, ParticleConfig, ThroughputWindow, Trail};

/// Live statistics exposed to overlays.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParticleStats {
    pub active_count:        usize,
    /// Total particles retired since the last reset.
    pub completed_count:     u64,
    pub throughput_per_sec:  f32,
}

/// What one [`ParticlePool::advance`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParticleTick {
    pub spawned:   usize,
    pub completed: usize,
}

/// Owns live particles, schedules spawns, and advances them along their
/// sampled paths.
///
/// All mutation goes through `advance`, the spawn entry points, and the
/// configuration/lifecycle setters.  The renderer only reads.
///
/// # Type parameter
///
/// `R` samples paths (default [`WeightedWalkRouter`]).
pub struct ParticlePool<R: PathRouter = WeightedWalkRouter> {
    config:      ParticleConfig,
    router:      R,
    rng:         SimRng,
    particles:   Vec<Particle>,
    next_id:     ParticleId,
    last_spawn:  Option<SimTime>,
    running:     bool,
    completed:   u64,
    throughput:  ThroughputWindow,
    highlighted: FxHashSet<EdgeId>,
}

impl ParticlePool<WeightedWalkRouter> {
    /// Create a running pool with the default router.
    pub fn new(config: ParticleConfig, rng: SimRng) -> Self {
        Self::with_router(config, WeightedWalkRouter::default(), rng)
    }
}

impl<R: PathRouter> ParticlePool<R> {
    pub fn with_router(config: ParticleConfig, router: R, rng: SimRng) -> Self {
        let config = config.sanitized();
        Self {
            throughput:  ThroughputWindow::new(config.throughput_window()),
            config,
            router,
            rng,
            particles:   Vec::new(),
            next_id:     ParticleId(0),
            last_spawn:  None,
            running:     true,
            completed:   0,
            highlighted: FxHashSet::default(),
        }
    }

    // ── Per-tick update ───────────────────────────────────────────────────

    /// Advance the pool by one frame.
    ///
    /// 1. Scheduled spawn, if running, the spawn interval has elapsed since
    ///    the last attempt, and the pool is below capacity.
    /// 2. Move every particle along its current edge, recording its position
    ///    into its trail; at progress ≥ 1 step onto the next edge.
    /// 3. Retire particles that ran off the end of their path.
    /// 4. Prune the throughput window.
    ///
    /// Particles whose current edge is missing from `topology` are left
    /// untouched this tick and resume once the edge reappears.
    pub fn advance(&mut self, topology: &Topology, dt: Duration, now: SimTime) -> ParticleTick {
        let mut tick = ParticleTick::default();

        // ── ① Scheduled spawn ─────────────────────────────────────────────
        if self.running {
            if let Some(interval) = self.config.spawn_interval() {
                let due = self
                    .last_spawn
                    .is_none_or(|last| now.saturating_since(last) >= interval);
                if due && self.particles.len() < self.config.max_particles {
                    self.last_spawn = Some(now);
                    if self.spawn(topology).is_some() {
                        tick.spawned += 1;
                    }
                }
            }
        }

        // ── ② Move ────────────────────────────────────────────────────────
        let step = dt.as_secs_f32() * self.config.flow_speed;
        for p in &mut self.particles {
            let Some(edge) = p.current_edge() else { continue };
            let Some((source, target)) = topology.edge_endpoints(edge) else {
                trace!(particle = %p.id, %edge, "edge missing from topology; holding");
                continue;
            };
            p.progress += step * p.speed;
            if p.progress >= 1.0 {
                p.progress = 0.0;
                p.edge_index += 1;
            } else {
                let curve = CubicCurve::vertical_s(source, target);
                p.trail.push(curve.offset_point_at(p.progress, p.lateral_offset));
            }
        }

        // ── ③ Retire ──────────────────────────────────────────────────────
        let before = self.particles.len();
        self.particles.retain(|p| !p.is_finished());
        tick.completed = before - self.particles.len();
        for _ in 0..tick.completed {
            self.throughput.record(now);
        }
        self.completed += tick.completed as u64;

        // ── ④ Throughput window ───────────────────────────────────────────
        self.throughput.prune(now);

        tick
    }

    // ── Manual spawns ─────────────────────────────────────────────────────

    /// Spawn one particle from the configured start node.
    ///
    /// No-op (returns `None`) when no start node is set, the pool is at
    /// capacity, or the router returns an empty path.
    pub fn spawn(&mut self, topology: &Topology) -> Option<ParticleId> {
        let start = self.config.start_node?;
        self.spawn_from(topology, start)
    }

    /// Spawn one particle from an arbitrary node (secondary emitters).
    ///
    /// Same no-op rules as [`spawn`](Self::spawn).
    pub fn spawn_from(&mut self, topology: &Topology, node: NodeId) -> Option<ParticleId> {
        if self.particles.len() >= self.config.max_particles {
            trace!(%node, cap = self.config.max_particles, "at capacity; spawn skipped");
            return None;
        }
        let path = self.router.sample_path(topology, node, &mut self.rng);
        if path.is_empty() {
            debug!(%node, "no outgoing path; spawn skipped");
            return None;
        }

        let cfg = &self.config;
        let rng = &mut self.rng;
        let speed = rng.uniform(cfg.speed_min, cfg.speed_max);
        let radius = rng.uniform(cfg.size_min, cfg.size_max);
        let color = rng.choose(&cfg.colors).copied().unwrap_or_default();
        let lateral_offset = rng.uniform(-cfg.lateral_spread, cfg.lateral_spread);

        let id = self.next_id;
        self.next_id = id.next();
        self.particles.push(Particle {
            id,
            origin: node,
            path,
            edge_index: 0,
            progress: 0.0,
            speed,
            color,
            radius,
            lateral_offset,
            trail: Trail::new(cfg.trail_length),
        });
        Some(id)
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Resume scheduled spawning.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Halt scheduled spawning; live particles keep moving.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Clear every live particle and statistic and halt scheduled spawns.
    /// Idempotent; safe to call between any two ticks.
    pub fn reset(&mut self) {
        if !self.particles.is_empty() {
            debug!(cleared = self.particles.len(), "particle pool reset");
        }
        self.particles.clear();
        self.throughput.clear();
        self.completed = 0;
        self.last_spawn = None;
        self.running = false;
    }

    // ── Configuration ─────────────────────────────────────────────────────

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Replace the configuration without disturbing in-flight particles
    /// beyond shortening their trails to the new bound.
    pub fn set_config(&mut self, config: ParticleConfig) {
        let config = config.sanitized();
        if config.trail_length != self.config.trail_length {
            for p in &mut self.particles {
                p.trail.set_max_len(config.trail_length);
            }
        }
        self.throughput.set_window(config.throughput_window());
        self.config = config;
    }

    pub fn set_start_node(&mut self, node: Option<NodeId>) {
        self.config.start_node = node;
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    // ── Highlighting (cosmetic) ───────────────────────────────────────────

    pub fn set_highlighted_edges<I: IntoIterator<Item = EdgeId>>(&mut self, edges: I) {
        self.highlighted = edges.into_iter().collect();
    }

    pub fn clear_highlight(&mut self) {
        self.highlighted.clear();
    }

    pub fn highlighted_edges(&self) -> &FxHashSet<EdgeId> {
        &self.highlighted
    }

    #[inline]
    pub fn is_highlighted(&self, edge: EdgeId) -> bool {
        self.highlighted.contains(&edge)
    }

    // ── Read access ───────────────────────────────────────────────────────

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn stats(&self) -> ParticleStats {
        ParticleStats {
            active_count:       self.particles.len(),
            completed_count:    self.completed,
            throughput_per_sec: self.throughput.per_second(),
        }
    }

    /// Completion timestamps currently inside the throughput window.
    pub fn window_count(&self) -> usize {
        self.throughput.count()
    }
}
