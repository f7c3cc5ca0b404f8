//! The `FlowSim` struct and its tick.

use std::time::Duration;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use flow_cases::{CaseConfig, CaseEngine};
use flow_core::{CaseId, NodeId, ParticleId, SimClock, SimTime};
use flow_graph::{PathRouter, Topology, WeightedWalkRouter};
use flow_particles::{ParticleConfig, ParticlePool};
use flow_render::{Canvas, FrameStats, RenderOptions, Viewport};

use crate::{FlowConfig, FrameSnapshot, SimObserver, TickReport};

/// The flow simulation: one topology snapshot, the particle pool, and the
/// case engine, advanced together by [`tick`](Self::tick).
///
/// Create via [`FlowSimBuilder`][crate::FlowSimBuilder].
pub struct FlowSim<R: PathRouter = WeightedWalkRouter> {
    pub(crate) config:       FlowConfig,
    pub(crate) clock:        SimClock,
    pub(crate) topology:     Topology,
    pub(crate) particles:    ParticlePool<R>,
    pub(crate) cases:        CaseEngine,
    /// Last emission time per secondary emitter node.
    pub(crate) emitter_last: FxHashMap<NodeId, SimTime>,
    /// The particle start node follows the topology's entry node because
    /// none was configured.
    pub(crate) start_from_entry: bool,
}

impl<R: PathRouter> FlowSim<R> {
    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance the simulation by `dt`.
    ///
    /// ```text
    /// ① Clock    : now += dt
    /// ② Emitters : each emitter node due for emission spawns one particle
    /// ③ Particles: scheduled spawn, move, retire, throughput window
    /// ④ Cases    : scheduled spawns, one transition rule per case
    /// ```
    ///
    /// Never fails; every anomaly is absorbed by the subsystem that meets it.
    pub fn tick(&mut self, dt: Duration) -> TickReport {
        self.clock.advance(dt);
        let now = self.clock.now;

        let emitted = self.run_emitters(now);
        let particles = self.particles.advance(&self.topology, dt, now);
        let cases = self.cases.tick(&self.topology, now);

        if particles.spawned + particles.completed + cases.spawned + cases.completed > 0 {
            trace!(%now, ?particles, ?cases, emitted, "tick");
        }

        TickReport {
            frame: self.clock.frame,
            now,
            dt,
            emitted,
            particles,
            cases,
            particle_stats: self.particles.stats(),
            case_stats: self.cases.stats(),
        }
    }

    /// Run `n` ticks of `dt`, calling observer hooks at each boundary.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, dt: Duration, observer: &mut O) {
        let interval = self.config.snapshot_interval_ticks;
        for _ in 0..n {
            observer.on_tick_start(self.clock.frame + 1);
            let report = self.tick(dt);
            observer.on_tick_end(&report);
            if interval > 0 && report.frame.is_multiple_of(interval) {
                observer.on_snapshot(&self.snapshot());
            }
        }
        observer.on_sim_end(self.clock.now);
    }

    fn run_emitters(&mut self, now: SimTime) -> usize {
        if !self.particles.is_running() {
            return 0;
        }
        let Self { topology, particles, emitter_last, .. } = self;
        let topology = &*topology;
        let mut emitted = 0;
        for node in topology.emitters() {
            let Some(interval) = node.emitter.as_ref().and_then(|e| e.interval()) else {
                continue;
            };
            let due = emitter_last
                .get(&node.id)
                .is_none_or(|&last| now.saturating_since(last) >= interval);
            if !due {
                continue;
            }
            emitter_last.insert(node.id, now);
            if particles.spawn_from(topology, node.id).is_some() {
                emitted += 1;
            }
        }
        emitted
    }

    // ── Snapshots and rendering ───────────────────────────────────────────

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            frame:          self.clock.frame,
            now:            self.clock.now,
            cases:          self.cases.snapshot(),
            particle_stats: self.particles.stats(),
            case_stats:     self.cases.stats(),
        }
    }

    /// Draw the current frame.  Call after [`tick`](Self::tick).
    pub fn draw<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        viewport: &Viewport,
        options: &RenderOptions,
    ) -> FrameStats {
        flow_render::draw(canvas, &self.topology, &self.particles, viewport, options)
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Resume scheduled spawning in both subsystems.
    pub fn start(&mut self) {
        self.particles.start();
        self.cases.start();
    }

    /// Halt scheduled spawning; live particles and cases keep moving.
    pub fn stop(&mut self) {
        self.particles.stop();
        self.cases.stop();
    }

    pub fn is_running(&self) -> bool {
        self.particles.is_running() || self.cases.is_running()
    }

    /// Clear every live particle and case and halt spawning.  The clock keeps
    /// running.  Idempotent and safe between any two ticks.
    pub fn reset(&mut self) {
        self.particles.reset();
        self.cases.reset();
        self.emitter_last.clear();
        debug!(now = %self.clock.now, "simulation reset");
    }

    // ── Topology and configuration ────────────────────────────────────────

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Replace the topology snapshot between ticks.  Particles on edges
    /// that disappeared hold still until the edge returns; cases whose next
    /// node vanished follow the missing-next policy.  Without a configured
    /// start node, particles start at the new snapshot's entry node.
    pub fn set_topology(&mut self, topology: Topology) {
        self.emitter_last.retain(|id, _| topology.node(*id).is_some_and(|n| n.emitter.is_some()));
        if self.start_from_entry {
            let start = topology.entry_node().map(|n| n.id);
            self.particles.set_start_node(start);
            self.config.particles.start_node = start;
        }
        debug!(
            nodes = topology.node_count(),
            edges = topology.edge_count(),
            "topology replaced"
        );
        self.topology = topology;
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Replace the particle configuration; in-flight particles are kept.
    /// A config without a start node falls back to the entry node.
    pub fn set_particle_config(&mut self, mut config: ParticleConfig) {
        self.start_from_entry = config.start_node.is_none();
        if self.start_from_entry {
            config.start_node = self.topology.entry_node().map(|n| n.id);
        }
        self.particles.set_config(config);
        self.config.particles = self.particles.config().clone();
    }

    /// Replace the case configuration; in-flight cases are kept.
    pub fn set_case_config(&mut self, config: CaseConfig) {
        self.cases.set_config(config);
        self.config.cases = self.cases.config().clone();
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn now(&self) -> SimTime {
        self.clock.now
    }

    pub fn particles(&self) -> &ParticlePool<R> {
        &self.particles
    }

    /// Mutable pool access for manual spawns and highlighting.
    pub fn particles_mut(&mut self) -> &mut ParticlePool<R> {
        &mut self.particles
    }

    pub fn cases(&self) -> &CaseEngine {
        &self.cases
    }

    pub fn cases_mut(&mut self) -> &mut CaseEngine {
        &mut self.cases
    }

    /// Spawn one particle from the configured start node.
    pub fn spawn_particle(&mut self) -> Option<ParticleId> {
        self.particles.spawn(&self.topology)
    }

    /// Spawn one particle from `node`.
    pub fn spawn_particle_from(&mut self, node: NodeId) -> Option<ParticleId> {
        self.particles.spawn_from(&self.topology, node)
    }

    /// Spawn one case at the entry node now.
    pub fn spawn_case(&mut self) -> Option<CaseId> {
        self.cases.spawn_case(&self.topology, self.clock.now)
    }
}
