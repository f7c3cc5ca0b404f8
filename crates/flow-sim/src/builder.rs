//! Fluent builder for constructing a [`FlowSim`].

use rustc_hash::FxHashMap;

use flow_cases::CaseEngine;
use flow_core::{SimClock, SimRng};
use flow_graph::{PathRouter, Topology, WeightedWalkRouter};
use flow_particles::ParticlePool;

use crate::{FlowConfig, FlowSim, SimError, SimResult};

/// Child-stream offsets of the root seed.
const PARTICLE_STREAM: u64 = 1;
const CASE_STREAM: u64 = 2;

/// Fluent builder for [`FlowSim<R>`].
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                     |
/// |-----------------|---------------------------------------------|
/// | `.config(c)`    | `FlowConfig::default()`                     |
/// | `.router(r)`    | `WeightedWalkRouter::default()`             |
/// | `.stopped()`    | spawning enabled from the first tick        |
///
/// When the particle config names no start node, the topology's entry node
/// is used.
///
/// # Example
///
/// ```rust,ignore
/// let topology = load_topology_json(&text)?;
/// let mut sim = FlowSimBuilder::new(topology).config(config).build()?;
/// sim.run_ticks(600, Duration::from_micros(16_667), &mut NoopObserver);
/// ```
pub struct FlowSimBuilder<R: PathRouter = WeightedWalkRouter> {
    topology: Topology,
    config:   FlowConfig,
    router:   R,
    running:  bool,
}

impl FlowSimBuilder<WeightedWalkRouter> {
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            config:  FlowConfig::default(),
            router:  WeightedWalkRouter::default(),
            running: true,
        }
    }
}

impl<R: PathRouter> FlowSimBuilder<R> {
    pub fn config(mut self, config: FlowConfig) -> Self {
        self.config = config;
        self
    }

    /// Swap the path router.
    pub fn router<R2: PathRouter>(self, router: R2) -> FlowSimBuilder<R2> {
        FlowSimBuilder {
            topology: self.topology,
            config:   self.config,
            router,
            running:  self.running,
        }
    }

    /// Build with scheduled spawning halted; call `FlowSim::start` later.
    pub fn stopped(mut self) -> Self {
        self.running = false;
        self
    }

    /// Validate inputs, derive the child rng streams, and return a
    /// ready-to-tick [`FlowSim`].
    pub fn build(self) -> SimResult<FlowSim<R>> {
        let mut config = self.config;
        config.particles = config.particles.sanitized();
        config.cases = config.cases.sanitized();

        let start_from_entry = config.particles.start_node.is_none();
        match config.particles.start_node {
            Some(id) if self.topology.node(id).is_none() => {
                return Err(SimError::UnknownStartNode(id));
            }
            Some(_) => {}
            None => config.particles.start_node = self.topology.entry_node().map(|n| n.id),
        }

        let mut root = SimRng::new(config.seed);
        let mut particles =
            ParticlePool::with_router(config.particles.clone(), self.router, root.child(PARTICLE_STREAM));
        let mut cases = CaseEngine::new(config.cases.clone(), root.child(CASE_STREAM));
        if !self.running {
            particles.stop();
            cases.stop();
        }

        Ok(FlowSim {
            config,
            clock: SimClock::new(),
            topology: self.topology,
            particles,
            cases,
            emitter_last: FxHashMap::default(),
            start_from_entry,
        })
    }
}
