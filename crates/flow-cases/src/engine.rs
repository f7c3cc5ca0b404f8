//! The `CaseEngine`: spawns cases at the entry node and steps each one
//! through the lifecycle once per tick.

use std::time::Duration;

use tracing::{debug, trace};

use flow_core::time::fraction;
use flow_core::{CaseId, SimRng, SimTime};
use flow_graph::{ExitConfig, NodeKind, Topology};

use crate::{Case, CaseConfig, CaseSnapshot, CaseState, MissingNextPolicy, ProceduralOrder};

/// Aggregate counters exposed to overlays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaseStats {
    pub active:    usize,
    /// Cases created since the last reset.
    pub spawned:   u64,
    /// Cases removed after their exit retention.
    pub completed: u64,
    /// Cases removed under [`MissingNextPolicy::Expire`].
    pub expired:   u64,
    /// Live cases currently stuck waiting for a next node.
    pub frozen:    usize,
}

/// What one [`CaseEngine::tick`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaseTick {
    pub spawned:     usize,
    pub transitions: usize,
    pub completed:   usize,
    pub expired:     usize,
}

/// Outcome of stepping one case.
enum Step {
    Stay,
    Moved,
    Complete,
    Expire,
}

/// Owns every live case.
///
/// The topology is passed in on every tick, never stored, so node configs
/// and the procedural order are always read from the latest snapshot.
pub struct CaseEngine {
    config:     CaseConfig,
    rng:        SimRng,
    cases:      Vec<Case>,
    next_id:    CaseId,
    /// Time of the last scheduled spawn; `None` re-anchors on the next tick.
    last_spawn: Option<SimTime>,
    running:    bool,
    spawned:    u64,
    completed:  u64,
    expired:    u64,
}

impl CaseEngine {
    /// Create a running engine whose spawn schedule starts at time zero.
    pub fn new(config: CaseConfig, rng: SimRng) -> Self {
        Self {
            config: config.sanitized(),
            rng,
            cases: Vec::new(),
            next_id: CaseId(0),
            last_spawn: Some(SimTime::ZERO),
            running: true,
            spawned: 0,
            completed: 0,
            expired: 0,
        }
    }

    // ── Per-tick update ───────────────────────────────────────────────────

    /// Advance every case by one tick at time `now`.
    ///
    /// 1. While running, create one case per elapsed entry spawn interval
    ///    (bounded by `max_spawns_per_tick`).
    /// 2. Evaluate each case's transition rule once.
    /// 3. Remove cases whose exit retention elapsed, and stuck cases under
    ///    the expire policy.
    pub fn tick(&mut self, topology: &Topology, now: SimTime) -> CaseTick {
        let mut tick = CaseTick::default();

        if self.running {
            tick.spawned = self.run_schedule(topology, now);
        }

        let order = ProceduralOrder::from_topology(topology);
        let config = &self.config;
        self.cases.retain_mut(|case| match step(case, topology, &order, config, now) {
            Step::Stay => true,
            Step::Moved => {
                tick.transitions += 1;
                true
            }
            Step::Complete => {
                debug!(case = %case.id, node = %case.node, "case completed");
                tick.completed += 1;
                false
            }
            Step::Expire => {
                debug!(case = %case.id, node = %case.node, "case expired; no next node");
                tick.expired += 1;
                false
            }
        });
        self.completed += tick.completed as u64;
        self.expired += tick.expired as u64;

        tick
    }

    fn run_schedule(&mut self, topology: &Topology, now: SimTime) -> usize {
        let Some(entry) = topology.entry_node() else {
            return 0;
        };
        let NodeKind::Entry(entry_cfg) = &entry.kind else {
            return 0;
        };
        let Some(interval) = entry_cfg.spawn_interval() else {
            // Rate 0: keep the anchor current so re-enabling doesn't burst.
            self.last_spawn = Some(now);
            return 0;
        };
        let mut last = *self.last_spawn.get_or_insert(now);

        let mut spawned = 0;
        while now.saturating_since(last) >= interval {
            if spawned >= self.config.max_spawns_per_tick as usize {
                trace!(%now, "spawn backlog dropped");
                last = now;
                break;
            }
            last += interval;
            if self.spawn_case(topology, now).is_some() {
                spawned += 1;
            }
        }
        self.last_spawn = Some(last);
        spawned
    }

    // ── Manual spawns ─────────────────────────────────────────────────────

    /// Create one case at the entry node, independent of the schedule.
    ///
    /// No-op (returns `None`) when the topology has no entry node.
    pub fn spawn_case(&mut self, topology: &Topology, now: SimTime) -> Option<CaseId> {
        let entry = topology.entry_node()?;
        let NodeKind::Entry(cfg) = &entry.kind else {
            return None;
        };
        let hold_ms = self.rng.uniform_u64(cfg.hold_duration_min_ms, cfg.hold_duration_max_ms);

        let id = self.next_id;
        self.next_id = id.next();
        self.cases.push(Case::new(id, entry.id, Duration::from_millis(hold_ms), now));
        self.spawned += 1;
        debug!(case = %id, node = %entry.id, hold_ms, "case spawned");
        Some(id)
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Resume scheduled spawning.  After a [`reset`](Self::reset) the
    /// schedule re-anchors at the next tick.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Halt scheduled spawning; live cases keep moving.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Discard every case and counter and halt spawning.  Idempotent.
    pub fn reset(&mut self) {
        if !self.cases.is_empty() {
            debug!(cleared = self.cases.len(), "case engine reset");
        }
        self.cases.clear();
        self.last_spawn = None;
        self.running = false;
        self.spawned = 0;
        self.completed = 0;
        self.expired = 0;
    }

    // ── Configuration ─────────────────────────────────────────────────────

    pub fn config(&self) -> &CaseConfig {
        &self.config
    }

    /// Replace the configuration; live cases keep their state and timing.
    pub fn set_config(&mut self, config: CaseConfig) {
        self.config = config.sanitized();
    }

    // ── Read access ───────────────────────────────────────────────────────

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn case(&self, id: CaseId) -> Option<&Case> {
        self.cases.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn snapshot(&self) -> Vec<CaseSnapshot> {
        self.cases.iter().map(Case::snapshot).collect()
    }

    pub fn stats(&self) -> CaseStats {
        CaseStats {
            active:    self.cases.len(),
            spawned:   self.spawned,
            completed: self.completed,
            expired:   self.expired,
            frozen:    self.cases.iter().filter(|c| c.frozen).count(),
        }
    }
}

// ── Transition rules ──────────────────────────────────────────────────────────

fn step(
    case: &mut Case,
    topology: &Topology,
    order: &ProceduralOrder,
    config: &CaseConfig,
    now: SimTime,
) -> Step {
    let elapsed = case.elapsed(now);
    match case.state {
        CaseState::AtEntry => {
            if elapsed >= case.hold {
                depart(case, order, config, now)
            } else {
                case.progress = fraction(elapsed, case.hold);
                Step::Stay
            }
        }

        CaseState::Transitioning { to } => {
            let span = config.transition_duration();
            if elapsed < span {
                case.progress = fraction(elapsed, span);
                return Step::Stay;
            }
            match topology.kind_of(to) {
                Some(NodeKind::Exit(_)) => {
                    case.node = to;
                    case.enter(CaseState::AtExit, now);
                    Step::Moved
                }
                Some(NodeKind::Staged(staged)) if staged.stage_count() > 0 => {
                    case.node = to;
                    case.enter(CaseState::AtStage { index: 0 }, now);
                    Step::Moved
                }
                // Pass straight through nodes with no stages.
                Some(_) => {
                    case.node = to;
                    depart(case, order, config, now)
                }
                None => freeze(case, config, "transition target missing"),
            }
        }

        CaseState::AtStage { index } => {
            let (count, span) = match topology.kind_of(case.node) {
                Some(NodeKind::Staged(staged)) => (
                    staged.stage_count(),
                    staged.stage_duration().unwrap_or_else(|| config.stage_duration()),
                ),
                _ => (0, config.stage_duration()),
            };
            if elapsed < span && index < count {
                case.progress = fraction(elapsed, span);
                return Step::Stay;
            }
            if index + 1 < count {
                case.enter(CaseState::AtStage { index: index + 1 }, now);
                Step::Moved
            } else {
                depart(case, order, config, now)
            }
        }

        CaseState::AtExit => {
            let retention = match topology.kind_of(case.node) {
                Some(NodeKind::Exit(exit)) => exit.retention(),
                _ => ExitConfig::default().retention(),
            };
            if elapsed >= retention {
                Step::Complete
            } else {
                case.progress = fraction(elapsed, retention);
                Step::Stay
            }
        }
    }
}

/// Leave the current node toward the next one in the procedural order.
fn depart(case: &mut Case, order: &ProceduralOrder, config: &CaseConfig, now: SimTime) -> Step {
    match order.next_after(case.node) {
        Some(to) => {
            case.enter(CaseState::Transitioning { to }, now);
            Step::Moved
        }
        None => freeze(case, config, "no next node"),
    }
}

/// Apply the missing-next policy.  A frozen case keeps its state and
/// timestamp so the same rule fires again next tick.
fn freeze(case: &mut Case, config: &CaseConfig, reason: &'static str) -> Step {
    match config.missing_next {
        MissingNextPolicy::Expire => Step::Expire,
        MissingNextPolicy::Freeze => {
            if !case.frozen {
                debug!(case = %case.id, node = %case.node, state = %case.state, reason, "case frozen");
                case.frozen = true;
            }
            case.progress = 1.0;
            Step::Stay
        }
    }
}
