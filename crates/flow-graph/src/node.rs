//! Workflow nodes and their typed, per-kind configuration.
//!
//! Each node kind carries exactly the configuration the simulation reads from
//! it.  Values arrive from an external editor and are clamped by the
//! `sanitized()` methods when a topology is built, so the simulation never
//! has to second-guess them.

use std::time::Duration;

use flow_core::{NodeId, Point, duration_from_secs, rate_interval};

// ── Entry ─────────────────────────────────────────────────────────────────────

/// Configuration of the node where cases are created.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EntryConfig {
    /// Cases created per minute.  Default: 6.
    pub spawn_rate_per_minute: f32,
    /// Lower bound of the per-case hold duration at the entry.  Default: 1000.
    pub hold_duration_min_ms: u64,
    /// Upper bound (inclusive) of the hold duration.  Default: 3000.
    pub hold_duration_max_ms: u64,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            spawn_rate_per_minute: 6.0,
            hold_duration_min_ms:  1_000,
            hold_duration_max_ms:  3_000,
        }
    }
}

impl EntryConfig {
    /// Clamp to valid bounds: non-finite or negative rate → 0, inverted hold
    /// range → swapped.
    pub fn sanitized(mut self) -> Self {
        if !self.spawn_rate_per_minute.is_finite() || self.spawn_rate_per_minute < 0.0 {
            self.spawn_rate_per_minute = 0.0;
        }
        if self.hold_duration_min_ms > self.hold_duration_max_ms {
            std::mem::swap(&mut self.hold_duration_min_ms, &mut self.hold_duration_max_ms);
        }
        self
    }

    /// Interval between scheduled case spawns, or `None` when spawning is
    /// disabled (rate 0).  Vanishingly small rates saturate to
    /// `Duration::MAX`.
    pub fn spawn_interval(&self) -> Option<Duration> {
        rate_interval(self.spawn_rate_per_minute as f64 / 60.0)
    }
}

// ── Exit ──────────────────────────────────────────────────────────────────────

/// Configuration of the terminal node.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExitConfig {
    /// How long a finished case stays visible at the exit.  Default: 3 s.
    pub retention_secs: f32,
}

impl Default for ExitConfig {
    fn default() -> Self {
        Self { retention_secs: 3.0 }
    }
}

impl ExitConfig {
    /// Longest accepted retention: one day.
    pub const MAX_RETENTION_SECS: f32 = 86_400.0;

    pub fn sanitized(mut self) -> Self {
        if !self.retention_secs.is_finite() || self.retention_secs < 0.0 {
            self.retention_secs = 0.0;
        }
        self.retention_secs = self.retention_secs.min(Self::MAX_RETENTION_SECS);
        self
    }

    pub fn retention(&self) -> Duration {
        duration_from_secs(self.retention_secs as f64)
    }
}

// ── Staged ────────────────────────────────────────────────────────────────────

/// What kind of work a stage represents.  Cosmetic for the simulation; the
/// overlay uses it to pick an icon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StageKind {
    #[default]
    Task,
    Review,
    Approval,
    Automated,
}

/// One ordered stage inside a staged node.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stage {
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind:  StageKind,
}

impl Stage {
    pub fn new(label: impl Into<String>, kind: StageKind) -> Self {
        Self { label: label.into(), kind }
    }
}

/// Configuration of an intermediate node that executes ordered stages.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StagedConfig {
    pub ordered_stages:    Vec<Stage>,
    /// Per-stage duration override.  `None` uses the case engine's default.
    pub stage_duration_ms: Option<u64>,
}

impl StagedConfig {
    pub fn stage_count(&self) -> usize {
        self.ordered_stages.len()
    }

    pub fn stage_duration(&self) -> Option<Duration> {
        self.stage_duration_ms.map(Duration::from_millis)
    }
}

// ── Emitter ───────────────────────────────────────────────────────────────────

/// Marks a node as a secondary particle source.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EmitterConfig {
    /// Particles emitted per second from this node.  Default: 0.5.
    pub rate_per_sec: f32,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self { rate_per_sec: 0.5 }
    }
}

impl EmitterConfig {
    pub fn sanitized(mut self) -> Self {
        if !self.rate_per_sec.is_finite() || self.rate_per_sec < 0.0 {
            self.rate_per_sec = 0.0;
        }
        self
    }

    pub fn interval(&self) -> Option<Duration> {
        rate_interval(self.rate_per_sec as f64)
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

/// The role a node plays in the workflow, with its typed configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum NodeKind {
    Entry(EntryConfig),
    Exit(ExitConfig),
    Staged(StagedConfig),
    Other,
}

impl NodeKind {
    pub fn is_entry(&self) -> bool {
        matches!(self, NodeKind::Entry(_))
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, NodeKind::Exit(_))
    }

    fn sanitized(self) -> Self {
        match self {
            NodeKind::Entry(c) => NodeKind::Entry(c.sanitized()),
            NodeKind::Exit(c)  => NodeKind::Exit(c.sanitized()),
            other              => other,
        }
    }
}

/// A workflow node as supplied by the topology provider.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id:       NodeId,
    /// Canvas position of the node's connection point, in pixels.
    pub position: Point,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub kind:     NodeKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub emitter:  Option<EmitterConfig>,
}

impl Node {
    pub fn new(id: NodeId, position: Point, kind: NodeKind) -> Self {
        Self { id, position, kind, emitter: None }
    }

    pub fn entry(id: NodeId, position: Point, config: EntryConfig) -> Self {
        Self::new(id, position, NodeKind::Entry(config))
    }

    pub fn exit(id: NodeId, position: Point, config: ExitConfig) -> Self {
        Self::new(id, position, NodeKind::Exit(config))
    }

    pub fn staged(id: NodeId, position: Point, config: StagedConfig) -> Self {
        Self::new(id, position, NodeKind::Staged(config))
    }

    pub fn other(id: NodeId, position: Point) -> Self {
        Self::new(id, position, NodeKind::Other)
    }

    pub fn with_emitter(mut self, emitter: EmitterConfig) -> Self {
        self.emitter = Some(emitter);
        self
    }

    pub fn sanitized(self) -> Self {
        Self {
            kind:    self.kind.sanitized(),
            emitter: self.emitter.map(EmitterConfig::sanitized),
            ..self
        }
    }

    /// Stage list of a staged node; empty for every other kind.
    pub fn stages(&self) -> &[Stage] {
        match &self.kind {
            NodeKind::Staged(c) => &c.ordered_stages,
            _ => &[],
        }
    }
}
