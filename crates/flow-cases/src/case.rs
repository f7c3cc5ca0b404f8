//! Per-case lifecycle state.

use std::fmt;
use std::time::Duration;

use flow_core::{CaseId, NodeId, SimTime};

/// Where a case is in its lifecycle.
///
/// The stage index only exists in `AtStage`, so "stage index is set iff the
/// case is at a stage" holds by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "state", rename_all = "snake_case"))]
pub enum CaseState {
    AtEntry,
    /// Moving from the case's current node to `to`.
    Transitioning { to: NodeId },
    AtStage { index: usize },
    AtExit,
}

impl CaseState {
    /// Stage index while `AtStage`, `None` otherwise.
    #[inline]
    pub fn stage_index(self) -> Option<usize> {
        match self {
            CaseState::AtStage { index } => Some(index),
            _ => None,
        }
    }

    /// Stable lowercase name, used for logs and tabular output.
    pub fn name(self) -> &'static str {
        match self {
            CaseState::AtEntry            => "at_entry",
            CaseState::Transitioning { .. } => "transitioning",
            CaseState::AtStage { .. }     => "at_stage",
            CaseState::AtExit             => "at_exit",
        }
    }
}

impl fmt::Display for CaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseState::Transitioning { to } => write!(f, "transitioning→{to}"),
            CaseState::AtStage { index }    => write!(f, "at_stage[{index}]"),
            other                           => f.write_str(other.name()),
        }
    }
}

/// A simulated unit of work.
#[derive(Clone, Debug)]
pub struct Case {
    pub id:               CaseId,
    pub state:            CaseState,
    /// The node the case is at, or departed from while transitioning.
    pub node:             NodeId,
    pub created_at:       SimTime,
    pub state_entered_at: SimTime,
    /// Entry hold, drawn once at creation.
    pub hold:             Duration,
    /// Display progress through the current state, in `[0, 1]`.
    pub progress:         f32,
    /// Set while the case is stuck waiting for a next node.
    pub frozen:           bool,
}

impl Case {
    pub fn new(id: CaseId, entry: NodeId, hold: Duration, now: SimTime) -> Self {
        Self {
            id,
            state: CaseState::AtEntry,
            node: entry,
            created_at: now,
            state_entered_at: now,
            hold,
            progress: 0.0,
            frozen: false,
        }
    }

    /// Enter `state` at `now`; progress restarts at 0.
    pub(crate) fn enter(&mut self, state: CaseState, now: SimTime) {
        self.state = state;
        self.state_entered_at = now;
        self.progress = 0.0;
        self.frozen = false;
    }

    /// Time spent in the current state.
    #[inline]
    pub fn elapsed(&self, now: SimTime) -> Duration {
        now.saturating_since(self.state_entered_at)
    }

    pub fn snapshot(&self) -> CaseSnapshot {
        CaseSnapshot {
            id:          self.id,
            state:       self.state,
            node:        self.node,
            next_node:   match self.state {
                CaseState::Transitioning { to } => Some(to),
                _ => None,
            },
            stage_index: self.state.stage_index(),
            progress:    self.progress,
            frozen:      self.frozen,
        }
    }
}

/// Read-only per-case view handed to overlays every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaseSnapshot {
    pub id:          CaseId,
    pub state:       CaseState,
    pub node:        NodeId,
    pub next_node:   Option<NodeId>,
    pub stage_index: Option<usize>,
    pub progress:    f32,
    pub frozen:      bool,
}
