//! `flow-cases`: discrete cases moving through the procedural order.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`config`] | `CaseConfig`, `MissingNextPolicy`                            |
//! | [`case`]   | `Case`, `CaseState`, `CaseSnapshot`                          |
//! | [`order`]  | `ProceduralOrder`: the fixed linear node sequence           |
//! | [`engine`] | `CaseEngine`: spawn scheduling and the per-tick transitions |
//!
//! # Lifecycle
//!
//! ```text
//!            hold elapsed                 transition elapsed
//! AtEntry ─────────────────▶ Transitioning ─────────────────▶ AtExit ──▶ removed
//!                              ▲        │                      (retention elapsed)
//!                              │        │ next node is staged
//!           last stage elapsed │        ▼
//!                              └── AtStage(i) ──▶ AtStage(i + 1)
//!                                       stage elapsed
//! ```
//!
//! Every rule compares the time since the case's last state change against
//! the relevant duration, and each case changes state at most once per
//! tick.  A case that finds no next node freezes in place (default) and
//! retries on every tick, so it resumes as soon as the topology is fixed.

pub mod case;
pub mod config;
pub mod engine;
pub mod order;

#[cfg(test)]
mod tests;

pub use case::{Case, CaseSnapshot, CaseState};
pub use config::{CaseConfig, MissingNextPolicy};
pub use engine::{CaseEngine, CaseStats, CaseTick};
pub use order::ProceduralOrder;
