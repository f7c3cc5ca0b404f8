//! Unit tests for flow-cases.

use std::time::Duration;

use flow_core::{EdgeId, NodeId, Point, SimRng, SimTime};
use flow_graph::{
    EntryConfig, ExitConfig, Node, Stage, StageKind, StagedConfig, Topology, TopologyBuilder,
};

use crate::{CaseConfig, CaseEngine, CaseState, MissingNextPolicy};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn entry(rate_per_minute: f32, hold_ms: u64) -> EntryConfig {
    EntryConfig {
        spawn_rate_per_minute: rate_per_minute,
        hold_duration_min_ms:  hold_ms,
        hold_duration_max_ms:  hold_ms,
    }
}

fn staged(stages: usize, stage_ms: u64) -> StagedConfig {
    StagedConfig {
        ordered_stages:    (0..stages).map(|i| Stage::new(format!("s{i}"), StageKind::Task)).collect(),
        stage_duration_ms: Some(stage_ms),
    }
}

/// entry(0) → staged(1, three 500 ms stages) → exit(2, 1 s retention).
fn workflow(rate_per_minute: f32) -> Topology {
    let mut b = TopologyBuilder::new();
    b.add_node(Node::entry(NodeId(0), Point::new(100.0, 0.0), entry(rate_per_minute, 500)));
    b.add_node(Node::staged(NodeId(1), Point::new(100.0, 100.0), staged(3, 500)));
    b.add_node(Node::exit(NodeId(2), Point::new(100.0, 200.0), ExitConfig { retention_secs: 1.0 }));
    b.add_edge(EdgeId(0), NodeId(0), NodeId(1), None);
    b.add_edge(EdgeId(1), NodeId(1), NodeId(2), None);
    b.build()
}

/// entry(0) → staged(1, one stage) with nothing after it.
fn dead_end() -> Topology {
    let mut b = TopologyBuilder::new();
    b.add_node(Node::entry(NodeId(0), Point::new(0.0, 0.0), entry(0.0, 100)));
    b.add_node(Node::staged(NodeId(1), Point::new(0.0, 100.0), staged(1, 100)));
    b.add_edge(EdgeId(0), NodeId(0), NodeId(1), None);
    b.build()
}

fn config() -> CaseConfig {
    CaseConfig { transition_duration_ms: 200, ..CaseConfig::default() }
}

fn engine(config: CaseConfig) -> CaseEngine {
    CaseEngine::new(config, SimRng::new(7))
}

fn ms(v: u64) -> SimTime {
    SimTime::from_millis(v)
}

/// Tick every `step_ms` from `from_ms + step_ms` through `to_ms` inclusive.
fn run(engine: &mut CaseEngine, topo: &Topology, from_ms: u64, to_ms: u64, step_ms: u64) {
    let mut t = from_ms + step_ms;
    while t <= to_ms {
        engine.tick(topo, ms(t));
        t += step_ms;
    }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod spawning {
    use super::*;

    #[test]
    fn sixty_per_minute_for_five_seconds_spawns_five() {
        let topo = workflow(60.0);
        let mut e = engine(config());
        let mut spawned = 0;
        for s in 1..=5 {
            spawned += e.tick(&topo, SimTime::from_secs(s)).spawned;
        }
        assert_eq!(spawned, 5);
        assert_eq!(e.stats().spawned, 5);
    }

    #[test]
    fn new_cases_start_at_entry() {
        let topo = workflow(0.0);
        let mut e = engine(config());
        let id = e.spawn_case(&topo, ms(0)).expect("spawned");
        let case = e.case(id).expect("live");
        assert_eq!(case.state, CaseState::AtEntry);
        assert_eq!(case.node, NodeId(0));
        assert_eq!(case.progress, 0.0);
        assert_eq!(case.hold, Duration::from_millis(500));
    }

    #[test]
    fn zero_rate_never_spawns() {
        let topo = workflow(0.0);
        let mut e = engine(config());
        run(&mut e, &topo, 0, 10_000, 100);
        assert!(e.is_empty());
    }

    #[test]
    fn vanishing_rate_never_spawns() {
        let topo = workflow(1e-30);
        let mut e = engine(config());
        run(&mut e, &topo, 0, 10_000, 100);
        e.tick(&topo, SimTime(u64::MAX));
        assert!(e.is_empty());
    }

    #[test]
    fn no_entry_node_is_noop() {
        let topo = Topology::empty();
        let mut e = engine(config());
        assert!(e.spawn_case(&topo, ms(0)).is_none());
        e.tick(&topo, ms(5_000));
        assert!(e.is_empty());
    }

    #[test]
    fn hold_drawn_within_range() {
        let mut b = TopologyBuilder::new();
        b.add_node(Node::entry(
            NodeId(0),
            Point::ZERO,
            EntryConfig { spawn_rate_per_minute: 0.0, hold_duration_min_ms: 200, hold_duration_max_ms: 900 },
        ));
        let topo = b.build();
        let mut e = engine(config());
        for _ in 0..200 {
            e.spawn_case(&topo, ms(0));
        }
        for case in e.cases() {
            let hold = case.hold.as_millis();
            assert!((200..=900).contains(&hold), "hold {hold} ms");
        }
    }

    #[test]
    fn long_frame_catch_up_is_bounded() {
        let topo = workflow(60.0);
        let mut e = engine(CaseConfig { max_spawns_per_tick: 4, ..config() });
        assert_eq!(e.tick(&topo, SimTime::from_secs(30)).spawned, 4);
        // Backlog dropped: the schedule continues from the long frame.
        assert_eq!(e.tick(&topo, SimTime::from_secs(31)).spawned, 1);
    }
}

// ── Transitions ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod transitions {
    use super::*;

    #[test]
    fn hold_expires_exactly_on_time() {
        let topo = workflow(0.0);
        let mut e = engine(config());
        let id = e.spawn_case(&topo, ms(0)).expect("spawned");

        run(&mut e, &topo, 0, 400, 100);
        assert_eq!(e.case(id).expect("live").state, CaseState::AtEntry);

        e.tick(&topo, ms(500));
        let case = e.case(id).expect("live");
        assert_eq!(case.state, CaseState::Transitioning { to: NodeId(1) });
        assert_eq!(case.progress, 0.0);
        assert_eq!(case.state_entered_at, ms(500));
    }

    #[test]
    fn three_stages_take_three_durations() {
        let topo = workflow(0.0);
        let mut e = engine(config());
        let id = e.spawn_case(&topo, ms(0)).expect("spawned");

        let mut staged_ticks = 0;
        let mut seen_indices = Vec::new();
        let mut t = 100;
        while t <= 3_000 {
            e.tick(&topo, ms(t));
            if let Some(index) = e.case(id).and_then(|c| c.state.stage_index()) {
                staged_ticks += 1;
                if seen_indices.last() != Some(&index) {
                    seen_indices.push(index);
                }
            }
            t += 100;
        }
        assert_eq!(staged_ticks * 100, 1_500);
        assert_eq!(seen_indices, [0, 1, 2]);
    }

    #[test]
    fn full_lifecycle_reaches_exit_and_is_removed() {
        let topo = workflow(0.0);
        let mut e = engine(config());
        let id = e.spawn_case(&topo, ms(0)).expect("spawned");

        // hold 500 + transition 200 + stages 1500 + transition 200 = 2400.
        run(&mut e, &topo, 0, 2_300, 100);
        assert_eq!(e.case(id).expect("live").state, CaseState::Transitioning { to: NodeId(2) });
        e.tick(&topo, ms(2_400));
        let case = e.case(id).expect("live");
        assert_eq!(case.state, CaseState::AtExit);
        assert_eq!(case.node, NodeId(2));

        run(&mut e, &topo, 2_400, 3_300, 100);
        assert!(e.case(id).is_some(), "retention not yet elapsed");
        let tick = e.tick(&topo, ms(3_400));
        assert_eq!(tick.completed, 1);
        assert!(e.is_empty());
        assert_eq!(e.stats().completed, 1);
    }

    #[test]
    fn huge_retention_is_capped_at_a_day() {
        let mut b = TopologyBuilder::new();
        b.add_node(Node::entry(NodeId(0), Point::ZERO, entry(0.0, 100)));
        b.add_node(Node::exit(NodeId(1), Point::new(0.0, 100.0), ExitConfig { retention_secs: 1e30 }));
        b.add_edge(EdgeId(0), NodeId(0), NodeId(1), None);
        let topo = b.build();
        let mut e = engine(config());
        let id = e.spawn_case(&topo, ms(0)).expect("spawned");

        // hold 100 + transition 200.
        run(&mut e, &topo, 0, 300, 100);
        assert_eq!(e.case(id).expect("live").state, CaseState::AtExit);

        e.tick(&topo, SimTime::from_secs(3_600));
        assert!(e.case(id).expect("live").progress < 1.0);
        let tick = e.tick(&topo, SimTime::from_secs(86_401));
        assert_eq!(tick.completed, 1);
        assert!(e.is_empty());
    }

    #[test]
    fn one_transition_per_tick() {
        let topo = workflow(0.0);
        let mut e = engine(config());
        let id = e.spawn_case(&topo, ms(0)).expect("spawned");
        // A single huge jump still only leaves the entry.
        e.tick(&topo, ms(60_000));
        assert_eq!(e.case(id).expect("live").state, CaseState::Transitioning { to: NodeId(1) });
        e.tick(&topo, ms(120_000));
        assert_eq!(e.case(id).expect("live").state, CaseState::AtStage { index: 0 });
    }

    #[test]
    fn nodes_without_stages_are_passed_through() {
        let mut b = TopologyBuilder::new();
        b.add_node(Node::entry(NodeId(0), Point::ZERO, entry(0.0, 0)));
        b.add_node(Node::other(NodeId(1), Point::new(0.0, 100.0)));
        b.add_node(Node::exit(NodeId(2), Point::new(0.0, 200.0), ExitConfig::default()));
        b.add_edge(EdgeId(0), NodeId(0), NodeId(1), None);
        b.add_edge(EdgeId(1), NodeId(1), NodeId(2), None);
        let topo = b.build();

        let mut e = engine(config());
        let id = e.spawn_case(&topo, ms(0)).expect("spawned");
        e.tick(&topo, ms(0));
        assert_eq!(e.case(id).expect("live").state, CaseState::Transitioning { to: NodeId(1) });
        e.tick(&topo, ms(200));
        let case = e.case(id).expect("live");
        assert_eq!(case.node, NodeId(1));
        assert_eq!(case.state, CaseState::Transitioning { to: NodeId(2) });
    }

    #[test]
    fn explicit_order_overrides_edges() {
        let mut b = TopologyBuilder::new();
        b.add_node(Node::entry(NodeId(0), Point::ZERO, entry(0.0, 0)));
        b.add_node(Node::staged(NodeId(1), Point::new(0.0, 100.0), staged(1, 100)));
        b.add_node(Node::exit(NodeId(2), Point::new(0.0, 200.0), ExitConfig::default()));
        b.add_edge(EdgeId(0), NodeId(0), NodeId(1), None);
        b.procedural_order(vec![NodeId(0), NodeId(2)]);
        let topo = b.build();

        let mut e = engine(config());
        let id = e.spawn_case(&topo, ms(0)).expect("spawned");
        e.tick(&topo, ms(0));
        assert_eq!(e.case(id).expect("live").state, CaseState::Transitioning { to: NodeId(2) });
    }

    #[test]
    fn progress_tracks_elapsed_fraction() {
        let topo = workflow(0.0);
        let mut e = engine(config());
        let id = e.spawn_case(&topo, ms(0)).expect("spawned");
        e.tick(&topo, ms(250));
        let p = e.case(id).expect("live").progress;
        assert!((p - 0.5).abs() < 1e-6, "progress {p}");
    }
}

// ── Missing next node ─────────────────────────────────────────────────────────

#[cfg(test)]
mod missing_next {
    use super::*;

    #[test]
    fn dead_end_freezes_by_default() {
        let topo = dead_end();
        let mut e = engine(config());
        let id = e.spawn_case(&topo, ms(0)).expect("spawned");
        run(&mut e, &topo, 0, 2_000, 100);

        let case = e.case(id).expect("frozen cases stay live");
        assert!(case.frozen);
        assert_eq!(case.state, CaseState::AtStage { index: 0 });
        assert_eq!(case.progress, 1.0);
        assert_eq!(e.stats().frozen, 1);
    }

    #[test]
    fn frozen_case_resumes_when_topology_fixed() {
        let broken = dead_end();
        let mut e = engine(config());
        let id = e.spawn_case(&broken, ms(0)).expect("spawned");
        run(&mut e, &broken, 0, 1_000, 100);
        assert!(e.case(id).expect("live").frozen);

        let mut b = TopologyBuilder::new();
        b.add_node(Node::entry(NodeId(0), Point::new(0.0, 0.0), entry(0.0, 100)));
        b.add_node(Node::staged(NodeId(1), Point::new(0.0, 100.0), staged(1, 100)));
        b.add_node(Node::exit(NodeId(2), Point::new(0.0, 200.0), ExitConfig::default()));
        b.add_edge(EdgeId(0), NodeId(0), NodeId(1), None);
        b.add_edge(EdgeId(1), NodeId(1), NodeId(2), None);
        let fixed = b.build();

        e.tick(&fixed, ms(1_100));
        let case = e.case(id).expect("live");
        assert!(!case.frozen);
        assert_eq!(case.state, CaseState::Transitioning { to: NodeId(2) });
    }

    #[test]
    fn expire_policy_removes_stuck_cases() {
        let topo = dead_end();
        let mut e = engine(CaseConfig { missing_next: MissingNextPolicy::Expire, ..config() });
        e.spawn_case(&topo, ms(0)).expect("spawned");
        run(&mut e, &topo, 0, 2_000, 100);
        assert!(e.is_empty());
        let stats = e.stats();
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.completed, 0);
    }

    #[test]
    fn removed_target_freezes_in_transit() {
        let topo = workflow(0.0);
        let mut e = engine(config());
        let id = e.spawn_case(&topo, ms(0)).expect("spawned");
        e.tick(&topo, ms(500));
        assert_eq!(e.case(id).expect("live").state, CaseState::Transitioning { to: NodeId(1) });

        let mut b = TopologyBuilder::new();
        b.add_node(Node::entry(NodeId(0), Point::ZERO, entry(0.0, 500)));
        let without_target = b.build();
        e.tick(&without_target, ms(800));
        let case = e.case(id).expect("live");
        assert!(case.frozen);
        assert_eq!(case.state, CaseState::Transitioning { to: NodeId(1) });

        e.tick(&topo, ms(900));
        assert_eq!(e.case(id).expect("live").state, CaseState::AtStage { index: 0 });
    }
}

// ── Invariants ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod invariants {
    use super::*;

    #[test]
    fn stage_index_present_iff_at_stage() {
        let topo = workflow(120.0);
        let mut e = engine(config());
        let mut t = 0;
        while t <= 20_000 {
            e.tick(&topo, ms(t));
            for snap in e.snapshot() {
                let at_stage = matches!(snap.state, CaseState::AtStage { .. });
                assert_eq!(snap.stage_index.is_some(), at_stage, "{:?}", snap);
                if let Some(i) = snap.stage_index {
                    assert!(i < 3);
                }
                assert!((0.0..=1.0).contains(&snap.progress));
                assert_eq!(snap.next_node.is_some(), matches!(snap.state, CaseState::Transitioning { .. }));
            }
            t += 16;
        }
        assert!(e.stats().completed > 0);
    }

    #[test]
    fn case_ids_are_unique() {
        let topo = workflow(600.0);
        let mut e = engine(config());
        run(&mut e, &topo, 0, 5_000, 50);
        let mut ids: Vec<_> = e.cases().iter().map(|c| c.id).collect();
        let n = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), n);
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use super::*;

    #[test]
    fn reset_is_idempotent() {
        let topo = workflow(60.0);
        let mut e = engine(config());
        run(&mut e, &topo, 0, 5_000, 100);
        assert!(!e.is_empty());

        e.reset();
        e.reset();
        assert!(e.is_empty());
        assert!(!e.is_running());
        assert_eq!(e.stats(), crate::CaseStats::default());
    }

    #[test]
    fn reset_halts_spawning_until_start() {
        let topo = workflow(60.0);
        let mut e = engine(config());
        e.reset();
        run(&mut e, &topo, 0, 5_000, 100);
        assert!(e.is_empty());

        e.start();
        // Re-anchors at the first tick after start.
        e.tick(&topo, ms(5_100));
        assert!(e.is_empty());
        e.tick(&topo, ms(6_100));
        assert_eq!(e.len(), 1);
    }

    #[test]
    fn stop_keeps_cases_moving() {
        let topo = workflow(0.0);
        let mut e = engine(config());
        let id = e.spawn_case(&topo, ms(0)).expect("spawned");
        e.stop();
        e.tick(&topo, ms(500));
        assert_eq!(e.case(id).expect("live").state, CaseState::Transitioning { to: NodeId(1) });
    }

    #[test]
    fn deterministic_under_seed() {
        let topo = workflow(90.0);
        let mut a = engine(config());
        let mut b = engine(config());
        run(&mut a, &topo, 0, 8_000, 16);
        run(&mut b, &topo, 0, 8_000, 16);
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
