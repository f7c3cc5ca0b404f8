//! headless: runs the flowsim core without a UI.
//!
//! Loads an embedded review workflow, simulates ten seconds of 60 Hz frames,
//! and writes case snapshots plus per-tick summaries as CSV under
//! `output/headless`.  Built with `--features raster`, the last frame is also
//! rendered to `output/headless/frame.png`.
//!
//! Log level follows `RUST_LOG` (default `info`).

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use flow_core::{EdgeId, Point};
use flow_output::{CsvWriter, SimOutputObserver};
use flow_render::{RecordingCanvas, RenderOptions, Viewport};
use flow_sim::{FlowConfig, FlowSimBuilder, load_topology_json};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:       u64      = 42;
const FRAME:      Duration = Duration::from_micros(16_667);
const SIM_FRAMES: u64      = 600;
const OUT_DIR:    &str     = "output/headless";
const CANVAS_W:   u32      = 640;
const CANVAS_H:   u32      = 480;

// intake → triage → {fast lane | review → approval} → done.
// Edge 7 points at a node that does not exist and is skipped on load.
const TOPOLOGY: &str = r##"{
    "nodes": [
        {"id": 0, "type": "entry", "position": {"x": 320, "y": 40},
         "spawn_rate_per_minute": 90, "hold_duration_min_ms": 300, "hold_duration_max_ms": 900},
        {"id": 1, "type": "staged", "position": {"x": 320, "y": 140},
         "ordered_stages": [{"label": "classify", "kind": "task"}, {"label": "route", "kind": "automated"}],
         "stage_duration_ms": 400},
        {"id": 2, "type": "other", "position": {"x": 180, "y": 260},
         "emitter": {"rate_per_sec": 1.5}},
        {"id": 3, "type": "staged", "position": {"x": 460, "y": 260},
         "ordered_stages": [{"label": "peer review", "kind": "review"}, {"label": "sign-off", "kind": "approval"}]},
        {"id": 4, "type": "exit", "position": {"x": 320, "y": 400}, "retention_secs": 1.5}
    ],
    "edges": [
        {"id": 0, "source": 0, "target": 1},
        {"id": 1, "source": 1, "target": 2, "weight": 3},
        {"id": 2, "source": 1, "target": 3},
        {"id": 3, "source": 2, "target": 4},
        {"id": 4, "source": 3, "target": 4},
        {"id": 7, "source": 3, "target": 99}
    ]
}"##;

const CONFIG: &str = r#"{
    "snapshot_interval_ticks": 30,
    "particles": {"spawn_rate_per_sec": 6, "max_particles": 400},
    "cases": {"transition_duration_ms": 500}
}"#;

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    // 1. Topology and configuration.
    let topology = load_topology_json(TOPOLOGY)?;
    let config = FlowConfig { seed: SEED, ..FlowConfig::from_json_str(CONFIG)? };
    info!(
        nodes = topology.node_count(),
        edges = topology.edge_count(),
        order = ?topology.procedural_order(),
        "topology loaded"
    );
    info!(config = %serde_json::to_string(&config)?, "effective config");

    // 2. Build and highlight the fast lane.
    let mut sim = FlowSimBuilder::new(topology).config(config).build()?;
    sim.particles_mut().set_highlighted_edges([EdgeId(1), EdgeId(3)]);

    // 3. Run with CSV output.
    let writer = CsvWriter::new(Path::new(OUT_DIR))?;
    let mut obs = SimOutputObserver::new(writer);

    let t0 = Instant::now();
    sim.run_ticks(SIM_FRAMES, FRAME, &mut obs);
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        warn!(error = %e, "output incomplete");
    }

    // 4. Summary.
    let particles = sim.particles().stats();
    let cases = sim.cases().stats();
    info!(
        wall_ms = elapsed.as_millis() as u64,
        sim_time = %sim.now(),
        frames = sim.clock().frame,
        "simulation complete"
    );
    info!(
        active = particles.active_count,
        completed = particles.completed_count,
        throughput_per_sec = particles.throughput_per_sec,
        "particles"
    );
    info!(
        active = cases.active,
        spawned = cases.spawned,
        completed = cases.completed,
        frozen = cases.frozen,
        "cases"
    );

    // 5. Draw the final frame, zoomed around the triage node.
    let mut viewport = Viewport::default();
    viewport.zoom_at(Point::new(320.0, 140.0), 1.25);
    viewport.pan_by(0.0, -20.0);
    let options = RenderOptions::default();

    let mut recording = RecordingCanvas::new(CANVAS_W, CANVAS_H);
    let stats = sim.draw(&mut recording, &viewport, &options);
    info!(
        trajectories = stats.trajectories,
        trail_segments = stats.trail_segments,
        heads = stats.heads,
        culled = stats.culled,
        commands = recording.commands.len(),
        "frame drawn"
    );

    #[cfg(feature = "raster")]
    {
        let mut canvas = flow_render::PixmapCanvas::new(CANVAS_W, CANVAS_H)?;
        sim.draw(&mut canvas, &viewport, &options);
        let path = Path::new(OUT_DIR).join("frame.png");
        canvas.save_png(&path)?;
        info!(path = %path.display(), "frame saved");
    }

    info!(dir = OUT_DIR, "wrote case_snapshots.csv and tick_summaries.csv");
    Ok(())
}
