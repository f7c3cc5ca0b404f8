//! Unit tests for flow-render.

use std::time::Duration;

use flow_core::{EdgeId, NodeId, Point, Rgba, SimRng, SimTime};
use flow_graph::{EntryConfig, ExitConfig, Node, Topology, TopologyBuilder};
use flow_particles::{ParticleConfig, ParticlePool};

use crate::{DrawCommand, RecordingCanvas, RenderOptions, Viewport, draw};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// 0 → 1 → 2 straight down at x = 100; edges 0 and 1.
fn chain() -> Topology {
    let mut b = TopologyBuilder::new();
    b.add_node(Node::entry(NodeId(0), Point::new(100.0, 0.0), EntryConfig::default()));
    b.add_node(Node::other(NodeId(1), Point::new(100.0, 100.0)));
    b.add_node(Node::exit(NodeId(2), Point::new(100.0, 200.0), ExitConfig::default()));
    b.add_edge(EdgeId(0), NodeId(0), NodeId(1), None);
    b.add_edge(EdgeId(1), NodeId(1), NodeId(2), None);
    b.build()
}

fn pool() -> ParticlePool {
    ParticlePool::new(
        ParticleConfig {
            start_node:         Some(NodeId(0)),
            spawn_rate_per_sec: 0.0,
            speed_min:          1.0,
            speed_max:          1.0,
            lateral_spread:     0.0,
            ..ParticleConfig::default()
        },
        SimRng::new(3),
    )
}

/// A pool holding one particle that has moved `frames` steps of 50 ms.
fn pool_with_particle(topo: &Topology, frames: u64) -> ParticlePool {
    let mut p = pool();
    p.spawn(topo).expect("spawned");
    let dt = Duration::from_millis(50);
    for i in 1..=frames {
        p.advance(topo, dt, SimTime::from_millis(50 * i));
    }
    p
}

fn trajectories_only() -> RenderOptions {
    RenderOptions { show_trails: false, show_particles: false, ..RenderOptions::default() }
}

fn particles_only() -> RenderOptions {
    RenderOptions { show_trajectories: false, ..RenderOptions::default() }
}

// ── Frame structure ───────────────────────────────────────────────────────────

#[cfg(test)]
mod frame {
    use super::*;

    #[test]
    fn clears_resets_then_applies_viewport() {
        let topo = chain();
        let p = pool();
        let vp = Viewport::new(10.0, -5.0, 2.0);
        let opts = RenderOptions::default();
        let mut canvas = RecordingCanvas::new(800, 600);
        draw(&mut canvas, &topo, &p, &vp, &opts);

        assert_eq!(canvas.commands[0], DrawCommand::Clear(opts.background));
        assert_eq!(canvas.commands[1], DrawCommand::ResetTransform);
        assert_eq!(canvas.commands[2], DrawCommand::SetTransform(vp));
    }

    #[test]
    fn invalid_zoom_is_clamped_before_use() {
        let topo = chain();
        let p = pool();
        let vp = Viewport { pan_x: 0.0, pan_y: 0.0, zoom: 0.0 };
        let mut canvas = RecordingCanvas::new(100, 100);
        draw(&mut canvas, &topo, &p, &vp, &RenderOptions::default());
        let DrawCommand::SetTransform(applied) = canvas.commands[2] else {
            panic!("expected SetTransform, got {:?}", canvas.commands[2]);
        };
        assert_eq!(applied.zoom, Viewport::MIN_ZOOM);
    }

    #[test]
    fn each_frame_replaces_the_previous_recording() {
        let topo = chain();
        let p = pool();
        let mut canvas = RecordingCanvas::new(400, 400);
        draw(&mut canvas, &topo, &p, &Viewport::default(), &RenderOptions::default());
        let first = canvas.commands.len();
        draw(&mut canvas, &topo, &p, &Viewport::default(), &RenderOptions::default());
        assert_eq!(canvas.commands.len(), first);
    }

    #[test]
    fn everything_disabled_draws_nothing() {
        let topo = chain();
        let p = pool_with_particle(&topo, 5);
        let opts = RenderOptions {
            show_trajectories: false,
            show_trails: false,
            show_particles: false,
            ..RenderOptions::default()
        };
        let mut canvas = RecordingCanvas::new(400, 400);
        let stats = draw(&mut canvas, &topo, &p, &Viewport::default(), &opts);
        assert_eq!(canvas.commands.len(), 3);
        assert_eq!(stats, crate::FrameStats::default());
    }
}

// ── Trajectories ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod trajectories {
    use super::*;

    #[test]
    fn every_edge_is_drawn_as_a_flattened_curve() {
        let topo = chain();
        let p = pool();
        let opts = trajectories_only();
        let mut canvas = RecordingCanvas::new(400, 400);
        let stats = draw(&mut canvas, &topo, &p, &Viewport::default(), &opts);

        assert_eq!(stats.trajectories, 2);
        let lines: Vec<_> = canvas.polylines().collect();
        assert_eq!(lines.len(), 2);
        for (points, _, _) in &lines {
            assert_eq!(points.len(), opts.curve_segments + 1);
        }
        assert_eq!(lines[0].0[0], Point::new(100.0, 0.0));
        assert_eq!(*lines[0].0.last().expect("points"), Point::new(100.0, 100.0));
    }

    #[test]
    fn highlighted_edges_drawn_last_with_selected_style() {
        let topo = chain();
        let mut p = pool();
        p.set_highlighted_edges([EdgeId(0)]);
        let style = p.config().trajectory.clone();
        let mut canvas = RecordingCanvas::new(400, 400);
        draw(&mut canvas, &topo, &p, &Viewport::default(), &trajectories_only());

        let lines: Vec<_> = canvas.polylines().collect();
        assert_eq!(lines.len(), 2);
        // Unselected edge 1 first, selected edge 0 on top.
        assert_eq!(lines[0].0[0], Point::new(100.0, 100.0));
        assert_eq!((lines[0].1, lines[0].2), (style.color, style.width));
        assert_eq!(lines[1].0[0], Point::new(100.0, 0.0));
        assert_eq!((lines[1].1, lines[1].2), (style.selected_color, style.selected_width));
    }
}

// ── Particles ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod particles {
    use super::*;

    #[test]
    fn trail_fades_from_particle_color_to_transparent() {
        let topo = chain();
        let p = pool_with_particle(&topo, 5);
        let particle = &p.particles()[0];
        assert_eq!(particle.trail.len(), 5);

        let mut canvas = RecordingCanvas::new(400, 400);
        let stats = draw(&mut canvas, &topo, &p, &Viewport::default(), &particles_only());
        assert_eq!(stats.trail_segments, 4);

        let segments: Vec<_> = canvas.polylines().collect();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].1, particle.color);
        for pair in segments.windows(2) {
            assert!(pair[1].1.a < pair[0].1.a, "alpha must decrease toward the tail");
            assert_eq!((pair[1].1.r, pair[1].1.g, pair[1].1.b), (particle.color.r, particle.color.g, particle.color.b));
        }
        // Segments follow the trail, newest first.
        let trail: Vec<Point> = particle.trail.iter().copied().collect();
        assert_eq!(segments[0].0, &trail[0..2]);
        assert_eq!(segments[3].0, &trail[3..5]);
    }

    #[test]
    fn head_drawn_at_newest_trail_point() {
        let topo = chain();
        let p = pool_with_particle(&topo, 3);
        let particle = &p.particles()[0];
        let mut canvas = RecordingCanvas::new(400, 400);
        let stats = draw(&mut canvas, &topo, &p, &Viewport::default(), &particles_only());

        assert_eq!(stats.heads, 1);
        let circles: Vec<_> = canvas.circles().collect();
        let head = particle.trail.head().expect("trail");
        assert_eq!(circles, [(head, particle.radius, particle.color)]);
    }

    #[test]
    fn fresh_particle_without_trail_is_not_drawn() {
        let topo = chain();
        let mut p = pool();
        p.spawn(&topo).expect("spawned");
        let mut canvas = RecordingCanvas::new(400, 400);
        let stats = draw(&mut canvas, &topo, &p, &Viewport::default(), &particles_only());
        assert_eq!(stats.heads, 0);
        assert_eq!(canvas.circles().count(), 0);
    }

    #[test]
    fn default_palette_is_visible() {
        assert!(ParticleConfig::default().colors.iter().all(|c| *c != Rgba::TRANSPARENT && c.a > 0));
    }

    #[test]
    fn off_screen_particles_are_culled() {
        let topo = chain();
        let p = pool_with_particle(&topo, 3);
        let far = Viewport::new(-10_000.0, -10_000.0, 1.0);
        let mut canvas = RecordingCanvas::new(400, 400);
        let stats = draw(&mut canvas, &topo, &p, &far, &particles_only());
        assert_eq!(stats.culled, 1);
        assert_eq!(stats.heads, 0);
        assert_eq!(stats.trail_segments, 0);
    }

    #[test]
    fn drawing_leaves_pool_untouched() {
        let topo = chain();
        let p = pool_with_particle(&topo, 4);
        let before: Vec<_> = p.particles().iter().map(|q| (q.id, q.edge_index, q.progress, q.trail.len())).collect();
        let mut canvas = RecordingCanvas::new(400, 400);
        draw(&mut canvas, &topo, &p, &Viewport::default(), &RenderOptions::default());
        let after: Vec<_> = p.particles().iter().map(|q| (q.id, q.edge_index, q.progress, q.trail.len())).collect();
        assert_eq!(before, after);
    }
}

// ── Viewport ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod viewport {
    use super::*;

    #[test]
    fn sanitize_clamps_bad_values() {
        let vp = Viewport { pan_x: f32::NAN, pan_y: f32::INFINITY, zoom: -3.0 }.sanitized();
        assert_eq!(vp, Viewport { pan_x: 0.0, pan_y: 0.0, zoom: Viewport::MIN_ZOOM });
        assert_eq!(Viewport::new(0.0, 0.0, 1e9).zoom, Viewport::MAX_ZOOM);
    }

    #[test]
    fn screen_world_round_trip() {
        let vp = Viewport::new(30.0, -12.0, 1.5);
        let world = Point::new(42.0, 7.0);
        let back = vp.to_world(vp.to_screen(world));
        assert!(back.distance(world) < 1e-4);
        assert_eq!(vp.to_screen(world), Point::new(42.0 * 1.5 + 30.0, 7.0 * 1.5 - 12.0));
    }

    #[test]
    fn zoom_at_keeps_anchor_fixed() {
        let mut vp = Viewport::new(10.0, 20.0, 1.0);
        let anchor = Point::new(200.0, 150.0);
        let world_before = vp.to_world(anchor);
        vp.zoom_at(anchor, 2.0);
        assert_eq!(vp.zoom, 2.0);
        assert!(vp.to_world(anchor).distance(world_before) < 1e-3);
    }

    #[test]
    fn visible_world_inverts_screen_rect() {
        let vp = Viewport::new(-100.0, 0.0, 2.0);
        let (min, max) = vp.visible_world(400, 300);
        assert_eq!(min, Point::new(50.0, 0.0));
        assert_eq!(max, Point::new(250.0, 150.0));
    }
}

// ── Raster backend ────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "raster"))]
mod raster {
    use super::*;
    use crate::{Canvas, PixmapCanvas};

    #[test]
    fn clear_fills_every_pixel() {
        let mut canvas = PixmapCanvas::new(8, 8).expect("pixmap");
        canvas.clear(Rgba::rgb(10, 20, 30));
        assert_eq!(canvas.pixel(0, 0), Some(Rgba::rgb(10, 20, 30)));
        assert_eq!(canvas.pixel(7, 7), Some(Rgba::rgb(10, 20, 30)));
        assert_eq!(canvas.pixel(8, 0), None);
    }

    #[test]
    fn circle_respects_transform() {
        let mut canvas = PixmapCanvas::new(64, 64).expect("pixmap");
        canvas.clear(Rgba::BLACK);
        canvas.set_transform(&Viewport::new(20.0, 20.0, 2.0));
        canvas.fill_circle(Point::new(5.0, 5.0), 3.0, Rgba::WHITE);
        // World (5, 5) lands on screen (30, 30).
        assert_eq!(canvas.pixel(30, 30), Some(Rgba::WHITE));
        assert_eq!(canvas.pixel(5, 5), Some(Rgba::BLACK));
    }

    #[test]
    fn zero_size_pixmap_is_an_error() {
        assert!(matches!(
            PixmapCanvas::new(0, 10),
            Err(crate::RenderError::PixmapAlloc { width: 0, height: 10 })
        ));
    }

    #[test]
    fn full_frame_encodes_png() {
        let topo = chain();
        let p = pool_with_particle(&topo, 4);
        let mut canvas = PixmapCanvas::new(200, 220).expect("pixmap");
        draw(&mut canvas, &topo, &p, &Viewport::default(), &RenderOptions::default());
        let png = canvas.encode_png().expect("png");
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
