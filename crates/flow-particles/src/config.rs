//! Particle pool configuration.

use std::time::Duration;

use flow_core::{NodeId, Rgba, duration_from_secs, rate_interval};

/// Stroke styling for edge trajectories, read by the renderer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrajectoryStyle {
    pub color:          Rgba,
    pub width:          f32,
    pub selected_color: Rgba,
    pub selected_width: f32,
}

impl Default for TrajectoryStyle {
    fn default() -> Self {
        Self {
            color:          Rgba::new(148, 163, 184, 90),
            width:          1.5,
            selected_color: Rgba::rgb(250, 204, 21),
            selected_width: 3.0,
        }
    }
}

/// Configuration of a [`ParticlePool`][crate::ParticlePool].
///
/// May be replaced between ticks with `set_config`; live particles keep
/// their sampled speed, color, size, and path.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParticleConfig {
    /// Node scheduled and default manual spawns start from.  `None` disables
    /// both (spawning becomes a no-op).
    pub start_node:             Option<NodeId>,
    /// Scheduled spawns per second.  0 disables scheduled spawning.
    pub spawn_rate_per_sec:     f32,
    /// Live particle cap.  Spawns at capacity are skipped, never queued.
    pub max_particles:          usize,
    /// Per-particle speed multiplier range, in edges per second.
    pub speed_min:              f32,
    pub speed_max:              f32,
    /// Head radius range in pixels.
    pub size_min:               f32,
    pub size_max:               f32,
    /// Palette; each particle picks one uniformly.
    pub colors:                 Vec<Rgba>,
    /// Maximum number of trail points kept per particle (≥ 1).
    pub trail_length:           usize,
    /// Lateral offsets are drawn from `[-spread, spread]` pixels.
    pub lateral_spread:         f32,
    /// Global speed scale applied on top of each particle's multiplier.
    pub flow_speed:             f32,
    /// Rolling window used for the throughput statistic.
    pub throughput_window_secs: f32,
    pub trajectory:             TrajectoryStyle,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            start_node:             None,
            spawn_rate_per_sec:     2.0,
            max_particles:          200,
            speed_min:              0.4,
            speed_max:              0.9,
            size_min:               2.0,
            size_max:               4.0,
            colors:                 default_palette(),
            trail_length:           12,
            lateral_spread:         6.0,
            flow_speed:             1.0,
            throughput_window_secs: 5.0,
            trajectory:             TrajectoryStyle::default(),
        }
    }
}

fn default_palette() -> Vec<Rgba> {
    vec![
        Rgba::rgb(56, 189, 248),
        Rgba::rgb(129, 140, 248),
        Rgba::rgb(52, 211, 153),
        Rgba::rgb(251, 146, 60),
    ]
}

/// Non-finite or negative → `fallback`.
fn non_negative(v: f32, fallback: f32) -> f32 {
    if v.is_finite() && v >= 0.0 { v } else { fallback }
}

impl ParticleConfig {
    /// Shortest accepted throughput window.
    pub const MIN_WINDOW_SECS: f32 = 0.1;
    /// Longest accepted throughput window: one hour.
    pub const MAX_WINDOW_SECS: f32 = 3_600.0;
    /// Widest accepted lateral spread, in pixels.
    pub const MAX_LATERAL_SPREAD: f32 = 10_000.0;

    /// Clamp every field to a valid value.
    pub fn sanitized(mut self) -> Self {
        self.spawn_rate_per_sec = non_negative(self.spawn_rate_per_sec, 0.0);
        self.speed_min = non_negative(self.speed_min, 0.0);
        self.speed_max = non_negative(self.speed_max, self.speed_min);
        if self.speed_min > self.speed_max {
            std::mem::swap(&mut self.speed_min, &mut self.speed_max);
        }
        self.size_min = non_negative(self.size_min, 0.0);
        self.size_max = non_negative(self.size_max, self.size_min);
        if self.size_min > self.size_max {
            std::mem::swap(&mut self.size_min, &mut self.size_max);
        }
        if self.colors.is_empty() {
            self.colors = default_palette();
        }
        self.trail_length = self.trail_length.max(1);
        self.lateral_spread = non_negative(self.lateral_spread, 0.0).min(Self::MAX_LATERAL_SPREAD);
        self.flow_speed = non_negative(self.flow_speed, 1.0);
        self.throughput_window_secs = non_negative(self.throughput_window_secs, 5.0)
            .clamp(Self::MIN_WINDOW_SECS, Self::MAX_WINDOW_SECS);
        self.trajectory.width = non_negative(self.trajectory.width, 0.0);
        self.trajectory.selected_width = non_negative(self.trajectory.selected_width, 0.0);
        self
    }

    /// Interval between scheduled spawns; `None` when the rate is 0.
    pub fn spawn_interval(&self) -> Option<Duration> {
        rate_interval(self.spawn_rate_per_sec as f64)
    }

    pub fn throughput_window(&self) -> Duration {
        duration_from_secs(self.throughput_window_secs.max(Self::MIN_WINDOW_SECS) as f64)
    }
}
