//! Simulation time model.
//!
//! # Design
//!
//! Time is an absolute `SimTime` counted in integer **microseconds** since the
//! simulation started.  Spans are plain `std::time::Duration`s.  The core
//! never reads a wall clock: whatever drives the animation (a compositor
//! callback, a timer thread, a test harness) calls `SimClock::advance(dt)`
//! once per frame.
//!
//! Integer microseconds keep all lifecycle arithmetic exact, so a 500 ms hold
//! fires on the frame that reaches 500 ms and never one frame early due to
//! float drift.

use std::fmt;
use std::time::Duration;

// ── SimTime ──────────────────────────────────────────────────────────────────

/// An absolute simulation timestamp (µs since start).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    #[inline]
    pub fn from_millis(ms: u64) -> SimTime {
        SimTime(ms.saturating_mul(1_000))
    }

    #[inline]
    pub fn from_secs(secs: u64) -> SimTime {
        SimTime(secs.saturating_mul(1_000_000))
    }

    #[inline]
    pub fn as_micros(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0 / 1_000
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Time elapsed from `earlier` to `self`; zero if `earlier` is later.
    #[inline]
    pub fn saturating_since(self, earlier: SimTime) -> Duration {
        Duration::from_micros(self.0.saturating_sub(earlier.0))
    }

    /// `self - span`, clamped at `SimTime::ZERO`.
    #[inline]
    pub fn saturating_sub(self, span: Duration) -> SimTime {
        SimTime(self.0.saturating_sub(duration_micros(span)))
    }
}

impl std::ops::Add<Duration> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: Duration) -> SimTime {
        SimTime(self.0.saturating_add(duration_micros(rhs)))
    }
}

impl std::ops::AddAssign<Duration> for SimTime {
    #[inline]
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}.{:03}s", self.0 / 1_000_000, (self.0 / 1_000) % 1_000)
    }
}

#[inline]
fn duration_micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

/// Fraction `elapsed / total`, clamped to `[0, 1]`.  A zero-length span is
/// complete as soon as it starts.
pub fn fraction(elapsed: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0) as f32
}

/// `Duration` from float seconds, saturating instead of panicking:
/// NaN or negative → zero, beyond `Duration::MAX` → `Duration::MAX`.
pub fn duration_from_secs(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Interval between events at `per_sec` events per second; `None` when the
/// rate is not a positive finite number.
pub fn rate_interval(per_sec: f64) -> Option<Duration> {
    (per_sec.is_finite() && per_sec > 0.0).then(|| duration_from_secs(1.0 / per_sec))
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current simulation time and frame count.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimClock {
    /// Current simulation time, advanced by [`SimClock::advance`].
    pub now: SimTime,
    /// Number of frames advanced since start.
    pub frame: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one frame of length `dt`.
    #[inline]
    pub fn advance(&mut self, dt: Duration) {
        self.now += dt;
        self.frame += 1;
    }

    /// Rewind to time zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (frame {})", self.now, self.frame)
    }
}
