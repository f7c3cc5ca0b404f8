//! Deterministic simulation RNG.
//!
//! # Determinism strategy
//!
//! The simulation owns one root `SimRng` seeded from the run's seed.  Each
//! subsystem (particle pool, case engine) takes a child derived with
//! [`SimRng::child`], so adding draws in one subsystem never perturbs the
//! sequence seen by another.
//!
//!   child_seed = parent_draw XOR (offset * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seeded, reproducible RNG used for every random draw in the core.
///
/// Used only from the single simulation thread; it is deliberately not
/// shared.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive an independent child `SimRng` for a subsystem.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Uniform `f32` in `[lo, hi)`.  Returns `lo` for a degenerate, inverted
    /// or non-finite range rather than panicking.
    ///
    /// A finite range whose width overflows `f32` (e.g. `-MAX..MAX`) is drawn
    /// in `f64` and may return `hi` itself.
    pub fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        if !(lo.is_finite() && hi.is_finite()) || lo >= hi {
            return lo;
        }
        if (hi - lo).is_finite() {
            return self.0.gen_range(lo..hi);
        }
        let t: f64 = self.0.r#gen();
        (lo as f64 + (hi as f64 - lo as f64) * t).clamp(lo as f64, hi as f64) as f32
    }

    /// Uniform `u64` in `[lo, hi]` (inclusive).  Returns `lo` when `lo >= hi`.
    #[inline]
    pub fn uniform_u64(&mut self, lo: u64, hi: u64) -> u64 {
        if lo < hi { self.0.gen_range(lo..=hi) } else { lo }
    }

    /// Choose a random element from a slice; `None` if it is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}

impl std::fmt::Debug for SimRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SimRng")
    }
}
