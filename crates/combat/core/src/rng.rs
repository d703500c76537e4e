//! Roll sources for hit checks, damage variance and agent picks.
//!
//! The engine never owns a generator. Every stochastic operation takes a
//! `&mut impl RollSource`, so the caller decides how rolls are produced:
//! a seeded generator for reproducible encounters, or [`ScriptedRolls`] when
//! a test needs exact outcomes.
//!
//! # Determinism
//!
//! Given the same seed and the same sequence of engine calls, a seeded
//! generator yields the same encounter. Rolls are drawn in a fixed order:
//! per target, damage variance first, then the hit roll.

use rand::{Rng, RngCore};

/// Source of uniform draws consumed by the engine.
pub trait RollSource {
    /// Uniform roll in `[0, 100)`, compared against hit chances.
    fn roll_percent(&mut self) -> f32;

    /// Uniform draw in `[-1, 1]`, scaled by the damage variance.
    fn roll_variance(&mut self) -> f32;

    /// Uniform index in `[0, len)`.
    ///
    /// Callers must not pass `len == 0`.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Uniform draw in `[0, 1)`, used for probability gates.
    fn roll_unit(&mut self) -> f32 {
        self.roll_percent() / 100.0
    }
}

impl<R: RngCore> RollSource for R {
    fn roll_percent(&mut self) -> f32 {
        self.gen_range(0.0..100.0)
    }

    fn roll_variance(&mut self) -> f32 {
        self.gen_range(-1.0..=1.0)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Roll source that always returns the same values.
///
/// Useful for pinning outcomes: `percent = 0.0` always hits any positive
/// chance, `variance = 0.0` removes damage spread, `index` selects a fixed
/// option (wrapped to the available length).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScriptedRolls {
    pub percent: f32,
    pub variance: f32,
    pub index: usize,
}

impl ScriptedRolls {
    /// Rolls that always hit, never vary, and always pick the first option.
    pub const fn certain() -> Self {
        Self {
            percent: 0.0,
            variance: 0.0,
            index: 0,
        }
    }

    /// Rolls that miss anything below 100% hit chance.
    pub const fn unlucky() -> Self {
        Self {
            percent: 99.999,
            variance: 0.0,
            index: 0,
        }
    }

    pub const fn with_variance(mut self, variance: f32) -> Self {
        self.variance = variance;
        self
    }

    pub const fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }
}

impl RollSource for ScriptedRolls {
    fn roll_percent(&mut self) -> f32 {
        self.percent
    }

    fn roll_variance(&mut self) -> f32 {
        self.variance
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.index % len
    }
}
