//! Per-stat modifier and multiplier stacks.
//!
//! A stat's derived value is computed from its base with a single pass:
//! `Multipliers (summed, floored) → Modifiers (summed) → Floor at 0 → Round`.
//!
//! ```text
//! factor  = max(0, 1 + Σ multipliers)
//! derived = round(max(0, base × factor + Σ modifiers))
//! ```
//!
//! Multipliers are deltas on a 1.0 factor, not direct factors: two `+0.5`
//! multipliers give `×2.0`, and `-1.0` zeroes the multiplicative term.
//! Both sums are order independent, so insertion order never matters.

use std::collections::BTreeMap;

/// Identifier of a modifier or multiplier within one stat's stack.
///
/// Ids are scoped to a stat and to a kind (modifier vs multiplier): the
/// first modifier on `attack` and the first multiplier on `attack` are both
/// id 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierId(pub u32);

impl ModifierId {
    /// Raw id reported to callers when an insertion was rejected.
    pub const SENTINEL: i64 = -1;

    pub const fn raw(self) -> i64 {
        self.0 as i64
    }

    /// Flattens an insertion result into the raw id, or [`Self::SENTINEL`].
    pub fn raw_or_sentinel<E>(result: Result<ModifierId, E>) -> i64 {
        result.map_or(Self::SENTINEL, ModifierId::raw)
    }
}

impl core::fmt::Display for ModifierId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which of the two stacks a bonus lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BonusKind {
    /// Additive adjustment applied after the factor.
    Modifier,
    /// Delta on the 1.0-based multiplicative factor.
    Multiplier,
}

impl BonusKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BonusKind::Modifier => "modifier",
            BonusKind::Multiplier => "multiplier",
        }
    }
}

impl core::fmt::Display for BonusKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Factors within this distance of 1.0 are treated as exactly 1.0.
const FACTOR_EPSILON: f64 = 1e-5;

/// Active modifiers and multipliers for a single stat.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BonusStack {
    modifiers: BTreeMap<ModifierId, i32>,
    multipliers: BTreeMap<ModifierId, f32>,
}

impl BonusStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an additive modifier and returns its id.
    pub fn add_modifier(&mut self, value: i32) -> ModifierId {
        let id = Self::next_id(self.modifiers.keys());
        self.modifiers.insert(id, value);
        id
    }

    /// Adds a multiplier delta and returns its id.
    pub fn add_multiplier(&mut self, value: f32) -> ModifierId {
        let id = Self::next_id(self.multipliers.keys());
        self.multipliers.insert(id, value);
        id
    }

    /// Removes a modifier, returning its value if it existed.
    pub fn remove_modifier(&mut self, id: ModifierId) -> Option<i32> {
        self.modifiers.remove(&id)
    }

    /// Removes a multiplier, returning its value if it existed.
    pub fn remove_multiplier(&mut self, id: ModifierId) -> Option<f32> {
        self.multipliers.remove(&id)
    }

    pub fn modifier(&self, id: ModifierId) -> Option<i32> {
        self.modifiers.get(&id).copied()
    }

    pub fn multiplier(&self, id: ModifierId) -> Option<f32> {
        self.multipliers.get(&id).copied()
    }

    /// Sum of all modifiers.
    pub fn modifier_sum(&self) -> i64 {
        self.modifiers.values().map(|&v| v as i64).sum()
    }

    /// Multiplicative factor: `1 + Σ multipliers`, floored at zero.
    pub fn factor(&self) -> f64 {
        let sum: f64 = self.multipliers.values().map(|&v| v as f64).sum();
        (1.0 + sum).max(0.0)
    }

    /// Applies the stack to a base value.
    ///
    /// # Formula
    /// ```text
    /// result = round(max(0, base × factor + Σ modifiers))
    /// ```
    pub fn apply(&self, base: i32) -> i32 {
        let mut value = base as f64;

        let factor = self.factor();
        if (factor - 1.0).abs() > FACTOR_EPSILON {
            value *= factor;
        }

        value += self.modifier_sum() as f64;

        let rounded = value.max(0.0).round();
        if rounded >= i32::MAX as f64 {
            i32::MAX
        } else {
            rounded as i32
        }
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty() && self.multipliers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modifiers.len() + self.multipliers.len()
    }

    /// Highest existing id + 1, or 0 for an empty stack.
    fn next_id<'a>(mut ids: impl DoubleEndedIterator<Item = &'a ModifierId>) -> ModifierId {
        ids.next_back()
            .map_or(ModifierId(0), |last| ModifierId(last.0 + 1))
    }
}
