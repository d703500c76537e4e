//! Bonuses that expire after a duration.

use crate::action::BonusValue;
use crate::stats::{BonusKind, ModifierId, StatKind};

/// A modifier or multiplier held on a stat block until `remaining` runs out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedBonus {
    pub stat: StatKind,
    pub kind: BonusKind,
    pub id: ModifierId,
    pub remaining: f32,
}

impl TimedBonus {
    pub fn new(stat: StatKind, value: &BonusValue, id: ModifierId, duration: f32) -> Self {
        let kind = match value {
            BonusValue::Flat(_) => BonusKind::Modifier,
            BonusValue::Multiplier(_) => BonusKind::Multiplier,
        };
        Self {
            stat,
            kind,
            id,
            remaining: duration,
        }
    }

    /// Counts down and reports whether the bonus has run out.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}
