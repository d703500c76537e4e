//! The fixed set of modifiable stats.

/// A stat that can receive modifiers and multipliers.
///
/// Names parse case-insensitively from their snake_case form
/// (`"max_health"`, `"hit_chance"`, ...). Any other name is an invalid stat.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    MaxHealth,
    MaxEnergy,
    Attack,
    Defense,
    Speed,
    HitChance,
    Evasion,
}

impl StatKind {
    pub const COUNT: usize = 7;

    pub const ALL: [StatKind; Self::COUNT] = [
        StatKind::MaxHealth,
        StatKind::MaxEnergy,
        StatKind::Attack,
        StatKind::Defense,
        StatKind::Speed,
        StatKind::HitChance,
        StatKind::Evasion,
    ];

    /// Dense index used for per-stat storage.
    pub const fn index(self) -> usize {
        match self {
            StatKind::MaxHealth => 0,
            StatKind::MaxEnergy => 1,
            StatKind::Attack => 2,
            StatKind::Defense => 3,
            StatKind::Speed => 4,
            StatKind::HitChance => 5,
            StatKind::Evasion => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    #[test]
    fn parses_snake_case_names() {
        assert_eq!(StatKind::from_str("max_health"), Ok(StatKind::MaxHealth));
        assert_eq!(StatKind::from_str("HIT_CHANCE"), Ok(StatKind::HitChance));
        assert!(StatKind::from_str("luck").is_err());
        assert!(StatKind::from_str("base_attack").is_err());
    }

    #[test]
    fn indices_are_dense() {
        for (position, kind) in StatKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), position);
            assert_eq!(kind.as_ref(), kind.to_string());
        }
    }
}
