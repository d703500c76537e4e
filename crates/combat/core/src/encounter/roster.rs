//! The combatants of one encounter, split into two sides.

use crate::combatant::{Combatant, CombatantId, CombatantTemplate, Side};
use crate::config::CombatConfig;

use super::error::SetupError;

/// All combatants of an encounter in a stable order: players, then enemies.
///
/// A combatant's id is its position in this order.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    combatants: Vec<Combatant>,
}

impl Roster {
    /// Spawns every template. Fails on an empty side or a template without stats.
    pub fn build(
        players: &[CombatantTemplate],
        enemies: &[CombatantTemplate],
        config: &CombatConfig,
    ) -> Result<Self, SetupError> {
        if players.is_empty() {
            return Err(SetupError::EmptyRoster { side: Side::Player });
        }
        if enemies.is_empty() {
            return Err(SetupError::EmptyRoster { side: Side::Enemy });
        }

        let sides = players
            .iter()
            .map(|t| (Side::Player, t))
            .chain(enemies.iter().map(|t| (Side::Enemy, t)));

        let combatants = sides
            .enumerate()
            .map(|(index, (side, template))| {
                Combatant::spawn(CombatantId(index as u32), side, template, config)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { combatants })
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(id.index())
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.combatants.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.combatants.iter().map(Combatant::id)
    }

    /// Combatants on one side, in roster order.
    pub fn side(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(move |c| c.side() == side)
    }

    pub fn players(&self) -> impl Iterator<Item = &Combatant> {
        self.side(Side::Player)
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Combatant> {
        self.side(Side::Enemy)
    }

    pub fn living(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.side(side).filter(|c| c.is_alive())
    }

    pub fn total_health(&self, side: Side) -> i64 {
        self.side(side).map(|c| c.stats().health() as i64).sum()
    }

    /// True once every combatant on `side` has Health ≤ 0.
    pub fn is_side_defeated(&self, side: Side) -> bool {
        self.living(side).next().is_none()
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{BaseStats, StatBlock};

    fn template(name: &str) -> CombatantTemplate {
        CombatantTemplate::new(name).with_stats(StatBlock::new(BaseStats::default()))
    }

    #[test]
    fn ids_follow_players_then_enemies() {
        let roster = Roster::build(
            &[template("a"), template("b")],
            &[template("x")],
            &CombatConfig::default(),
        )
        .unwrap();

        let sides: Vec<(CombatantId, Side)> = roster.iter().map(|c| (c.id(), c.side())).collect();
        assert_eq!(
            sides,
            vec![
                (CombatantId(0), Side::Player),
                (CombatantId(1), Side::Player),
                (CombatantId(2), Side::Enemy),
            ]
        );
        assert_eq!(roster.enemies().count(), 1);
        assert_eq!(roster.total_health(Side::Player), 200);
    }

    #[test]
    fn empty_side_is_rejected() {
        let err = Roster::build(&[template("a")], &[], &CombatConfig::default()).unwrap_err();
        assert_eq!(err, SetupError::EmptyRoster { side: Side::Enemy });
    }

    #[test]
    fn missing_stats_abort_build() {
        let err = Roster::build(
            &[template("a")],
            &[template("x"), CombatantTemplate::new("hollow")],
            &CombatConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SetupError::MissingConfiguration {
                name: "hollow".into()
            }
        );
    }

    #[test]
    fn side_defeat_requires_every_member_down() {
        let mut roster = Roster::build(
            &[template("a")],
            &[template("x"), template("y")],
            &CombatConfig::default(),
        )
        .unwrap();
        roster.get_mut(CombatantId(1)).unwrap().stats_mut().set_health(0);
        assert!(!roster.is_side_defeated(Side::Enemy));
        roster.get_mut(CombatantId(2)).unwrap().stats_mut().set_health(0);
        assert!(roster.is_side_defeated(Side::Enemy));
        assert!(!roster.is_side_defeated(Side::Player));
    }
}
