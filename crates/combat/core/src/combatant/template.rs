//! Static combatant configuration.

use crate::action::Action;
use crate::ai::AgentConfig;
use crate::stats::StatBlock;

/// Everything needed to spawn a combatant when an encounter starts.
///
/// The side is not part of the template; it comes from the roster list the
/// template is placed in. A template without stats is rejected at setup.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CombatantTemplate {
    pub name: String,
    pub stats: Option<StatBlock>,
    pub actions: Vec<Action>,
    /// `None` means the combatant is player controlled.
    pub agent: Option<AgentConfig>,
}

impl CombatantTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_stats(mut self, stats: StatBlock) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions.extend(actions);
        self
    }

    pub fn with_agent(mut self, agent: AgentConfig) -> Self {
        self.agent = Some(agent);
        self
    }
}
