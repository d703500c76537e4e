//! Step-wise execution of an admitted action.
//!
//! An action's presentation runs across several ticks: a lead-in pause, a
//! move toward the first target, one hit per target with pauses between
//! them, and a move back. [`ActionSequence`] models this as a queue of steps
//! advanced by simulated time, so tests can step through it exactly.

use std::collections::VecDeque;

use crate::combatant::CombatantId;
use crate::config::ActionPacing;

/// One point in an action's execute sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SequenceStep {
    /// Suspend for the given simulated seconds.
    Wait(f32),
    /// Actor starts moving toward a target.
    MoveTo(CombatantId),
    /// Resolve and apply one hit against a target.
    ApplyHit(CombatantId),
    /// Actor returns to its origin.
    MoveBack,
}

impl SequenceStep {
    pub const fn is_wait(&self) -> bool {
        matches!(self, SequenceStep::Wait(_))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionSequence {
    steps: VecDeque<SequenceStep>,
}

impl ActionSequence {
    /// Builds the sequence for the given targets, in the order supplied.
    pub fn new(targets: &[CombatantId], pacing: &ActionPacing) -> Self {
        let mut steps = VecDeque::with_capacity(targets.len() * 2 + 5);

        steps.push_back(SequenceStep::Wait(pacing.lead_in));
        if let Some(&first) = targets.first() {
            steps.push_back(SequenceStep::MoveTo(first));
            steps.push_back(SequenceStep::Wait(pacing.movement));
        }

        for (i, &target) in targets.iter().enumerate() {
            if i > 0 {
                steps.push_back(SequenceStep::Wait(pacing.between_targets));
            }
            steps.push_back(SequenceStep::ApplyHit(target));
        }

        steps.push_back(SequenceStep::MoveBack);
        steps.push_back(SequenceStep::Wait(pacing.movement));

        Self { steps }
    }

    /// Consumes `dt` seconds and returns every non-wait step reached.
    ///
    /// Leftover time after a wait completes carries into the following
    /// steps. Zero-length waits complete even when `dt` is 0.
    pub fn advance(&mut self, dt: f32) -> Vec<SequenceStep> {
        let mut budget = dt.max(0.0);
        let mut fired = Vec::new();

        while let Some(step) = self.steps.front_mut() {
            match step {
                SequenceStep::Wait(remaining) => {
                    if *remaining <= budget {
                        budget -= *remaining;
                        self.steps.pop_front();
                    } else {
                        *remaining -= budget;
                        break;
                    }
                }
                _ => {
                    if let Some(step) = self.steps.pop_front() {
                        fired.push(step);
                    }
                }
            }
        }

        fired
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn remaining_steps(&self) -> usize {
        self.steps.len()
    }
}
