//! Turns score events into spawn decisions.
//!
//! The controller is armed by a qualifying score and disarmed by any other
//! score. What arming means depends on the policy: a single firework per
//! qualifying streak, or a celebration that keeps launching fireworks until
//! the score stops qualifying.

use crate::score::ScoreEvent;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerPolicy {
    /// One firework per qualifying streak.
    SingleShot,
    /// Keep launching fireworks while the score stays perfect.
    Continuous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Idle,
    Armed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerCommand {
    /// Nothing changes.
    None,
    /// Launch one firework now.
    Spawn,
    StartCelebration,
    StopCelebration,
    /// The guard was reset without anything to stop.
    Rearm,
}

#[derive(Debug, Clone)]
pub struct TriggerController {
    policy: TriggerPolicy,
    state: TriggerState,
}

impl TriggerController {
    pub fn new(policy: TriggerPolicy) -> Self {
        Self {
            policy,
            state: TriggerState::Idle,
        }
    }

    pub fn policy(&self) -> TriggerPolicy {
        self.policy
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// True once a single-shot has fired for the current streak.
    pub fn is_triggered(&self) -> bool {
        self.policy == TriggerPolicy::SingleShot && self.state == TriggerState::Armed
    }

    pub fn is_celebrating(&self) -> bool {
        self.policy == TriggerPolicy::Continuous && self.state == TriggerState::Armed
    }

    pub fn on_score(&mut self, event: &ScoreEvent) -> TriggerCommand {
        let qualifying = event.is_qualifying();
        let previous = self.state;
        self.state = if qualifying {
            TriggerState::Armed
        } else {
            TriggerState::Idle
        };

        match (previous, self.state, self.policy) {
            (TriggerState::Idle, TriggerState::Armed, TriggerPolicy::SingleShot) => {
                TriggerCommand::Spawn
            }
            (TriggerState::Idle, TriggerState::Armed, TriggerPolicy::Continuous) => {
                TriggerCommand::StartCelebration
            }
            (TriggerState::Armed, TriggerState::Idle, TriggerPolicy::SingleShot) => {
                TriggerCommand::Rearm
            }
            (TriggerState::Armed, TriggerState::Idle, TriggerPolicy::Continuous) => {
                TriggerCommand::StopCelebration
            }
            _ => TriggerCommand::None,
        }
    }
}
