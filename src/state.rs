//! All mutable animation state in one place.
//!
//! The host calls [`AnimationState::handle_message`] for every inbound
//! message and [`AnimationState::tick`] once per frame callback. Both run on
//! the same thread, so a score is always applied in full between ticks.

use crate::color::Rgb;
use crate::config::Config;
use crate::error::Result;
use crate::frame::{Background, Frame};
use crate::scheduler::{FrameScheduler, LoopState};
use crate::score::{ScoreEvent, ScoreState, parse_message};
use crate::simulation::Simulation;
use crate::trigger::{TriggerCommand, TriggerController};

pub struct AnimationState {
    score: ScoreState,
    trigger: TriggerController,
    simulation: Simulation,
    scheduler: FrameScheduler,
    background: Rgb,
    trail_opacity: u8,
}

impl AnimationState {
    /// Fails if `config` does not pass [`Config::validate`].
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            score: ScoreState::default(),
            trigger: TriggerController::new(config.policy),
            simulation: Simulation::new(config)?,
            scheduler: FrameScheduler::new(),
            background: config.background,
            trail_opacity: config.trail_opacity,
        })
    }

    /// Applies one raw host message. Returns the frame to render right away,
    /// or `None` if the message was not a score result.
    pub fn handle_message(&mut self, raw: &str) -> Option<Frame> {
        let event = parse_message(raw)?;
        Some(self.apply_score(event))
    }

    /// Records a score and acts on it. Always returns a frame so the score
    /// text is redrawn even while the loop is stopped.
    pub fn apply_score(&mut self, event: ScoreEvent) -> Frame {
        self.score.apply(event);
        log::info!("Received score {}/{}", event.score, event.max_score);

        match self.trigger.on_score(&event) {
            TriggerCommand::Spawn => {
                self.simulation.spawn();
                self.scheduler.start();
            }
            TriggerCommand::StartCelebration => {
                log::info!("Perfect score, celebration started");
                self.scheduler.start();
            }
            TriggerCommand::StopCelebration => {
                log::info!("Celebration stopped");
            }
            TriggerCommand::Rearm => {
                log::debug!("Trigger re-armed");
            }
            TriggerCommand::None => {}
        }

        self.frame()
    }

    /// Advances the simulation by one frame if the loop is running.
    pub fn tick(&mut self) -> Option<Frame> {
        if !self.scheduler.is_looping() {
            return None;
        }

        let celebrating = self.trigger.is_celebrating();
        self.simulation.advance(celebrating);
        self.scheduler.settle(self.simulation.is_idle(), celebrating);
        Some(self.frame())
    }

    /// Snapshot of what should be on screen now.
    pub fn frame(&self) -> Frame {
        let opacity = if self.simulation.is_idle() {
            255
        } else {
            self.trail_opacity
        };
        Frame {
            background: Background {
                color: self.background,
                opacity,
            },
            drawables: self.simulation.drawables(),
            score: self.score,
            looping: self.scheduler.is_looping(),
        }
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn trigger(&self) -> &TriggerController {
        &self.trigger
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn loop_state(&self) -> LoopState {
        self.scheduler.state()
    }

    pub fn is_looping(&self) -> bool {
        self.scheduler.is_looping()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::TriggerPolicy;

    fn state(policy: TriggerPolicy) -> AnimationState {
        AnimationState::new(&Config {
            policy,
            seed: Some(9),
            ..Config::default()
        })
        .unwrap()
    }

    #[test]
    fn initial_state_is_empty() {
        let state = state(TriggerPolicy::Continuous);
        assert_eq!(*state.score(), ScoreState::default());
        assert_eq!(state.loop_state(), LoopState::Stopped);
        assert!(state.simulation().is_idle());
    }

    #[test]
    fn stopped_loop_does_not_tick() {
        let mut state = state(TriggerPolicy::Continuous);
        assert!(state.tick().is_none());
        assert_eq!(state.simulation().tick_count(), 0);
    }

    #[test]
    fn ignored_message_changes_nothing() {
        let mut state = state(TriggerPolicy::SingleShot);
        assert!(state.handle_message(r#"{"type":"resize"}"#).is_none());
        assert_eq!(*state.score(), ScoreState::default());
        assert!(!state.is_looping());
    }

    #[test]
    fn non_qualifying_score_still_renders() {
        let mut state = state(TriggerPolicy::SingleShot);
        let frame = state
            .handle_message(r#"{"type":"H5P_SCORE_RESULT","score":3,"maxScore":10}"#)
            .unwrap();
        assert_eq!(frame.score.final_score, 3.0);
        assert_eq!(frame.background.opacity, 255);
        assert!(frame.drawables.is_empty());
        assert!(!state.is_looping());
    }

    #[test]
    fn single_shot_spawns_immediately() {
        let mut state = state(TriggerPolicy::SingleShot);
        let frame = state.apply_score(ScoreEvent::new(4.0, 4.0));
        assert_eq!(frame.drawables.len(), 1);
        assert_eq!(frame.background.opacity, 30);
        assert!(state.is_looping());
    }

    #[test]
    fn loop_stops_after_last_firework() {
        let mut state = state(TriggerPolicy::SingleShot);
        state.apply_score(ScoreEvent::new(4.0, 4.0));
        let mut ticks = 0;
        while state.tick().is_some() {
            ticks += 1;
            assert!(ticks < 1000, "loop never stopped");
        }
        assert!(state.simulation().is_idle());
        assert_eq!(state.loop_state(), LoopState::Stopped);
    }

    #[test]
    fn celebration_keeps_looping_when_idle() {
        let mut state = state(TriggerPolicy::Continuous);
        state.apply_score(ScoreEvent::new(10.0, 10.0));
        for _ in 0..500 {
            assert!(state.tick().is_some());
        }
        assert!(state.is_looping());

        state.apply_score(ScoreEvent::new(5.0, 10.0));
        let mut ticks = 0;
        while state.tick().is_some() {
            ticks += 1;
            assert!(ticks < 1000, "loop never stopped");
        }
        assert!(state.simulation().is_idle());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = Config {
            policy: TriggerPolicy::Continuous,
            spawn_interval: 0,
            ..Config::default()
        };
        assert!(AnimationState::new(&config).is_err());
    }

    #[test]
    fn frames_carry_the_loop_flag() {
        let mut state = state(TriggerPolicy::SingleShot);
        assert!(!state.frame().looping);

        let frame = state.apply_score(ScoreEvent::new(4.0, 4.0));
        assert!(frame.looping);

        let mut last = None;
        while let Some(frame) = state.tick() {
            last = Some(frame);
        }
        // The tick that removes the last firework tells the host to stop
        let last = last.unwrap();
        assert!(!last.looping);
        assert!(last.drawables.is_empty());
    }
}
