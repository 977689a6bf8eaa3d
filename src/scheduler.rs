#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Looping,
    Stopped,
}

/// Decides whether the host should keep requesting frames.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    state: LoopState,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            state: LoopState::Stopped,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_looping(&self) -> bool {
        self.state == LoopState::Looping
    }

    pub fn start(&mut self) {
        if self.state == LoopState::Stopped {
            log::debug!("Frame loop started");
            self.state = LoopState::Looping;
        }
    }

    /// Stops the loop once nothing is left to animate. Never stops while
    /// fireworks are in flight or a celebration is running.
    pub fn settle(&mut self, idle: bool, celebrating: bool) {
        if self.state == LoopState::Looping && idle && !celebrating {
            log::debug!("Frame loop stopped");
            self.state = LoopState::Stopped;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_stopped() {
        assert_eq!(FrameScheduler::new().state(), LoopState::Stopped);
    }

    #[test]
    fn stays_looping_while_busy() {
        let mut scheduler = FrameScheduler::new();
        scheduler.start();
        scheduler.settle(false, false);
        assert!(scheduler.is_looping());
        scheduler.settle(true, true);
        assert!(scheduler.is_looping());
        scheduler.settle(true, false);
        assert_eq!(scheduler.state(), LoopState::Stopped);
    }

    #[test]
    fn start_is_idempotent() {
        let mut scheduler = FrameScheduler::new();
        scheduler.start();
        scheduler.start();
        assert!(scheduler.is_looping());
    }
}
