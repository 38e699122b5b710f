//! The discussion countdown.
//!
//! The countdown does not own a clock. Whoever drives it (the client's ticker,
//! or a test) calls [`DiscussionTimer::tick`] once per second with the token it
//! was handed when the countdown was armed. Restarting or cancelling bumps the
//! generation, so a tick scheduled against an older countdown is reported as
//! [`TimerTick::Stale`] and never fires a transition.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimerToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// The token no longer matches the armed countdown (or nothing is armed).
    Stale,
    Running { remaining: u32 },
    /// Reached zero on this tick. The countdown disarms itself.
    Expired,
}

#[derive(Debug, Clone)]
pub struct DiscussionTimer {
    duration: u32,
    remaining: u32,
    generation: u64,
    armed: bool,
}

impl DiscussionTimer {
    pub fn new(duration: u32) -> Self {
        Self { duration, remaining: duration, generation: 0, armed: false }
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Token of the currently armed countdown, if any.
    pub fn token(&self) -> Option<TimerToken> {
        if self.armed {
            Some(TimerToken(self.generation))
        } else {
            None
        }
    }

    /// Resets to the full duration and arms a fresh countdown.
    pub fn restart(&mut self) -> TimerToken {
        self.generation += 1;
        self.remaining = self.duration;
        self.armed = true;
        TimerToken(self.generation)
    }

    /// Invalidates every outstanding token. The remaining seconds are kept for display.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.armed = false;
    }

    /// Disarmed and back to the full `duration`. The generation keeps counting,
    /// so tokens handed out before the reset stay stale.
    pub fn reset(&mut self, duration: u32) {
        self.cancel();
        self.duration = duration;
        self.remaining = duration;
    }

    pub fn tick(&mut self, token: TimerToken) -> TimerTick {
        if !self.armed || token.0 != self.generation {
            return TimerTick::Stale;
        }

        self.remaining = self.remaining.saturating_sub(1);

        if self.remaining == 0 {
            self.armed = false;
            TimerTick::Expired
        } else {
            TimerTick::Running { remaining: self.remaining }
        }
    }
}

/// `m:ss`, as shown on the discussion screen.
pub fn format_countdown(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_to_expiry_then_goes_stale() {
        let mut timer = DiscussionTimer::new(3);
        let token = timer.restart();

        assert_eq!(timer.tick(token), TimerTick::Running { remaining: 2 });
        assert_eq!(timer.tick(token), TimerTick::Running { remaining: 1 });
        assert_eq!(timer.tick(token), TimerTick::Expired);
        assert_eq!(timer.tick(token), TimerTick::Stale);
        assert!(!timer.is_armed());
    }

    #[test]
    fn cancelled_token_never_fires() {
        let mut timer = DiscussionTimer::new(1);
        let token = timer.restart();
        timer.cancel();

        assert_eq!(timer.tick(token), TimerTick::Stale);
        assert_eq!(timer.remaining(), 1);
        assert_eq!(timer.token(), None);
    }

    #[test]
    fn restart_invalidates_previous_token() {
        let mut timer = DiscussionTimer::new(180);
        let old = timer.restart();
        timer.tick(old);
        let fresh = timer.restart();

        assert_ne!(old, fresh);
        assert_eq!(timer.remaining(), 180);
        assert_eq!(timer.tick(old), TimerTick::Stale);
        assert_eq!(timer.tick(fresh), TimerTick::Running { remaining: 179 });
    }

    #[test]
    fn reset_never_reissues_an_old_token() {
        let mut timer = DiscussionTimer::new(180);
        let old = timer.restart();

        timer.reset(60);
        assert_eq!(timer.token(), None);
        assert_eq!(timer.remaining(), 60);

        let fresh = timer.restart();
        assert_ne!(old, fresh);
        assert_eq!(timer.tick(old), TimerTick::Stale);
        assert_eq!(timer.tick(fresh), TimerTick::Running { remaining: 59 });
    }

    #[test]
    fn countdown_formatting() {
        assert_eq!(format_countdown(180), "3:00");
        assert_eq!(format_countdown(65), "1:05");
        assert_eq!(format_countdown(9), "0:09");
    }
}
