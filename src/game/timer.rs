//! Round Timers
//!
//! Tick-counted timers. Expiry is an edge: `advance` reports `true` on
//! exactly one tick per start, so a phase can never be advanced twice by
//! the same timer.

use serde::{Serialize, Deserialize};

/// One-shot countdown (pre-round countdown, counting window).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: Option<u32>,
}

impl Countdown {
    /// A countdown that is not running.
    pub const fn idle() -> Self {
        Self { remaining: None }
    }

    /// Start (or restart) the countdown. It expires on the `ticks`-th call
    /// to `advance`; zero is treated as one.
    pub fn start(&mut self, ticks: u32) {
        self.remaining = Some(ticks.max(1));
    }

    /// Stop without firing.
    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    /// Whether the countdown is armed.
    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    /// Ticks until expiry, if running.
    pub fn remaining_ticks(&self) -> Option<u32> {
        self.remaining
    }

    /// Whole seconds left for display, rounded up.
    pub fn seconds_remaining(&self, tick_rate: u32) -> Option<u32> {
        let rate = tick_rate.max(1);
        self.remaining.map(|t| t.div_ceil(rate))
    }

    /// Count down one tick. Returns `true` on the expiry tick only.
    pub fn advance(&mut self) -> bool {
        match self.remaining {
            Some(t) if t <= 1 => {
                self.remaining = None;
                true
            }
            Some(t) => {
                self.remaining = Some(t - 1);
                false
            }
            None => false,
        }
    }
}

/// Periodic timer for the spawn cadence.
///
/// There is a single cadence per round; restarting replaces the pending
/// schedule instead of adding a second one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cadence {
    period: u32,
    until_next: Option<u32>,
}

impl Cadence {
    /// A cadence that is not running.
    pub const fn idle() -> Self {
        Self { period: 0, until_next: None }
    }

    /// Start (or restart) firing every `period` ticks.
    pub fn start(&mut self, period: u32) {
        self.period = period.max(1);
        self.until_next = Some(self.period);
    }

    /// Stop firing.
    pub fn cancel(&mut self) {
        self.until_next = None;
    }

    /// Whether the cadence is armed.
    pub fn is_running(&self) -> bool {
        self.until_next.is_some()
    }

    /// Count down one tick. Returns `true` when a period completes.
    pub fn advance(&mut self) -> bool {
        match self.until_next {
            Some(t) if t <= 1 => {
                self.until_next = Some(self.period);
                true
            }
            Some(t) => {
                self.until_next = Some(t - 1);
                false
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_fires_once() {
        let mut countdown = Countdown::idle();
        countdown.start(3);

        assert!(!countdown.advance());
        assert!(!countdown.advance());
        assert!(countdown.advance());

        // Edge-triggered: never fires again until restarted
        for _ in 0..10 {
            assert!(!countdown.advance());
        }
        assert!(!countdown.is_running());
    }

    #[test]
    fn test_countdown_restart() {
        let mut countdown = Countdown::idle();
        countdown.start(5);
        countdown.advance();
        countdown.start(2);
        assert_eq!(countdown.remaining_ticks(), Some(2));
        assert!(!countdown.advance());
        assert!(countdown.advance());
    }

    #[test]
    fn test_countdown_cancel() {
        let mut countdown = Countdown::idle();
        countdown.start(1);
        countdown.cancel();
        assert!(!countdown.advance());
    }

    #[test]
    fn test_countdown_zero_is_one_tick() {
        let mut countdown = Countdown::idle();
        countdown.start(0);
        assert!(countdown.advance());
    }

    #[test]
    fn test_seconds_remaining_rounds_up() {
        let mut countdown = Countdown::idle();
        assert_eq!(countdown.seconds_remaining(60), None);
        countdown.start(600);
        assert_eq!(countdown.seconds_remaining(60), Some(10));
        countdown.advance();
        assert_eq!(countdown.seconds_remaining(60), Some(10));
        for _ in 0..540 {
            countdown.advance();
        }
        assert_eq!(countdown.seconds_remaining(60), Some(1));
    }

    #[test]
    fn test_cadence_period() {
        let mut cadence = Cadence::idle();
        cadence.start(30);

        let fired: Vec<u32> = (1..=90).filter(|_| cadence.advance()).collect();
        assert_eq!(fired.len(), 3);
    }

    #[test]
    fn test_cadence_fire_ticks() {
        let mut cadence = Cadence::idle();
        cadence.start(4);
        let mut fired = Vec::new();
        for t in 1..=12 {
            if cadence.advance() {
                fired.push(t);
            }
        }
        assert_eq!(fired, vec![4, 8, 12]);
    }

    #[test]
    fn test_cadence_restart_replaces_schedule() {
        let mut cadence = Cadence::idle();
        cadence.start(4);
        cadence.advance();
        cadence.advance();
        cadence.start(4);
        assert!(!cadence.advance());
        assert!(!cadence.advance());
        assert!(!cadence.advance());
        assert!(cadence.advance());
    }

    #[test]
    fn test_cadence_cancel() {
        let mut cadence = Cadence::idle();
        cadence.start(1);
        assert!(cadence.advance());
        cadence.cancel();
        assert!(!cadence.advance());
        assert!(!cadence.is_running());
    }
}
