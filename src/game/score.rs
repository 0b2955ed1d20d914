//! Score Reporting
//!
//! The round engine only emits point deltas; whoever owns the match
//! standings implements [`ScoreSink`].

use serde::{Serialize, Deserialize};

use crate::game::buzzer::PlayerSlot;

/// Receiver of per-round point changes. Fire-and-forget.
pub trait ScoreSink {
    /// The player's tally matched the true count.
    fn increase_point(&mut self, player: PlayerSlot);

    /// The player's tally was wrong.
    fn decrease_point(&mut self, player: PlayerSlot);
}

impl<S: ScoreSink + ?Sized> ScoreSink for &mut S {
    fn increase_point(&mut self, player: PlayerSlot) {
        (**self).increase_point(player);
    }

    fn decrease_point(&mut self, player: PlayerSlot) {
        (**self).decrease_point(player);
    }
}

impl<S: ScoreSink + ?Sized> ScoreSink for Box<S> {
    fn increase_point(&mut self, player: PlayerSlot) {
        (**self).increase_point(player);
    }

    fn decrease_point(&mut self, player: PlayerSlot) {
        (**self).decrease_point(player);
    }
}

/// Result of comparing one tally with the true count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreOutcome {
    /// Tally was exact, point gained
    Gained,
    /// Tally was off, point lost
    Lost,
}

impl ScoreOutcome {
    /// Judge a tally.
    #[inline]
    pub fn judge(tally: u32, true_count: u32) -> Self {
        if tally == true_count {
            ScoreOutcome::Gained
        } else {
            ScoreOutcome::Lost
        }
    }

    /// Report this outcome for `player` to a sink.
    pub fn report<S: ScoreSink + ?Sized>(self, sink: &mut S, player: PlayerSlot) {
        match self {
            ScoreOutcome::Gained => sink.increase_point(player),
            ScoreOutcome::Lost => sink.decrease_point(player),
        }
    }
}

/// In-memory standings. Points may go negative.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    points: [i32; 2],
    gained: [u32; 2],
    lost: [u32; 2],
}

impl Scoreboard {
    /// Create an empty scoreboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current points of a player.
    pub fn points(&self, player: PlayerSlot) -> i32 {
        self.points[player.index()]
    }

    /// Rounds a player got right.
    pub fn rounds_gained(&self, player: PlayerSlot) -> u32 {
        self.gained[player.index()]
    }

    /// Rounds a player got wrong.
    pub fn rounds_lost(&self, player: PlayerSlot) -> u32 {
        self.lost[player.index()]
    }

    /// Player with more points, `None` on a tie.
    pub fn leader(&self) -> Option<PlayerSlot> {
        let [one, two] = self.points;
        match one.cmp(&two) {
            std::cmp::Ordering::Greater => Some(PlayerSlot::One),
            std::cmp::Ordering::Less => Some(PlayerSlot::Two),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl ScoreSink for Scoreboard {
    fn increase_point(&mut self, player: PlayerSlot) {
        let i = player.index();
        self.points[i] = self.points[i].saturating_add(1);
        self.gained[i] += 1;
    }

    fn decrease_point(&mut self, player: PlayerSlot) {
        let i = player.index();
        self.points[i] = self.points[i].saturating_sub(1);
        self.lost[i] += 1;
    }
}
