//! Game Events
//!
//! Everything the round engine does is mirrored as an event so views,
//! logs and replay checks can follow along without touching state.

use serde::{Serialize, Deserialize};

use crate::game::buzzer::PlayerSlot;
use crate::game::score::ScoreOutcome;
use crate::game::shape::{ShapeKind, ShapeColor};
use crate::game::state::RoundPhase;
use crate::game::target::WantedTarget;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// First red press left the idle phase
    GameStarted {
        started_by: PlayerSlot,
    },

    /// Phase transition
    PhaseChanged {
        from: RoundPhase,
        to: RoundPhase,
    },

    /// A new wanted target is active
    WantedTargetRolled {
        target: WantedTarget,
    },

    /// Shape added to the canvas
    ShapeSpawned {
        shape_id: u32,
        kind: ShapeKind,
        color: ShapeColor,
        wanted: bool,
    },

    /// A press was counted
    TallyIncremented {
        player: PlayerSlot,
        tally: u32,
    },

    /// A player's tally was judged
    PlayerScored {
        player: PlayerSlot,
        tally: u32,
        true_count: u32,
        outcome: ScoreOutcome,
    },

    /// Scoring finished for a round
    RoundCompleted {
        round: u32,
        true_count: u32,
    },

    /// The engine was torn down
    TornDown,
}

/// A game event stamped with the tick it happened on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Player involved, if any
    pub player: Option<PlayerSlot>,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, data: GameEventData) -> Self {
        let player = match &data {
            GameEventData::GameStarted { started_by } => Some(*started_by),
            GameEventData::TallyIncremented { player, .. } => Some(*player),
            GameEventData::PlayerScored { player, .. } => Some(*player),
            _ => None,
        };

        Self { tick, player, data }
    }

    /// Create game started event.
    pub fn game_started(tick: u32, started_by: PlayerSlot) -> Self {
        Self::new(tick, GameEventData::GameStarted { started_by })
    }

    /// Create phase changed event.
    pub fn phase_changed(tick: u32, from: RoundPhase, to: RoundPhase) -> Self {
        Self::new(tick, GameEventData::PhaseChanged { from, to })
    }

    /// Create wanted target rolled event.
    pub fn wanted_target_rolled(tick: u32, target: WantedTarget) -> Self {
        Self::new(tick, GameEventData::WantedTargetRolled { target })
    }

    /// Create shape spawned event.
    pub fn shape_spawned(
        tick: u32,
        shape_id: u32,
        kind: ShapeKind,
        color: ShapeColor,
        wanted: bool,
    ) -> Self {
        Self::new(
            tick,
            GameEventData::ShapeSpawned { shape_id, kind, color, wanted },
        )
    }

    /// Create tally incremented event.
    pub fn tally_incremented(tick: u32, player: PlayerSlot, tally: u32) -> Self {
        Self::new(tick, GameEventData::TallyIncremented { player, tally })
    }

    /// Create player scored event.
    pub fn player_scored(
        tick: u32,
        player: PlayerSlot,
        tally: u32,
        true_count: u32,
        outcome: ScoreOutcome,
    ) -> Self {
        Self::new(
            tick,
            GameEventData::PlayerScored { player, tally, true_count, outcome },
        )
    }

    /// Create round completed event.
    pub fn round_completed(tick: u32, round: u32, true_count: u32) -> Self {
        Self::new(tick, GameEventData::RoundCompleted { round, true_count })
    }

    /// Create torn down event.
    pub fn torn_down(tick: u32) -> Self {
        Self::new(tick, GameEventData::TornDown)
    }
}
