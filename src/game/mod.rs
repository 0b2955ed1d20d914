//! Game Logic Module
//!
//! All round simulation code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `shape`: Shape kinds, colors and bouncing motion
//! - `target`: The wanted (kind, color) pair and its localized text
//! - `timer`: Tick-counted countdown and cadence timers
//! - `buzzer`: Buzzer events, seat map, held buttons
//! - `score`: Score sink contract and in-memory scoreboard
//! - `render`: Render surface contract
//! - `state`: Round state machine
//! - `tick`: Simulation step and replay
//! - `events`: Game events for views and replay verification

pub mod shape;
pub mod target;
pub mod timer;
pub mod buzzer;
pub mod score;
pub mod render;
pub mod state;
pub mod tick;
pub mod events;

// Re-export key types
pub use buzzer::{BuzzerEvent, BuzzerId, BuzzerButton, BuzzerMap, PlayerSlot};
pub use render::{RenderSurface, RecordingSurface, render_frame};
pub use score::{ScoreOutcome, ScoreSink, Scoreboard};
pub use state::{RoundState, RoundPhase, RoundConfig, RoundOutcome, RoundSnapshot};
pub use tick::{TickResult, InputLog, tick, replay_session};
pub use events::{GameEvent, GameEventData};
