//! # Shape Counter
//!
//! Round engine for a two-player observation game: circles and squares in
//! three colors drift across a canvas, a wanted (shape, color) pair is
//! announced, and each player presses their buzzer once per wanted shape
//! they saw. When the counting window closes every tally is compared with
//! the true count and each player gains or loses a point.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SHAPE COUNTER                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── fixed.rs    - Q16.16 fixed-point arithmetic             │
//! │  ├── vec2.rs     - 2D vector with fixed-point                │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── hash.rs     - State hashing for replay checks           │
//! │                                                              │
//! │  game/           - Round engine (deterministic)              │
//! │  ├── shape.rs    - Shape entities and motion                 │
//! │  ├── target.rs   - Wanted target and display text            │
//! │  ├── timer.rs    - Countdowns and spawn cadence              │
//! │  ├── buzzer.rs   - Buzzer events and player mapping          │
//! │  ├── score.rs    - Score sink contract                       │
//! │  ├── render.rs   - Render surface contract                   │
//! │  ├── state.rs    - Round state machine                       │
//! │  └── tick.rs     - Simulation step and replay                │
//! │                                                              │
//! │  session/        - Runtime shell (non-deterministic)         │
//! │  ├── config.rs   - Session configuration                     │
//! │  ├── hub.rs      - Buzzer subscriptions, key bindings        │
//! │  └── runtime.rs  - Tokio game loop with teardown handle      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Phases
//!
//! `Idle -> Starting -> Spawning -> Counting -> Scoring -> Spawning -> ...`
//!
//! The first red buzzer press leaves `Idle`; every later transition is
//! driven by timers. There is no terminal phase.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod session;

// Re-export commonly used types
pub use crate::core::fixed::{Fixed, FIXED_ONE};
pub use crate::core::vec2::FixedVec2;
pub use crate::core::rng::DeterministicRng;
pub use crate::game::buzzer::{BuzzerEvent, BuzzerId, BuzzerButton, PlayerSlot};
pub use crate::game::score::{ScoreSink, Scoreboard};
pub use crate::game::shape::{ShapeEntity, ShapeKind, ShapeColor};
pub use crate::game::state::{RoundState, RoundPhase, RoundConfig};
pub use crate::game::target::{WantedTarget, Locale};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;

/// Shapes spawned per round
pub const MAX_SHAPES: u32 = 60;

/// Ticks between two spawns (0.5 s)
pub const SPAWN_INTERVAL_TICKS: u32 = 30;

/// Pre-round countdown (5 s)
pub const START_COUNTDOWN_TICKS: u32 = 5 * TICK_RATE;

/// Counting window (10 s)
pub const COUNTING_TICKS: u32 = 10 * TICK_RATE;

/// Speed factor given to every spawned shape
pub const SPEED_FACTOR: u32 = 7;
