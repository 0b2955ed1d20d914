//! Round Simulation Tick
//!
//! One call per 1/60 s. Fully deterministic given the seed and the
//! buzzer events fed in, so a recorded session can be replayed and its
//! hash compared.

use std::collections::BTreeMap;

use crate::game::buzzer::BuzzerEvent;
use crate::game::events::GameEvent;
use crate::game::score::ScoreSink;
use crate::game::state::{RoundOutcome, RoundState};

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Set when a round was scored this tick
    pub round_completed: Option<RoundOutcome>,
}

/// Recorded buzzer events keyed by the tick they were applied on.
pub type InputLog = BTreeMap<u32, Vec<BuzzerEvent>>;

/// Run one simulation tick.
///
/// Order within a tick:
///
/// 1. Advance the timer owned by the current phase (a timer started
///    during this tick is not advanced until the next one)
/// 2. Apply buffered buzzer events, in arrival order
/// 3. Move shapes
/// 4. Drain events
///
/// A press applied on the tick the counting window closes is therefore
/// too late for that round.
pub fn tick<S: ScoreSink + ?Sized>(
    state: &mut RoundState,
    inputs: &[BuzzerEvent],
    sink: &mut S,
) -> TickResult {
    let mut result = TickResult::default();

    if state.is_torn_down() {
        result.events = state.take_events();
        return result;
    }

    // 0. Advance tick counter
    state.begin_tick();

    // 1. Timers
    result.round_completed = state.advance_timers(sink);

    // 2. Buzzers
    for event in inputs {
        state.handle_buzzer(event);
    }

    // 3. Motion
    state.update_shapes();

    // Collect events
    result.events = state.take_events();

    result
}

/// Replay a session from recorded inputs.
///
/// Returns the final state and every event emitted on the way.
pub fn replay_session<S: ScoreSink + ?Sized>(
    initial_state: RoundState,
    inputs: &InputLog,
    tick_count: u32,
    sink: &mut S,
) -> (RoundState, Vec<GameEvent>) {
    let mut state = initial_state;
    let mut all_events = Vec::new();

    for _ in 0..tick_count {
        if state.is_torn_down() {
            break;
        }
        let next = state.tick().wrapping_add(1);
        let tick_inputs = inputs.get(&next).map(Vec::as_slice).unwrap_or(&[]);

        let result = tick(&mut state, tick_inputs, sink);
        all_events.extend(result.events);
    }

    (state, all_events)
}
