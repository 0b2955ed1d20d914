//! Round State Machine
//!
//! Owns everything a round needs: phase, wanted target, shapes, tallies and
//! the three timers. Every transition has exactly one entry point, and each
//! entry point checks the phase it starts from, so a stray or repeated call
//! is a no-op rather than a double advance.

use std::fmt;
use serde::{Serialize, Deserialize};
use tracing::trace;

use crate::core::fixed::{Fixed, SHAPE_SIZE};
use crate::core::hash::{StateHash, compute_state_hash};
use crate::core::rng::DeterministicRng;
use crate::game::buzzer::{BuzzerEvent, BuzzerMap, BuzzerPanel, PlayerSlot};
use crate::game::events::GameEvent;
use crate::game::score::{ScoreOutcome, ScoreSink};
use crate::game::shape::{CanvasBounds, ShapeEntity, ShapeKind, ShapeColor};
use crate::game::target::{Locale, WantedTarget};
use crate::game::timer::{Cadence, Countdown};
use crate::{
    COUNTING_TICKS, MAX_SHAPES, SPAWN_INTERVAL_TICKS, SPEED_FACTOR,
    START_COUNTDOWN_TICKS, TICK_RATE,
};

// =============================================================================
// ROUND PHASE
// =============================================================================

/// Phase of the round cycle.
///
/// `Idle -> Starting` happens once; afterwards the engine cycles
/// `Spawning -> Counting -> Scoring -> Spawning` until torn down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RoundPhase {
    /// Waiting for the first red press
    #[default]
    Idle = 0,
    /// Pre-round countdown
    Starting = 1,
    /// Shapes appear on a fixed cadence
    Spawning = 2,
    /// Players tally presses
    Counting = 3,
    /// Tallies are compared and reported
    Scoring = 4,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundPhase::Idle => "idle",
            RoundPhase::Starting => "starting",
            RoundPhase::Spawning => "spawning",
            RoundPhase::Counting => "counting",
            RoundPhase::Scoring => "scoring",
        };
        f.write_str(name)
    }
}

// =============================================================================
// ROUND CONFIG
// =============================================================================

/// Parameters of a round.
///
/// Always the fixed game constants outside this crate; the fields are
/// crate-visible so unit tests can shorten the timings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundConfig {
    pub(crate) canvas: CanvasBounds,
    pub(crate) shape_size: Fixed,
    pub(crate) max_shapes: u32,
    pub(crate) spawn_interval_ticks: u32,
    pub(crate) start_countdown_ticks: u32,
    pub(crate) counting_ticks: u32,
    pub(crate) speed_factor: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasBounds::default(),
            shape_size: SHAPE_SIZE,
            max_shapes: MAX_SHAPES,
            spawn_interval_ticks: SPAWN_INTERVAL_TICKS,
            start_countdown_ticks: START_COUNTDOWN_TICKS,
            counting_ticks: COUNTING_TICKS,
            speed_factor: SPEED_FACTOR,
        }
    }
}

impl RoundConfig {
    /// Drawable area.
    pub fn canvas(&self) -> CanvasBounds {
        self.canvas
    }

    /// Shapes spawned per round.
    pub fn max_shapes(&self) -> u32 {
        self.max_shapes
    }

    /// Length of the spawning phase in ticks.
    pub fn spawning_ticks(&self) -> u32 {
        self.max_shapes.saturating_mul(self.spawn_interval_ticks)
    }

    /// Length of the counting window in ticks.
    pub fn counting_ticks(&self) -> u32 {
        self.counting_ticks
    }
}

// =============================================================================
// ROUND OUTCOME / SNAPSHOT
// =============================================================================

/// How a finished round was judged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// Round number (1-based)
    pub round: u32,
    /// Target that was counted
    pub wanted: WantedTarget,
    /// Matching shapes actually spawned
    pub true_count: u32,
    /// Final tallies, indexed by seat
    pub tallies: [u32; 2],
    /// Verdicts, indexed by seat
    pub outcomes: [ScoreOutcome; 2],
}

impl RoundOutcome {
    /// Verdict for one player.
    pub fn outcome(&self, player: PlayerSlot) -> ScoreOutcome {
        self.outcomes[player.index()]
    }

    /// Final tally of one player.
    pub fn tally(&self, player: PlayerSlot) -> u32 {
        self.tallies[player.index()]
    }
}

/// Read-only view for presentation layers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RoundSnapshot {
    /// Current tick
    pub tick: u32,
    /// Current phase
    pub phase: RoundPhase,
    /// Round in progress (0 before the first spawn)
    pub round: u32,
    /// Rounds scored so far
    pub rounds_completed: u32,
    /// Active wanted target
    pub wanted: Option<WantedTarget>,
    /// Localized wanted text
    pub wanted_text: Option<String>,
    /// Tallies, indexed by seat
    pub tallies: [u32; 2],
    /// Shapes on the canvas
    pub shapes_on_canvas: usize,
    /// Seconds left on the visible countdown
    pub countdown_seconds: Option<u32>,
    /// Whether presses are being counted
    pub counting_enabled: bool,
    /// Result of the previous round
    pub last_outcome: Option<RoundOutcome>,
    /// Engine torn down
    pub torn_down: bool,
}

// =============================================================================
// ROUND STATE
// =============================================================================

/// Complete state of a shape counter session.
#[derive(Clone, Debug)]
pub struct RoundState {
    tick: u32,
    phase: RoundPhase,
    rng_seed: u64,
    rng: DeterministicRng,
    config: RoundConfig,

    /// Start guard: the idle edge fires once
    started: bool,
    wanted: Option<WantedTarget>,

    shapes: Vec<ShapeEntity>,
    /// Shapes spawned this round (also the next shape id)
    spawned: u32,
    tallies: [u32; 2],
    round: u32,
    rounds_completed: u32,
    last_outcome: Option<RoundOutcome>,

    start_countdown: Countdown,
    spawn_cadence: Cadence,
    counting_countdown: Countdown,

    buzzers: BuzzerPanel,
    torn_down: bool,

    pending_events: Vec<GameEvent>,
}

impl RoundState {
    /// Create an idle session with the default buzzer map.
    pub fn new(config: RoundConfig, rng_seed: u64) -> Self {
        Self::with_buzzers(config, rng_seed, BuzzerMap::default())
    }

    /// Create an idle session with a custom buzzer map.
    pub fn with_buzzers(config: RoundConfig, rng_seed: u64, buzzers: BuzzerMap) -> Self {
        Self {
            tick: 0,
            phase: RoundPhase::Idle,
            rng_seed,
            rng: DeterministicRng::new(rng_seed),
            config,
            started: false,
            wanted: None,
            shapes: Vec::new(),
            spawned: 0,
            tallies: [0; 2],
            round: 0,
            rounds_completed: 0,
            last_outcome: None,
            start_countdown: Countdown::idle(),
            spawn_cadence: Cadence::idle(),
            counting_countdown: Countdown::idle(),
            buzzers: BuzzerPanel::new(buzzers),
            torn_down: false,
            pending_events: Vec::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current tick.
    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Current phase.
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Seed the session was created with.
    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Round parameters.
    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Whether the first press has happened.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Active wanted target (`None` while idle).
    pub fn wanted(&self) -> Option<WantedTarget> {
        self.wanted
    }

    /// Shapes currently on the canvas.
    pub fn shapes(&self) -> &[ShapeEntity] {
        &self.shapes
    }

    /// Shapes spawned so far this round.
    pub fn spawned_count(&self) -> u32 {
        self.spawned
    }

    /// A player's tally for the current round.
    pub fn tally(&self, player: PlayerSlot) -> u32 {
        self.tallies[player.index()]
    }

    /// Round in progress (0 before the first spawn).
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Rounds scored so far.
    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    /// Result of the most recent round.
    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.last_outcome.as_ref()
    }

    /// Buzzer panel (held buttons and seat map).
    pub fn buzzers(&self) -> &BuzzerPanel {
        &self.buzzers
    }

    /// Whether presses are currently counted.
    pub fn is_counting_enabled(&self) -> bool {
        self.phase == RoundPhase::Counting && !self.torn_down
    }

    /// Whether the engine has been torn down.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Whether the spawn cadence is armed.
    pub fn is_spawn_timer_active(&self) -> bool {
        self.spawn_cadence.is_running()
    }

    /// Matching shapes on the canvas right now.
    pub fn true_count(&self) -> u32 {
        match self.wanted {
            Some(target) => self.shapes.iter().filter(|s| s.matches(&target)).count() as u32,
            None => 0,
        }
    }

    /// Seconds left on the countdown shown for the current phase.
    pub fn countdown_seconds(&self) -> Option<u32> {
        match self.phase {
            RoundPhase::Starting => self.start_countdown.seconds_remaining(TICK_RATE),
            RoundPhase::Counting => self.counting_countdown.seconds_remaining(TICK_RATE),
            _ => None,
        }
    }

    /// Localized wanted text, e.g. "roten Kreise".
    pub fn wanted_text(&self, locale: Locale) -> Option<String> {
        self.wanted.map(|t| t.display_text(locale))
    }

    /// Presentation snapshot.
    pub fn snapshot(&self, locale: Locale) -> RoundSnapshot {
        RoundSnapshot {
            tick: self.tick,
            phase: self.phase,
            round: self.round,
            rounds_completed: self.rounds_completed,
            wanted: self.wanted,
            wanted_text: self.wanted_text(locale),
            tallies: self.tallies,
            shapes_on_canvas: self.shapes.len(),
            countdown_seconds: self.countdown_seconds(),
            counting_enabled: self.is_counting_enabled(),
            last_outcome: self.last_outcome.clone(),
            torn_down: self.torn_down,
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Feed one buzzer event.
    ///
    /// The first red press starts the game; red presses during `Counting`
    /// add one to the presser's tally. Everything else only updates the
    /// held-button state.
    pub fn handle_buzzer(&mut self, event: &BuzzerEvent) {
        if self.torn_down {
            return;
        }
        let Some(player) = self.buzzers.apply(event) else {
            return;
        };

        if !self.started {
            self.start_game(player);
        }

        if self.phase == RoundPhase::Counting {
            let tally = &mut self.tallies[player.index()];
            *tally = tally.saturating_add(1);
            let tally = *tally;
            self.push_event(GameEvent::tally_incremented(self.tick, player, tally));
        }
    }

    /// Advance the timer owned by the current phase by one tick and run
    /// whatever transition it triggers. Returns the outcome if a round was
    /// scored.
    pub fn advance_timers<S: ScoreSink + ?Sized>(&mut self, sink: &mut S) -> Option<RoundOutcome> {
        if self.torn_down {
            return None;
        }
        match self.phase {
            RoundPhase::Starting => {
                if self.start_countdown.advance() {
                    self.on_start_countdown_elapsed();
                }
            }
            RoundPhase::Spawning => {
                if self.spawn_cadence.advance() {
                    self.on_spawn_due();
                }
            }
            RoundPhase::Counting => {
                if self.counting_countdown.advance() {
                    return self.on_counting_elapsed(sink);
                }
            }
            RoundPhase::Idle | RoundPhase::Scoring => {}
        }
        None
    }

    /// `Starting -> Spawning`.
    pub fn on_start_countdown_elapsed(&mut self) {
        if self.torn_down || self.phase != RoundPhase::Starting {
            return;
        }
        self.enter_spawning();
    }

    /// Spawn cadence fired. Spawns one shape and, once the round's quota
    /// is reached, moves to `Counting`.
    pub fn on_spawn_due(&mut self) {
        if self.torn_down || self.phase != RoundPhase::Spawning {
            return;
        }

        if self.spawned < self.config.max_shapes {
            self.spawn_shape();
        }

        if self.spawned >= self.config.max_shapes {
            self.spawn_cadence.cancel();
            self.set_phase(RoundPhase::Counting);
            self.counting_countdown.start(self.config.counting_ticks);
        }
    }

    /// `Counting -> Scoring -> Spawning`.
    ///
    /// Closes the counting window, judges both players independently
    /// against the shapes on the canvas, reports to `sink`, rolls a new
    /// target and starts the next round.
    pub fn on_counting_elapsed<S: ScoreSink + ?Sized>(&mut self, sink: &mut S) -> Option<RoundOutcome> {
        if self.torn_down || self.phase != RoundPhase::Counting {
            return None;
        }
        let wanted = self.wanted?;

        self.counting_countdown.cancel();
        self.set_phase(RoundPhase::Scoring);

        let true_count = self.true_count();
        let tallies = self.tallies;
        let mut outcomes = [ScoreOutcome::Lost; 2];

        for player in PlayerSlot::ALL {
            let tally = tallies[player.index()];
            let outcome = ScoreOutcome::judge(tally, true_count);
            outcome.report(sink, player);
            outcomes[player.index()] = outcome;
            self.push_event(GameEvent::player_scored(self.tick, player, tally, true_count, outcome));
        }

        self.push_event(GameEvent::round_completed(self.tick, self.round, true_count));
        self.rounds_completed += 1;

        let outcome = RoundOutcome {
            round: self.round,
            wanted,
            true_count,
            tallies,
            outcomes,
        };
        self.last_outcome = Some(outcome.clone());

        self.roll_wanted();
        self.enter_spawning();

        Some(outcome)
    }

    /// Integrate one tick of motion for every shape.
    pub fn update_shapes(&mut self) {
        let bounds = self.config.canvas;
        for shape in &mut self.shapes {
            shape.update(&bounds);
        }
    }

    /// Stop the engine: cancel every timer and ignore all further input.
    ///
    /// Returns `false` if it was already torn down.
    pub fn teardown(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.torn_down = true;
        self.start_countdown.cancel();
        self.spawn_cadence.cancel();
        self.counting_countdown.cancel();
        self.buzzers.release_all();
        self.push_event(GameEvent::torn_down(self.tick));
        true
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// `Idle -> Starting`. Guarded by `started`.
    fn start_game(&mut self, player: PlayerSlot) {
        self.started = true;
        self.push_event(GameEvent::game_started(self.tick, player));
        self.roll_wanted();
        self.set_phase(RoundPhase::Starting);
        self.start_countdown.start(self.config.start_countdown_ticks);
    }

    /// Reset the per-round state and (re)arm the single spawn cadence.
    fn enter_spawning(&mut self) {
        self.start_countdown.cancel();
        self.counting_countdown.cancel();

        self.shapes.clear();
        self.spawned = 0;
        self.tallies = [0; 2];
        self.round += 1;

        self.set_phase(RoundPhase::Spawning);
        self.spawn_cadence.start(self.config.spawn_interval_ticks);
    }

    fn spawn_shape(&mut self) {
        let id = self.spawned;
        let kind = ShapeKind::random(&mut self.rng);
        let color = ShapeColor::random(&mut self.rng);
        let shape = ShapeEntity::spawn(
            id,
            kind,
            color,
            self.config.speed_factor,
            self.config.shape_size,
            &self.config.canvas,
            &mut self.rng,
        );

        let wanted = self.wanted.is_some_and(|t| shape.matches(&t));
        if wanted {
            trace!(round = self.round, shape_id = id, "wanted shape spawned");
        }

        self.shapes.push(shape);
        self.spawned += 1;
        self.push_event(GameEvent::shape_spawned(self.tick, id, kind, color, wanted));
    }

    fn roll_wanted(&mut self) {
        let target = WantedTarget::roll(&mut self.rng);
        self.wanted = Some(target);
        self.push_event(GameEvent::wanted_target_rolled(self.tick, target));
    }

    fn set_phase(&mut self, to: RoundPhase) {
        let from = self.phase;
        self.phase = to;
        self.push_event(GameEvent::phase_changed(self.tick, from, to));
    }

    pub(crate) fn begin_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Compute hash of current state for replay verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.rng_seed, |hasher| {
            hasher.update_u8(self.phase as u8);
            hasher.update_bool(self.started);
            hasher.update_bool(self.torn_down);

            match self.wanted {
                Some(target) => {
                    hasher.update_bool(true);
                    hasher.update_u8(target.kind as u8);
                    hasher.update_u8(target.color as u8);
                }
                None => hasher.update_bool(false),
            }

            hasher.update_u32(self.round);
            hasher.update_u32(self.rounds_completed);
            hasher.update_u32(self.spawned);
            for tally in self.tallies {
                hasher.update_u32(tally);
            }

            for shape in &self.shapes {
                shape.hash_into(hasher);
            }
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    #[cfg(test)]
    pub(crate) fn force_round(&mut self, wanted: WantedTarget, shapes: Vec<ShapeEntity>) {
        self.wanted = Some(wanted);
        self.spawned = shapes.len() as u32;
        self.shapes = shapes;
    }
}

// =============================================================================
// TESTS
// =============================================================================
