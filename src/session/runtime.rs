//! Session Runtime
//!
//! Runs one [`RoundState`] on a tokio task at 60 Hz. The task owns the
//! state outright; the outside world talks to it only through the buzzer
//! subscription, the shutdown signal and the snapshot channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, trace};

use crate::game::buzzer::BuzzerEvent;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::render::{render_frame, RenderSurface};
use crate::game::score::ScoreSink;
use crate::game::state::{RoundSnapshot, RoundState};
use crate::game::target::Locale;
use crate::game::tick::tick;
use crate::session::config::SessionConfig;
use crate::TICK_RATE;

/// Session errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session task panicked or was cancelled.
    #[error("Session task failed: {0}")]
    TaskFailed(String),
}

/// What a finished session hands back.
#[derive(Debug)]
pub struct SessionReport<S, R> {
    /// Final round state
    pub state: RoundState,
    /// Score sink, with every reported point
    pub sink: S,
    /// Render surface
    pub surface: R,
}

/// Handle to a running session.
///
/// Dropping the handle tears the session down.
pub struct SessionHandle<S, R> {
    seed: u64,
    torn_down: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
    snapshot_rx: watch::Receiver<RoundSnapshot>,
    task: Option<JoinHandle<SessionReport<S, R>>>,
}

impl<S, R> SessionHandle<S, R> {
    /// Seed the session runs with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Stop the session. Safe to call any number of times.
    pub fn teardown(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        // Err only means the task already exited
        let _ = self.shutdown_tx.send(());
    }

    /// Whether teardown was requested.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> RoundSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// A receiver notified on every published snapshot.
    pub fn subscribe_snapshots(&self) -> watch::Receiver<RoundSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Wait for the task to stop. Does not request teardown itself.
    pub async fn join(mut self) -> Result<SessionReport<S, R>, SessionError> {
        let task = self
            .task
            .take()
            .ok_or_else(|| SessionError::TaskFailed("session already joined".to_string()))?;
        task.await.map_err(|e| SessionError::TaskFailed(e.to_string()))
    }

    /// Tear down and wait for the task.
    pub async fn shutdown(self) -> Result<SessionReport<S, R>, SessionError> {
        self.teardown();
        self.join().await
    }
}

impl<S, R> Drop for SessionHandle<S, R> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Start a session on the current tokio runtime.
pub fn spawn_session<S, R>(
    config: SessionConfig,
    buzzers: mpsc::UnboundedReceiver<BuzzerEvent>,
    sink: S,
    surface: R,
) -> SessionHandle<S, R>
where
    S: ScoreSink + Send + 'static,
    R: RenderSurface + Send + 'static,
{
    let seed = config.resolve_seed();
    let state = RoundState::with_buzzers(config.round.clone(), seed, config.buzzers.clone());

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot(config.locale));

    info!(seed, locale = ?config.locale, "session starting");

    let task = tokio::spawn(run_session(
        state,
        config.locale,
        buzzers,
        shutdown_rx,
        sink,
        surface,
        snapshot_tx,
    ));

    SessionHandle {
        seed,
        torn_down: Arc::new(AtomicBool::new(false)),
        shutdown_tx,
        snapshot_rx,
        task: Some(task),
    }
}

async fn run_session<S, R>(
    mut state: RoundState,
    locale: Locale,
    mut buzzers: mpsc::UnboundedReceiver<BuzzerEvent>,
    mut shutdown_rx: broadcast::Receiver<()>,
    mut sink: S,
    mut surface: R,
    snapshot_tx: watch::Sender<RoundSnapshot>,
) -> SessionReport<S, R>
where
    S: ScoreSink,
    R: RenderSurface,
{
    let tick_duration = Duration::from_micros(1_000_000 / TICK_RATE as u64);
    let mut tick_interval = interval(tick_duration);
    tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Buzzer events wait here until the next tick applies them
    let mut pending: Vec<BuzzerEvent> = Vec::new();
    let mut buzzers_open = true;

    loop {
        tokio::select! {
            biased;

            _ = shutdown_rx.recv() => {
                state.teardown();
                for event in state.take_events() {
                    log_event(&event);
                }
                snapshot_tx.send_replace(state.snapshot(locale));
                break;
            }

            _ = tick_interval.tick() => {
                // Everything queued before this tick is applied on it
                while let Ok(event) = buzzers.try_recv() {
                    pending.push(event);
                }

                let result = tick(&mut state, &pending, &mut sink);
                pending.clear();

                for event in &result.events {
                    log_event(event);
                }
                if let Some(outcome) = &result.round_completed {
                    info!(
                        round = outcome.round,
                        true_count = outcome.true_count,
                        tallies = ?outcome.tallies,
                        outcomes = ?outcome.outcomes,
                        "round scored"
                    );
                }

                render_frame(&mut surface, &state.config().canvas, state.shapes());
                snapshot_tx.send_replace(state.snapshot(locale));
            }

            msg = buzzers.recv(), if buzzers_open => {
                match msg {
                    Some(event) => pending.push(event),
                    None => {
                        debug!("buzzer source closed");
                        buzzers_open = false;
                    }
                }
            }
        }
    }

    info!(
        tick = state.tick(),
        rounds = state.rounds_completed(),
        "session stopped"
    );

    SessionReport { state, sink, surface }
}

fn log_event(event: &GameEvent) {
    match &event.data {
        GameEventData::GameStarted { started_by } => {
            info!(tick = event.tick, %started_by, "game started");
        }
        GameEventData::PhaseChanged { from, to } => {
            debug!(tick = event.tick, %from, %to, "phase changed");
        }
        GameEventData::WantedTargetRolled { target } => {
            info!(tick = event.tick, %target, "wanted target rolled");
        }
        GameEventData::PlayerScored { player, tally, true_count, outcome } => {
            info!(tick = event.tick, %player, tally, true_count, ?outcome, "player scored");
        }
        GameEventData::TornDown => {
            info!(tick = event.tick, "torn down");
        }
        other => {
            trace!(tick = event.tick, event = ?other);
        }
    }
}
