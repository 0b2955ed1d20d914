//! Shape Counter
//!
//! `shape-counter` runs a headless demo: two scripted players play a few
//! rounds, the session is replayed from its input log and the state
//! hashes are compared.
//!
//! `shape-counter live` runs a real-time session on the keyboard: type
//! `q` (player 1) or `p` (player 2) and press enter to buzz, `quit` to
//! stop.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use shape_counter::{
    TICK_RATE, VERSION,
    game::{
        buzzer::{BuzzerEvent, BuzzerId, PlayerSlot},
        events::GameEventData,
        render::RecordingSurface,
        score::Scoreboard,
        state::{RoundPhase, RoundState},
        tick::{tick, replay_session, InputLog},
    },
    session::{spawn_session, BuzzerHub, KeyBindings, SessionConfig},
};

const DEMO_ROUNDS: u32 = 3;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Shape Counter v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    let config = SessionConfig::from_env().context("loading session config")?;

    match std::env::args().nth(1).as_deref() {
        Some("live") => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("building tokio runtime")?;
            runtime.block_on(live_session(config))
        }
        _ => demo_session(config),
    }
}

/// Headless demo with two scripted players.
///
/// Player 1 always counts correctly. Player 2 over-counts by one on odd
/// rounds.
fn demo_session(config: SessionConfig) -> Result<()> {
    info!("=== Starting Demo Session ===");

    let seed = config.resolve_seed();
    let initial = RoundState::with_buzzers(config.round.clone(), seed, config.buzzers.clone());
    let mut state = initial.clone();
    let mut board = Scoreboard::new();
    let mut log = InputLog::new();

    info!("RNG Seed: {}", seed);

    let p1 = BuzzerEvent::red_press(BuzzerId(0));
    let p2 = BuzzerEvent::red_press(BuzzerId(1));
    let mut answered_round = 0;
    let mut total_events = 0;

    log.insert(1, vec![p1]);

    while state.rounds_completed() < DEMO_ROUNDS {
        let next = state.tick() + 1;

        if state.phase() == RoundPhase::Counting && answered_round != state.round() {
            answered_round = state.round();
            let seen = state.true_count() as usize;
            let extra = (state.round() % 2) as usize;

            let presses = log.entry(next).or_default();
            presses.extend(std::iter::repeat(p1).take(seen));
            presses.extend(std::iter::repeat(p2).take(seen + extra));
        }

        let inputs = log.get(&next).cloned().unwrap_or_default();
        let result = tick(&mut state, &inputs, &mut board);
        total_events += result.events.len();

        for event in &result.events {
            match &event.data {
                GameEventData::WantedTargetRolled { target } => {
                    info!(
                        "Tick {}: count the {}",
                        event.tick,
                        target.display_text(config.locale)
                    );
                }
                GameEventData::PlayerScored { player, tally, true_count, outcome } => {
                    info!(
                        "Tick {}: {} counted {} of {} -> {:?}",
                        event.tick, player, tally, true_count, outcome
                    );
                }
                _ => {}
            }
        }
    }

    info!("=== Session Results ===");
    let hash = state.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    for player in PlayerSlot::ALL {
        info!("{}: {} points", player, board.points(player));
    }
    info!("Total events: {}", total_events);
    println!(
        "{}",
        serde_json::to_string_pretty(&board).context("serializing scoreboard")?
    );

    info!("=== Verifying Determinism ===");
    let mut replay_board = Scoreboard::new();
    let (replayed, _) = replay_session(initial, &log, state.tick(), &mut replay_board);
    let replay_hash = replayed.compute_hash();

    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash && replay_board == board {
        info!("DETERMINISM VERIFIED: Hashes match!");
        Ok(())
    } else {
        anyhow::bail!("replay diverged from live run")
    }
}

/// Real-time session driven by keyboard lines on stdin.
async fn live_session(config: SessionConfig) -> Result<()> {
    let hub = BuzzerHub::default();
    let keys = KeyBindings::default();

    let handle = spawn_session(
        config,
        hub.subscribe(),
        Scoreboard::new(),
        RecordingSurface::new(),
    );
    info!("Session seed {}; press q or p then enter to start", handle.seed());

    let mut snapshots = handle.subscribe_snapshots();
    let printer = tokio::spawn(async move {
        let mut last = (RoundPhase::Idle, None, [0u32; 2]);
        while snapshots.changed().await.is_ok() {
            let snap = snapshots.borrow_and_update().clone();
            let current = (snap.phase, snap.countdown_seconds, snap.tallies);
            if current == last {
                continue;
            }
            last = current;
            match (snap.phase, snap.wanted_text.as_deref()) {
                (RoundPhase::Starting | RoundPhase::Counting, Some(wanted)) => println!(
                    "[{}] {}  {}s  tallies {:?}",
                    snap.phase,
                    wanted,
                    snap.countdown_seconds.unwrap_or(0),
                    snap.tallies
                ),
                _ => println!("[{}] round {}", snap.phase, snap.round),
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        if line.trim() == "quit" {
            break;
        }
        for event in keys.events_for_line(&line) {
            hub.publish(event);
        }
    }

    let report = handle.shutdown().await.context("stopping session")?;
    printer.await.context("snapshot printer")?;

    info!(
        "Played {} rounds in {} frames",
        report.state.rounds_completed(),
        report.surface.frames()
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&report.sink).context("serializing scoreboard")?
    );
    Ok(())
}
