//! Property tests for the round engine, driven through `tick` with random
//! seeds and buzzer traffic over the standard round timings.

use proptest::prelude::*;

use shape_counter::game::buzzer::{BuzzerButton, BuzzerEvent, BuzzerId, ButtonAction, PlayerSlot};
use shape_counter::game::events::GameEventData;
use shape_counter::game::score::{ScoreOutcome, Scoreboard};
use shape_counter::game::state::{RoundConfig, RoundPhase, RoundState};
use shape_counter::game::tick::{tick, replay_session, InputLog};
use shape_counter::START_COUNTDOWN_TICKS;

/// Long enough for one full round started on tick 1.
const TICKS: u32 = 2800;

fn event_strategy() -> impl Strategy<Value = BuzzerEvent> {
    let button = prop_oneof![
        4 => Just(BuzzerButton::Red),
        1 => Just(BuzzerButton::Blue),
        1 => Just(BuzzerButton::Orange),
        1 => Just(BuzzerButton::Green),
        1 => Just(BuzzerButton::Yellow),
    ];
    let action = prop_oneof![
        3 => Just(ButtonAction::Pressed),
        1 => Just(ButtonAction::Released),
    ];
    (0u8..3, button, action).prop_map(|(buzzer, button, action)| BuzzerEvent {
        buzzer: BuzzerId(buzzer),
        button,
        action,
    })
}

fn log_strategy() -> impl Strategy<Value = InputLog> {
    prop::collection::vec((1u32..TICKS, event_strategy()), 0..200).prop_map(|entries| {
        let mut log = InputLog::new();
        log.insert(1, vec![BuzzerEvent::red_press(BuzzerId(0))]);
        for (at, event) in entries {
            log.entry(at).or_default().push(event);
        }
        log
    })
}

fn inputs_for(log: &InputLog, at: u32) -> Vec<BuzzerEvent> {
    log.get(&at).cloned().unwrap_or_default()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn tallies_change_only_while_counting(
        seed in any::<u64>(),
        log in log_strategy(),
    ) {
        let mut state = RoundState::new(RoundConfig::default(), seed);
        let mut board = Scoreboard::new();

        for at in 1..=TICKS {
            let before = [state.tally(PlayerSlot::One), state.tally(PlayerSlot::Two)];
            let result = tick(&mut state, &inputs_for(&log, at), &mut board);
            let after = [state.tally(PlayerSlot::One), state.tally(PlayerSlot::Two)];

            let grew = after.iter().zip(before.iter()).any(|(a, b)| a > b);
            if grew {
                prop_assert_eq!(state.phase(), RoundPhase::Counting);
            }
            for event in &result.events {
                if let GameEventData::TallyIncremented { .. } = event.data {
                    prop_assert_eq!(state.phase(), RoundPhase::Counting);
                }
            }
        }
    }

    #[test]
    fn target_rerolled_only_on_start_and_after_scoring(
        seed in any::<u64>(),
        log in log_strategy(),
    ) {
        let mut state = RoundState::new(RoundConfig::default(), seed);
        let mut board = Scoreboard::new();

        for at in 1..=TICKS {
            let result = tick(&mut state, &inputs_for(&log, at), &mut board);

            let mut cause_seen = false;
            for event in &result.events {
                match event.data {
                    GameEventData::GameStarted { .. } | GameEventData::RoundCompleted { .. } => {
                        cause_seen = true;
                    }
                    GameEventData::WantedTargetRolled { .. } => {
                        prop_assert!(cause_seen, "reroll at tick {} without start or scoring", at);
                        cause_seen = false;
                    }
                    _ => {}
                }
            }

            if state.phase() == RoundPhase::Counting {
                prop_assert!(state.wanted().is_some());
            }
        }
    }

    #[test]
    fn every_round_judges_both_players(
        seed in any::<u64>(),
        log in log_strategy(),
    ) {
        let mut state = RoundState::new(RoundConfig::default(), seed);
        let mut board = Scoreboard::new();
        let mut rounds = 0u32;
        let mut spawned = Vec::new();

        for at in 1..=TICKS {
            let wanted = state.wanted();
            let result = tick(&mut state, &inputs_for(&log, at), &mut board);

            for event in &result.events {
                match event.data {
                    GameEventData::PhaseChanged { to: RoundPhase::Spawning, .. } => spawned.clear(),
                    GameEventData::ShapeSpawned { kind, color, .. } => spawned.push((kind, color)),
                    GameEventData::RoundCompleted { .. } => {
                        let outcome = result.round_completed.as_ref().expect("outcome with completion event");
                        let matching = spawned
                            .iter()
                            .filter(|&&(kind, color)| {
                                kind == outcome.wanted.kind && color == outcome.wanted.color
                            })
                            .count() as u32;

                        rounds += 1;
                        prop_assert_eq!(Some(outcome.wanted), wanted);
                        prop_assert_eq!(spawned.len() as u32, state.config().max_shapes());
                        prop_assert_eq!(outcome.true_count, matching);
                        for player in PlayerSlot::ALL {
                            let expected = if outcome.tally(player) == matching {
                                ScoreOutcome::Gained
                            } else {
                                ScoreOutcome::Lost
                            };
                            prop_assert_eq!(outcome.outcome(player), expected);
                        }
                    }
                    _ => {}
                }
            }
        }

        prop_assert_eq!(rounds, 1);
        prop_assert_eq!(state.rounds_completed(), rounds);
        for player in PlayerSlot::ALL {
            prop_assert_eq!(board.rounds_gained(player) + board.rounds_lost(player), rounds);
            prop_assert_eq!(
                board.points(player),
                board.rounds_gained(player) as i32 - board.rounds_lost(player) as i32
            );
        }
    }

    #[test]
    fn repeated_start_presses_start_once(
        seed in any::<u64>(),
        extra_presses in prop::collection::vec((0u32..600, 0u8..2), 1..20),
    ) {
        let countdown = START_COUNTDOWN_TICKS;
        let mut log = InputLog::new();
        log.insert(1, vec![BuzzerEvent::red_press(BuzzerId(0))]);
        for (offset, buzzer) in extra_presses {
            // Keep the extra presses inside the countdown
            let at = 1 + offset % countdown;
            log.entry(at).or_default().push(BuzzerEvent::red_press(BuzzerId(buzzer)));
        }

        let mut board = Scoreboard::new();
        let (state, events) = replay_session(
            RoundState::new(RoundConfig::default(), seed),
            &log,
            1 + countdown,
            &mut board,
        );

        let starts = events
            .iter()
            .filter(|e| matches!(e.data, GameEventData::GameStarted { .. }))
            .count();
        let rolls = events
            .iter()
            .filter(|e| matches!(e.data, GameEventData::WantedTargetRolled { .. }))
            .count();
        prop_assert_eq!(starts, 1);
        prop_assert_eq!(rolls, 1);
        prop_assert_eq!(state.phase(), RoundPhase::Spawning);
        prop_assert_eq!(state.round(), 1);
    }

    #[test]
    fn nothing_changes_after_teardown(
        seed in any::<u64>(),
        log in log_strategy(),
        teardown_at in 1u32..TICKS,
    ) {
        let mut state = RoundState::new(RoundConfig::default(), seed);
        let mut board = Scoreboard::new();

        for at in 1..=teardown_at {
            tick(&mut state, &inputs_for(&log, at), &mut board);
        }
        state.teardown();

        let frozen = state.compute_hash();
        let frozen_board = board.clone();
        let tallies = [state.tally(PlayerSlot::One), state.tally(PlayerSlot::Two)];

        for at in teardown_at + 1..=TICKS {
            let mut inputs = inputs_for(&log, at);
            inputs.push(BuzzerEvent::red_press(BuzzerId(0)));
            let result = tick(&mut state, &inputs, &mut board);
            prop_assert!(result.round_completed.is_none());
        }

        prop_assert_eq!(state.compute_hash(), frozen);
        prop_assert_eq!(board, frozen_board);
        prop_assert_eq!([state.tally(PlayerSlot::One), state.tally(PlayerSlot::Two)], tallies);
    }

    #[test]
    fn replay_is_deterministic(
        seed in any::<u64>(),
        log in log_strategy(),
    ) {
        let mut board_a = Scoreboard::new();
        let mut board_b = Scoreboard::new();
        let initial = RoundState::new(RoundConfig::default(), seed);
        let (a, events_a) = replay_session(initial.clone(), &log, TICKS, &mut board_a);
        let (b, events_b) = replay_session(initial, &log, TICKS, &mut board_b);

        prop_assert_eq!(a.compute_hash(), b.compute_hash());
        prop_assert_eq!(events_a, events_b);
        prop_assert_eq!(board_a, board_b);
    }
}
