//! Multi-turn integration tests for game mechanics.
//!
//! These tests drive complete games through the public decision protocol and
//! verify the end states: invasion wins, self-bankruptcy, combat, and replay.
//!
//! Run with: `cargo test --release game_integration`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use zonewreck::game::{CombatOutcome, MoveKind, check_invariants};
use zonewreck::replay::{Recording, ReplayEngine};
use zonewreck::runner::DEFAULT_MAX_DECISIONS;
use zonewreck::{
    Color, Coord, Decision, Event, GameConfig, Phase, Rejection, Request, ScriptedSource,
    Session, StatLine, run_game,
};

/// Glass cannon: all attack and reach, no health.
fn raider() -> StatLine {
    StatLine::new(10, 33, 0, 0, 7)
}

/// Two White invasions around one Black placement.
fn invasion_script() -> Vec<Decision> {
    vec![
        // Turn 0: White places and invades immediately
        Decision::place(raider(), 0),
        Decision::Skip,
        Decision::move_piece(Coord::new(7, 0), Coord::new(0, 0)),
        // Turn 1: Black places a defender far away
        Decision::place(StatLine::new(10, 10, 20, 5, 5), 7),
        Decision::Skip,
        Decision::Skip,
        // Turn 2: White invades again
        Decision::place(raider(), 1),
        Decision::Skip,
        Decision::move_piece(Coord::new(7, 1), Coord::new(0, 1)),
    ]
}

fn invasion_config() -> GameConfig {
    GameConfig {
        starting_reserve: 100,
        ..GameConfig::default()
    }
}

#[test]
fn test_invasion_win() {
    let mut source = ScriptedSource::new(invasion_script());
    let result = run_game(invasion_config(), &mut source, DEFAULT_MAX_DECISIONS).unwrap();

    assert_eq!(result.winner, Color::White);
    assert_eq!(result.turns_played, 3);
    // White paid two placements, Black paid one placement and two invasions
    assert_eq!(result.reserves, [100 - 40 - 40, 100 - 40 - 33 - 33]);
    assert_eq!(result.pieces, [2, 1]);
    assert_eq!(result.rejections, 0);
    assert_eq!(result.decisions, invasion_script());
}

#[test]
fn test_game_ends_at_first_exhaustion() {
    let mut session = Session::new(invasion_config()).unwrap();
    let script = invasion_script();
    let (last, rest) = script.split_last().unwrap();

    for &decision in rest {
        session.submit(decision).unwrap();
        assert!(!session.is_over(), "game ended early at {decision:?}");
    }

    let events = session.submit(*last).unwrap();
    assert_eq!(
        events.last(),
        Some(&Event::GameOver {
            winner: Color::White
        })
    );
    assert_eq!(session.phase(), Phase::Finished {
        winner: Color::White
    });
    assert_eq!(session.submit(Decision::Skip), Err(Rejection::GameOver));
}

#[test]
fn test_self_bankruptcy_loses() {
    let config = GameConfig {
        starting_reserve: 30,
        ..GameConfig::default()
    };
    let mut source = ScriptedSource::new(vec![
        Decision::place(StatLine::new(5, 5, 5, 5, 5), 0),
        // Black's turn comes and goes
        Decision::Skip,
        Decision::Skip,
        Decision::Skip,
        Decision::Skip,
        // White overspends on its second turn
        Decision::place(StatLine::new(3, 4, 4, 2, 0), 1),
    ]);

    let result = run_game(config, &mut source, 100).unwrap();
    assert_eq!(result.winner, Color::Black);
    assert_eq!(result.reserves, [0, 30]);
    assert_eq!(result.turns_played, 3);
}

#[test]
fn test_combat_game() {
    let mut session = Session::new(GameConfig::default()).unwrap();

    // White: attack 4, health 10, speed 2, reach across the board
    session
        .submit(Decision::place(StatLine::new(10, 4, 10, 2, 7), 3))
        .unwrap();
    session.submit(Decision::Skip).unwrap();
    session.submit(Decision::Skip).unwrap();

    // Black: attack 3, health 8, speed 1
    session
        .submit(Decision::place(StatLine::new(10, 3, 8, 1, 1), 3))
        .unwrap();
    session.submit(Decision::Skip).unwrap();
    session.submit(Decision::Skip).unwrap();

    session.submit(Decision::Skip).unwrap();
    let events = session
        .submit(Decision::move_piece(Coord::new(7, 3), Coord::new(0, 3)))
        .unwrap();

    let Event::Moved { result, .. } = events[0] else {
        panic!("expected a move event, got {events:?}");
    };
    assert!(matches!(result.kind, MoveKind::Attack { .. }));
    let report = result.combat.unwrap();
    assert_eq!(report.outcome, CombatOutcome::AttackerWins);
    assert_eq!(report.rounds, 2);
    assert_eq!(report.attacker_health, 7);
    assert_eq!(report.defender_health, 0);
    // Combat into the zone never counts as an invasion
    assert!(result.charge.is_none());

    let game = session.game();
    let winner = game.piece_at(Coord::new(0, 3)).unwrap();
    assert_eq!(winner.owner, Color::White);
    assert_eq!(winner.health, 7);
    assert_eq!(game.player(Color::Black).piece_count(), 0);
    // Black paid attack 3 + health 8 + speed 1 + range 1 to place
    assert_eq!(game.player(Color::Black).reserve, 140 - 13);
    assert!(check_invariants(game).is_empty());
}

#[test]
fn test_single_placement_rules() {
    // One placement per turn, every piece rushes forward as far as it can
    let mut bot = |request: &Request| match request {
        Request::Placement { columns, .. } => Some(columns.first().map_or(Decision::Skip, |&c| {
            Decision::place(StatLine::new(4, 6, 4, 2, 4), c)
        })),
        Request::Move { moves, .. } => Some(moves.first().map_or(Decision::Skip, |option| {
            let to = option.to.first().copied().unwrap_or(option.from);
            Decision::move_piece(option.from, to)
        })),
        Request::Finished { .. } => None,
    };
    let config = GameConfig {
        max_placements_per_turn: Some(1),
        ..GameConfig::default()
    };

    let result = run_game(config, &mut bot, DEFAULT_MAX_DECISIONS).unwrap();
    assert_eq!(result.rejections, 0);
    let loser = result.winner.opponent();
    assert!(result.reserves[loser.index()] <= 0);
    assert!(result.reserves[result.winner.index()] > 0);
}

#[test]
fn test_deterministic_results() {
    let first = run_game(
        invasion_config(),
        &mut ScriptedSource::new(invasion_script()),
        DEFAULT_MAX_DECISIONS,
    )
    .unwrap();
    let second = run_game(
        invasion_config(),
        &mut ScriptedSource::new(invasion_script()),
        DEFAULT_MAX_DECISIONS,
    )
    .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_replay_matches_live_game() {
    let config = invasion_config();
    let result = run_game(
        config,
        &mut ScriptedSource::new(invasion_script()),
        DEFAULT_MAX_DECISIONS,
    )
    .unwrap();

    let recording = Recording::from_result(config, &result);
    assert_eq!(recording.decisions, result.decisions);

    let mut engine = ReplayEngine::new(recording).unwrap();
    engine.run_to_end().unwrap();

    let mut live = Session::new(config).unwrap();
    for decision in invasion_script() {
        live.submit(decision).unwrap();
    }
    assert_eq!(engine.session().game(), live.game());
    assert_eq!(engine.session().winner(), Some(result.winner));

    // Seeking back shows the board before White's second raider
    engine.seek_turn(2).unwrap();
    assert_eq!(engine.session().game().player(Color::White).piece_count(), 1);
    assert!(engine.render_ascii().contains("Turn 2"));

    // Stepping back from turn 2 and forward again lands on the same state
    let at_turn_two = engine.session().game().clone();
    engine.step_backward().unwrap();
    engine.step_forward().unwrap();
    assert_eq!(engine.session().game(), &at_turn_two);
}
