#![no_main]

//! Full game turn fuzzer.
//!
//! Submits arbitrary decisions to a session and checks after each one that:
//! 1. Rejected decisions leave the game untouched
//! 2. Board and piece sets stay consistent
//! 3. The game is over exactly when a reserve is exhausted
//!
//! This catches integration bugs that individual component fuzzers miss.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use zonewreck::game::check_invariants;
use zonewreck::{Color, Coord, Decision, GameConfig, Session, StatLine};

/// A fuzzer-generated decision.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzDecision {
    /// Buy and place a piece.
    Place {
        power: i8,
        attack: i8,
        health: i8,
        speed: i8,
        distance: i8,
        column: u8,
    },
    /// Move by raw coordinates.
    Move {
        from_row: u8,
        from_col: u8,
        to_row: u8,
        to_col: u8,
    },
    /// Pick a legal move by index.
    Legal { piece: u8, dest: u8 },
    /// End the phase.
    Skip,
}

/// Structured input for full game fuzzing.
#[derive(Arbitrary, Debug)]
struct GameTurnInput {
    /// Board side (clamped to 2..=12).
    board_size: u8,
    /// Starting reserve (clamped to 1..=500).
    reserve: u16,
    /// Optional placement cap.
    cap: Option<u8>,
    /// Decisions in order.
    decisions: Vec<FuzzDecision>,
}

fn to_decision(input: FuzzDecision, session: &Session) -> Decision {
    match input {
        FuzzDecision::Place {
            power,
            attack,
            health,
            speed,
            distance,
            column,
        } => Decision::place(
            StatLine::new(
                i32::from(power),
                i32::from(attack),
                i32::from(health),
                i32::from(speed),
                i32::from(distance),
            ),
            u16::from(column),
        ),
        FuzzDecision::Move {
            from_row,
            from_col,
            to_row,
            to_col,
        } => Decision::move_piece(
            Coord::new(u16::from(from_row), u16::from(from_col)),
            Coord::new(u16::from(to_row), u16::from(to_col)),
        ),
        FuzzDecision::Legal { piece, dest } => match session.pending() {
            zonewreck::Request::Move { moves, .. } if !moves.is_empty() => {
                let option = &moves[usize::from(piece) % moves.len()];
                Decision::move_piece(option.from, option.to[usize::from(dest) % option.to.len()])
            }
            _ => Decision::Skip,
        },
        FuzzDecision::Skip => Decision::Skip,
    }
}

fuzz_target!(|input: GameTurnInput| {
    let config = GameConfig {
        board_size: u16::from(input.board_size.clamp(2, 12)),
        starting_reserve: i64::from(input.reserve.clamp(1, 500)),
        max_placements_per_turn: input.cap.map(|c| u32::from(c.max(1))),
        ..GameConfig::default()
    };
    let Ok(mut session) = Session::new(config) else {
        return;
    };

    // Cap decisions to keep runs fast
    for &fuzz in input.decisions.iter().take(500) {
        let before = session.game().clone();
        let decision = to_decision(fuzz, &session);

        if session.submit(decision).is_err() {
            assert_eq!(session.game(), &before, "rejected {decision:?} changed state");
        }

        let violations = check_invariants(session.game());
        assert!(violations.is_empty(), "Invariants violated: {violations:?}");

        let exhausted = Color::ALL
            .iter()
            .any(|&c| session.game().player(c).reserve <= 0);
        assert_eq!(session.is_over(), exhausted);
    }
});
