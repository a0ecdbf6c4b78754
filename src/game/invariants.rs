//! Game invariants - sanity checks that detect bugs.
//!
//! Legal play can never break these. A violation means the engine itself
//! mutated the board and the piece sets out of step.

use crate::game::{Color, Game};

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(game: &Game) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let budget_per_power = i64::from(game.budget_per_power());

    // Board -> pieces: every occupied cell names a live piece standing there
    for (coord, occupant) in game.board().occupied() {
        match game.player(occupant.owner).piece(occupant.id) {
            None => violations.push(violation(format!(
                "Cell {coord} references missing {} piece {}",
                occupant.owner, occupant.id
            ))),
            Some(piece) if piece.position != Some(coord) => violations.push(violation(format!(
                "Cell {coord} holds piece {} whose position is {:?}",
                occupant.id, piece.position
            ))),
            Some(piece) if piece.owner != occupant.owner => violations.push(violation(format!(
                "Cell {coord} tags piece {} as {} but it belongs to {}",
                occupant.id, occupant.owner, piece.owner
            ))),
            Some(_) => {}
        }
    }

    // Pieces -> board: every placed piece is found at its position
    for color in Color::ALL {
        let player = game.player(color);
        for (&id, piece) in &player.pieces {
            if piece.owner != color {
                violations.push(violation(format!(
                    "{color} holds piece {id} owned by {}",
                    piece.owner
                )));
            }

            if let Some(position) = piece.position {
                let on_board = game.board().get(position);
                if on_board.map(|o| (o.id, o.owner)) != Some((id, color)) {
                    violations.push(violation(format!(
                        "{color} piece {id} claims {position} but the cell holds {on_board:?}"
                    )));
                }
            }

            // Zero-health pieces can be bought, but combat never leaves one below zero
            if piece.health < 0 {
                violations.push(violation(format!(
                    "{color} piece {id} is still live with health {}",
                    piece.health
                )));
            }

            let budget = i64::from(piece.power) * budget_per_power;
            if piece.cost() > budget {
                violations.push(violation(format!(
                    "{color} piece {id} has {} stat points but power {} allows {budget}",
                    piece.cost(),
                    piece.power
                )));
            }
        }
    }

    // Board count matches live placed pieces
    for color in Color::ALL {
        let placed = game
            .player(color)
            .pieces
            .values()
            .filter(|piece| piece.position.is_some())
            .count();
        let on_board = game.board().count(color);
        if placed != on_board {
            violations.push(violation(format!(
                "{color} has {placed} placed pieces but {on_board} on the board"
            )));
        }
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(game: &Game) {
    let violations = check_invariants(game);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_game: &Game) {}
