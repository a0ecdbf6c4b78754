//! Game layer for Zone Wreck.
//!
//! Implements the board game rules:
//! - Pieces bought with a stat budget
//! - Board with a placement zone per color
//! - Placement and movement legality
//! - Speed-ordered combat
//! - Reserve economy (placement cost, invasion penalty)

mod board;
mod combat;
mod economy;
mod invariants;
mod piece;
mod player;
mod rules;
mod state;

pub use board::{BOARD_SIZE, Board, Coord, Occupant};
pub use combat::{CombatOutcome, CombatReport, Side, first_striker, resolve_combat};
pub use economy::{ReserveCharge, apply_charge, invasion_charge, placement_charge};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use piece::{
    BUDGET_PER_POWER, Piece, PieceId, StatError, StatLine, allocate, allocate_with_budget,
};
pub use player::{Color, Player};
pub use rules::{
    Illegal, MoveKind, check_move, check_placement, is_valid_move, legal_destinations,
    open_zone_columns,
};
pub use state::{Game, MoveResult, Placement};
