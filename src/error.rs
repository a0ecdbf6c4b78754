//! Error types for the decision protocol.

use thiserror::Error;

use crate::game::{Illegal, StatError};
use crate::session::Phase;

/// Why a submitted decision was refused.
///
/// Every rejection is recoverable: the session is left untouched and the
/// same request stays pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The requested stat split is invalid or over budget.
    #[error("invalid piece: {0}")]
    Stat(#[from] StatError),
    /// The placement breaks a zone or occupancy rule.
    #[error("illegal placement: {0}")]
    Placement(Illegal),
    /// The move breaks a movement rule.
    #[error("illegal move: {0}")]
    Move(Illegal),
    /// The decision does not fit the current phase.
    #[error("cannot {decision} during {phase}")]
    WrongPhase {
        /// Phase the session is in.
        phase: Phase,
        /// Kind of decision submitted.
        decision: &'static str,
    },
    /// The game has already been decided.
    #[error("the game is over")]
    GameOver,
}

/// Result type for decision submission.
pub type DecisionResult<T> = Result<T, Rejection>;
