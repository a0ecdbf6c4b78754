// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Zone Wreck: a deterministic turn-based board game engine.
//!
//! Two players buy pieces from a shared stat budget, place them on their home
//! row and march them toward the other side. Pieces that meet fight in
//! speed-ordered rounds; pieces that reach the enemy row unopposed drain the
//! enemy's reserve. The first player whose reserve runs out loses.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI (run / crosscut)              │
//! ├─────────────────────────────────────┤
//! │   Runner + Replay (in memory)       │
//! ├─────────────────────────────────────┤
//! │   Session (request / decision)      │
//! ├─────────────────────────────────────┤
//! │   Game (board, rules, combat)       │
//! └─────────────────────────────────────┘
//! ```
//!
//! The [`crosscut`] module is an independent utility for binary grids.

pub mod config;
pub mod crosscut;
pub mod error;
pub mod game;
pub mod logging;
pub mod replay;
pub mod runner;
pub mod session;

pub use config::{ConfigError, GameConfig};
pub use error::{DecisionResult, Rejection};

// Re-export key game types at crate root for convenience
pub use game::{Board, Color, Coord, Game, Piece, PieceId, Player, StatLine};
pub use runner::{DecisionSource, GameResult, RunError, ScriptedSource, run_game};
pub use session::{Decision, Event, Phase, Request, Session};
