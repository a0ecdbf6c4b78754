//! Output formatting utilities for CLI.

use std::fmt::Write as _;

use serde::Serialize;
use zonewreck::{Color, GameResult};

/// JSON-serializable game result.
#[derive(Debug, Serialize)]
pub(super) struct JsonGameResult {
    /// Winning color.
    pub(super) winner: Color,
    /// Total turns played.
    pub(super) turns_played: u32,
    /// Decisions the session refused.
    pub(super) rejections: usize,
    /// Accepted decisions.
    pub(super) decisions: usize,
    /// Per-player results.
    pub(super) players: Vec<JsonPlayerResult>,
}

/// JSON-serializable player result.
#[derive(Debug, Serialize)]
pub(super) struct JsonPlayerResult {
    /// Player color.
    pub(super) color: Color,
    /// Final reserve.
    pub(super) reserve: i64,
    /// Live pieces.
    pub(super) pieces: usize,
}

impl JsonGameResult {
    /// Create from a `GameResult`.
    pub(super) fn from_game_result(result: &GameResult) -> Self {
        Self {
            winner: result.winner,
            turns_played: result.turns_played,
            rejections: result.rejections,
            decisions: result.decisions.len(),
            players: Color::ALL
                .iter()
                .map(|&color| JsonPlayerResult {
                    color,
                    reserve: result.reserves[color.index()],
                    pieces: result.pieces[color.index()],
                })
                .collect(),
        }
    }
}

/// Format a game result as human-readable text.
pub(super) fn format_text(result: &GameResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Game Result");
    let _ = writeln!(output, "  Winner: {}", result.winner);
    let _ = writeln!(output, "  Turns: {}", result.turns_played);
    let _ = writeln!(
        output,
        "  Decisions: {} accepted, {} rejected\n",
        result.decisions.len(),
        result.rejections
    );

    for color in Color::ALL {
        let _ = writeln!(
            output,
            "  {color}: reserve {} ({} pieces on board)",
            result.reserves[color.index()],
            result.pieces[color.index()]
        );
    }

    output
}
