//! Player state management.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::{Piece, PieceId};

/// One of the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// Places on the last row and advances toward row 0.
    White,
    /// Places on row 0 and advances toward the last row.
    Black,
}

impl Color {
    /// Both colors, in seating order.
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta sign of a forward step.
    #[must_use]
    pub const fn forward(self) -> i32 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Stable index (White = 0, Black = 1).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Single-letter symbol used in board dumps.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Color::White => 'W',
            Color::Black => 'B',
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// State for a single player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Side this player controls.
    pub color: Color,
    /// Remaining point budget. May go negative; see [`Player::is_exhausted`].
    pub reserve: i64,
    /// Live pieces owned by this player.
    pub pieces: BTreeMap<PieceId, Piece>,
}

impl Player {
    /// Create a new player with a full reserve and no pieces.
    #[must_use]
    pub fn new(color: Color, reserve: i64) -> Self {
        Self {
            color,
            reserve,
            pieces: BTreeMap::new(),
        }
    }

    /// Whether the reserve has run out.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.reserve <= 0
    }

    /// Get a live piece.
    #[must_use]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    /// Number of live pieces.
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let player = Player::new(Color::White, 140);
        assert_eq!(player.color, Color::White);
        assert_eq!(player.reserve, 140);
        assert_eq!(player.piece_count(), 0);
        assert!(!player.is_exhausted());
    }

    #[test]
    fn test_player_exhausted() {
        let mut player = Player::new(Color::Black, 1);
        player.reserve = 0;
        assert!(player.is_exhausted());
        player.reserve = -7;
        assert!(player.is_exhausted());
    }

    #[test]
    fn test_color_opponent() {
        assert_eq!(Color::White.opponent(), Color::Black);
        assert_eq!(Color::Black.opponent(), Color::White);
        assert_eq!(Color::White.opponent().opponent(), Color::White);
    }

    #[test]
    fn test_color_forward() {
        assert_eq!(Color::White.forward(), -1);
        assert_eq!(Color::Black.forward(), 1);
    }

    #[test]
    fn test_color_serde() {
        let json = serde_json::to_string(&Color::Black).unwrap();
        assert_eq!(json, "\"black\"");
        let color: Color = serde_json::from_str("\"white\"").unwrap();
        assert_eq!(color, Color::White);
    }
}
