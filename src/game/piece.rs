//! Pieces and stat allocation.
//!
//! Every piece is bought with a `power` rating that grants a budget of
//! `budget_per_power × power` stat points. The points are split between
//! attack, health, speed and distance once, at creation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{Color, Coord};

/// Default number of stat points granted per point of power.
pub const BUDGET_PER_POWER: i32 = 4;

/// Unique identifier for a piece within one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PieceId(pub u32);

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A requested stat split, as submitted by a player.
///
/// Values are signed so that out-of-range input can be rejected with a
/// reason instead of failing to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    /// Power rating of the piece.
    pub power: i32,
    /// Damage dealt per strike.
    pub attack: i32,
    /// Hit points.
    pub health: i32,
    /// Strike order in combat.
    pub speed: i32,
    /// Movement range (Chebyshev distance).
    pub distance: i32,
}

impl StatLine {
    /// Create a new stat line.
    #[must_use]
    pub const fn new(power: i32, attack: i32, health: i32, speed: i32, distance: i32) -> Self {
        Self {
            power,
            attack,
            health,
            speed,
            distance,
        }
    }

    /// Sum of the four allocated stats.
    #[must_use]
    pub fn total(&self) -> i64 {
        i64::from(self.attack)
            + i64::from(self.health)
            + i64::from(self.speed)
            + i64::from(self.distance)
    }
}

/// Reasons a stat allocation is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StatError {
    /// A stat was negative, or power was below 1.
    #[error("invalid {stat}: {value}")]
    InvalidStat {
        /// Name of the offending stat.
        stat: &'static str,
        /// The submitted value.
        value: i32,
    },
    /// The stats add up to more than the piece can afford.
    #[error("allocated {spent} points but power only grants {budget}")]
    BudgetExceeded {
        /// Sum of the four stats.
        spent: i64,
        /// Points granted by the piece's power.
        budget: i64,
    },
}

/// A game piece.
///
/// `health` is the live value: combat damage is subtracted from it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    /// Power rating (fixed at creation).
    pub power: i32,
    /// Damage dealt per strike.
    pub attack: i32,
    /// Remaining health.
    pub health: i32,
    /// Strike order in combat.
    pub speed: i32,
    /// Movement range.
    pub distance: i32,
    /// Owning color.
    pub owner: Color,
    /// Board position, `None` while the piece is still in reserve.
    pub position: Option<Coord>,
}

impl Piece {
    /// Points this piece cost to place.
    #[must_use]
    pub fn cost(&self) -> i64 {
        i64::from(self.attack)
            + i64::from(self.health)
            + i64::from(self.speed)
            + i64::from(self.distance)
    }

    /// Whether the piece has been knocked out.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.health <= 0
    }
}

/// Allocate a piece with the standard budget of 4 points per power.
///
/// # Errors
///
/// Returns [`StatError::InvalidStat`] for negative stats or power below 1 and
/// [`StatError::BudgetExceeded`] if the stats exceed `4 × power`.
pub fn allocate(stats: StatLine, owner: Color) -> Result<Piece, StatError> {
    allocate_with_budget(stats, owner, BUDGET_PER_POWER)
}

/// Allocate a piece with a custom number of points per power.
///
/// # Errors
///
/// Same as [`allocate`].
pub fn allocate_with_budget(
    stats: StatLine,
    owner: Color,
    budget_per_power: i32,
) -> Result<Piece, StatError> {
    if stats.power < 1 {
        return Err(StatError::InvalidStat {
            stat: "power",
            value: stats.power,
        });
    }

    for (stat, value) in [
        ("attack", stats.attack),
        ("health", stats.health),
        ("speed", stats.speed),
        ("distance", stats.distance),
    ] {
        if value < 0 {
            return Err(StatError::InvalidStat { stat, value });
        }
    }

    let budget = i64::from(stats.power) * i64::from(budget_per_power);
    let spent = stats.total();
    if spent > budget {
        return Err(StatError::BudgetExceeded { spent, budget });
    }

    Ok(Piece {
        power: stats.power,
        attack: stats.attack,
        health: stats.health,
        speed: stats.speed,
        distance: stats.distance,
        owner,
        position: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_exact_budget() {
        let piece = allocate(StatLine::new(5, 5, 5, 5, 5), Color::White).unwrap();
        assert_eq!(piece.cost(), 20);
        assert_eq!(piece.health, 5);
        assert_eq!(piece.owner, Color::White);
        assert!(piece.position.is_none());
    }

    #[test]
    fn test_allocate_under_budget() {
        let piece = allocate(StatLine::new(3, 2, 4, 1, 1), Color::Black).unwrap();
        assert_eq!(piece.cost(), 8);
        assert_eq!(piece.power, 3);
    }

    #[test]
    fn test_allocate_budget_exceeded() {
        let err = allocate(StatLine::new(2, 3, 3, 2, 1), Color::White).unwrap_err();
        assert_eq!(err, StatError::BudgetExceeded { spent: 9, budget: 8 });
    }

    #[test]
    fn test_allocate_negative_stat() {
        let err = allocate(StatLine::new(5, 5, -1, 5, 5), Color::White).unwrap_err();
        assert_eq!(
            err,
            StatError::InvalidStat {
                stat: "health",
                value: -1
            }
        );
    }

    #[test]
    fn test_allocate_zero_power() {
        let err = allocate(StatLine::new(0, 0, 0, 0, 0), Color::White).unwrap_err();
        assert!(matches!(err, StatError::InvalidStat { stat: "power", .. }));
    }

    #[test]
    fn test_allocate_zero_attack_allowed() {
        let piece = allocate(StatLine::new(1, 0, 4, 0, 0), Color::Black).unwrap();
        assert_eq!(piece.attack, 0);
    }

    #[test]
    fn test_custom_budget() {
        assert!(allocate_with_budget(StatLine::new(1, 2, 2, 1, 1), Color::White, 6).is_ok());
        assert!(allocate_with_budget(StatLine::new(1, 2, 2, 2, 1), Color::White, 6).is_err());
    }

    #[test]
    fn test_defeated() {
        let mut piece = allocate(StatLine::new(1, 1, 1, 1, 1), Color::White).unwrap();
        assert!(!piece.is_defeated());
        piece.health = 0;
        assert!(piece.is_defeated());
    }
}
