//! Reserve economy.
//!
//! Reserves only ever shrink: placing a piece costs its allocated stats, and
//! an unopposed invasion costs the invaded player the invader's attack.

use serde::Serialize;

use crate::game::{Color, Piece, Player};

/// A single change to a player's reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReserveCharge {
    /// Paid by the placing player.
    Placement {
        /// Player charged.
        payer: Color,
        /// Points deducted.
        amount: i64,
    },
    /// Paid by the player whose zone was invaded.
    Invasion {
        /// Player charged.
        payer: Color,
        /// Points deducted.
        amount: i64,
    },
}

impl ReserveCharge {
    /// Player whose reserve shrinks.
    #[must_use]
    pub const fn payer(self) -> Color {
        match self {
            ReserveCharge::Placement { payer, .. } | ReserveCharge::Invasion { payer, .. } => payer,
        }
    }

    /// Points deducted.
    #[must_use]
    pub const fn amount(self) -> i64 {
        match self {
            ReserveCharge::Placement { amount, .. } | ReserveCharge::Invasion { amount, .. } => {
                amount
            }
        }
    }
}

/// Charge for placing `piece`.
#[must_use]
pub fn placement_charge(piece: &Piece) -> ReserveCharge {
    ReserveCharge::Placement {
        payer: piece.owner,
        amount: piece.cost(),
    }
}

/// Charge for `invader` entering the opponent's zone unopposed.
#[must_use]
pub fn invasion_charge(invader: &Piece) -> ReserveCharge {
    ReserveCharge::Invasion {
        payer: invader.owner.opponent(),
        amount: i64::from(invader.attack),
    }
}

/// Apply a charge to the paying player.
///
/// The reserve is allowed to drop below zero; exhaustion is judged by the
/// win check. Returns the new reserve.
///
/// # Panics
///
/// Panics in debug builds if `player` is not the charge's payer.
pub fn apply_charge(player: &mut Player, charge: ReserveCharge) -> i64 {
    debug_assert_eq!(player.color, charge.payer());
    player.reserve = player.reserve.saturating_sub(charge.amount());
    tracing::trace!(
        payer = %player.color,
        amount = charge.amount(),
        reserve = player.reserve,
        "reserve charged"
    );
    player.reserve
}
