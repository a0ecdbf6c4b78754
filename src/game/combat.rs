//! Combat resolution.
//!
//! Two pieces trade strikes in rounds. The faster piece strikes first and the
//! mover wins speed ties. A round ends early when the first strike knocks the
//! target to zero health or below, so the loser of that strike never
//! retaliates. Order is fixed for the whole fight.
//!
//! Rounds are not simulated one by one: the number of strikes each side needs
//! is computed directly, which keeps large health pools cheap.

use serde::Serialize;

use crate::game::Piece;

/// One side of a fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The piece that moved.
    Attacker,
    /// The piece standing on the destination.
    Defender,
}

impl Side {
    /// The other side.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }
}

/// How a fight ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatOutcome {
    /// The mover won and takes the destination.
    AttackerWins,
    /// The defender held its cell.
    DefenderWins,
    /// Neither side can deal damage; nothing happens.
    Stalemate,
}

impl CombatOutcome {
    /// The winning side, if any.
    #[must_use]
    pub const fn winner(self) -> Option<Side> {
        match self {
            CombatOutcome::AttackerWins => Some(Side::Attacker),
            CombatOutcome::DefenderWins => Some(Side::Defender),
            CombatOutcome::Stalemate => None,
        }
    }
}

/// Result of a fight between two pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CombatReport {
    /// How the fight ended.
    pub outcome: CombatOutcome,
    /// Side that struck first in every round.
    pub first_striker: Side,
    /// Rounds fought, including the final partial round.
    pub rounds: u64,
    /// Attacker health after the fight.
    pub attacker_health: i32,
    /// Defender health after the fight.
    pub defender_health: i32,
}

/// Decide who strikes first: strictly faster piece, mover on a tie.
#[must_use]
pub fn first_striker(attacker: &Piece, defender: &Piece) -> Side {
    if defender.speed > attacker.speed {
        Side::Defender
    } else {
        Side::Attacker
    }
}

/// Number of strikes of `attack` needed to bring `health` to zero or below.
///
/// A target already at zero falls to the first strike, even one for no
/// damage. Returns `None` if the target can never fall.
fn strikes_to_defeat(health: i64, attack: i64) -> Option<i64> {
    if health <= 0 {
        return Some(1);
    }
    if attack <= 0 {
        return None;
    }
    Some((health + attack - 1) / attack)
}

fn clamp_health(health: i64) -> i32 {
    i32::try_from(health).unwrap_or(if health < 0 { i32::MIN } else { i32::MAX })
}

/// Resolve a fight between the mover and the occupant of its destination.
///
/// Pure: neither piece is modified. The caller applies the healths and
/// removes the loser.
#[must_use]
pub fn resolve_combat(attacker: &Piece, defender: &Piece) -> CombatReport {
    let first_side = first_striker(attacker, defender);
    let (first, second) = match first_side {
        Side::Attacker => (attacker, defender),
        Side::Defender => (defender, attacker),
    };

    let first_health = i64::from(first.health);
    let second_health = i64::from(second.health);
    let first_attack = i64::from(first.attack);
    let second_attack = i64::from(second.attack);

    let first_needs = strikes_to_defeat(second_health, first_attack);
    let second_needs = strikes_to_defeat(first_health, second_attack);

    // First striker lands strike k before the second striker's strike k
    let (winner, rounds, first_after, second_after) = match (first_needs, second_needs) {
        (None, None) => {
            tracing::debug!("combat stalemate: neither piece can deal damage");
            return CombatReport {
                outcome: CombatOutcome::Stalemate,
                first_striker: first_side,
                rounds: 0,
                attacker_health: attacker.health,
                defender_health: defender.health,
            };
        }
        (Some(k1), Some(k2)) if k1 <= k2 => (
            first_side,
            k1,
            first_health - (k1 - 1) * second_attack,
            second_health - k1 * first_attack,
        ),
        (Some(k1), None) => (
            first_side,
            k1,
            first_health,
            second_health - k1 * first_attack,
        ),
        (_, Some(k2)) => (
            first_side.other(),
            k2,
            first_health - k2 * second_attack,
            second_health - k2 * first_attack,
        ),
    };
    // Strike counts are at least 1
    let rounds = rounds.unsigned_abs();

    let (attacker_health, defender_health) = match first_side {
        Side::Attacker => (clamp_health(first_after), clamp_health(second_after)),
        Side::Defender => (clamp_health(second_after), clamp_health(first_after)),
    };

    let outcome = match winner {
        Side::Attacker => CombatOutcome::AttackerWins,
        Side::Defender => CombatOutcome::DefenderWins,
    };

    tracing::debug!(
        ?outcome,
        ?first_side,
        rounds,
        attacker_health,
        defender_health,
        "combat resolved"
    );

    CombatReport {
        outcome,
        first_striker: first_side,
        rounds,
        attacker_health,
        defender_health,
    }
}

/// Round-by-round reference simulation, used to cross-check the closed form.
#[cfg(test)]
pub(crate) fn simulate_rounds(attacker: &Piece, defender: &Piece, max_rounds: u64) -> CombatReport {
    let first_side = first_striker(attacker, defender);
    let (mut first, mut second) = match first_side {
        Side::Attacker => (*attacker, *defender),
        Side::Defender => (*defender, *attacker),
    };

    let mut round = 1;
    let winner = loop {
        if round > max_rounds {
            break None;
        }
        second.health -= first.attack;
        if second.health <= 0 {
            break Some(first_side);
        }
        first.health -= second.attack;
        if first.health <= 0 {
            break Some(first_side.other());
        }
        round += 1;
    };

    let (attacker_health, defender_health) = match first_side {
        Side::Attacker => (first.health, second.health),
        Side::Defender => (second.health, first.health),
    };

    match winner {
        Some(side) => CombatReport {
            outcome: match side {
                Side::Attacker => CombatOutcome::AttackerWins,
                Side::Defender => CombatOutcome::DefenderWins,
            },
            first_striker: first_side,
            rounds: round,
            attacker_health,
            defender_health,
        },
        None => CombatReport {
            outcome: CombatOutcome::Stalemate,
            first_striker: first_side,
            rounds: 0,
            attacker_health: attacker.health,
            defender_health: defender.health,
        },
    }
}
