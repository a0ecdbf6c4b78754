#![no_main]

//! Combat fuzzer.
//!
//! Feeds arbitrary stat lines into combat and checks the report against a
//! capped round-by-round fight.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use zonewreck::game::{CombatOutcome, Piece, Side, resolve_combat};
use zonewreck::Color;

/// Structured input for combat fuzzing.
#[derive(Arbitrary, Debug)]
struct CombatInput {
    /// Attacker attack, health, speed.
    attacker: (i32, i32, i32),
    /// Defender attack, health, speed.
    defender: (i32, i32, i32),
}

fn piece((attack, health, speed): (i32, i32, i32), owner: Color) -> Piece {
    Piece {
        power: 1,
        attack,
        health,
        speed,
        distance: 0,
        owner,
        position: None,
    }
}

fuzz_target!(|input: CombatInput| {
    // Non-negative attack, as allocation guarantees
    let (attack, health, speed) = input.attacker;
    let attacker = piece((attack.max(0), health, speed), Color::White);
    let (attack, health, speed) = input.defender;
    let defender = piece((attack.max(0), health, speed), Color::Black);

    // Must not panic, must be deterministic
    let report = resolve_combat(&attacker, &defender);
    assert_eq!(report, resolve_combat(&attacker, &defender));

    match report.outcome {
        CombatOutcome::AttackerWins => {
            assert!(report.defender_health <= 0);
            assert!(
                report.attacker_health > 0
                    || (report.rounds == 1 && report.first_striker == Side::Attacker)
            );
        }
        CombatOutcome::DefenderWins => {
            assert!(report.attacker_health <= 0);
        }
        CombatOutcome::Stalemate => {
            assert_eq!(attacker.attack, 0);
            assert_eq!(defender.attack, 0);
            assert_eq!(report.rounds, 0);
            assert_eq!(report.attacker_health, attacker.health);
            assert_eq!(report.defender_health, defender.health);
        }
    }

    // Cross-check short fights round by round
    if report.rounds <= 1_000 && report.outcome != CombatOutcome::Stalemate {
        let mut health = [i64::from(attacker.health), i64::from(defender.health)];
        let attack = [i64::from(attacker.attack), i64::from(defender.attack)];
        let order = match report.first_striker {
            Side::Attacker => [0, 1],
            Side::Defender => [1, 0],
        };
        let mut winner = None;
        let mut rounds = 0u64;
        'fight: while rounds < 1_000 {
            rounds += 1;
            for striker in order {
                health[1 - striker] -= attack[striker];
                if health[1 - striker] <= 0 {
                    winner = Some(striker);
                    break 'fight;
                }
            }
        }
        assert_eq!(rounds, report.rounds);
        let expected = match winner {
            Some(0) => CombatOutcome::AttackerWins,
            _ => CombatOutcome::DefenderWins,
        };
        assert_eq!(expected, report.outcome);
    }
});
