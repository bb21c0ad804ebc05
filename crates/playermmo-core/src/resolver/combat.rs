//! Basic strikes, two-sided rounds and fights to the finish.
//!
//! Every strike deals `max(1, attack - defense)`: a defender can never fully
//! negate an attack. Health is reduced in place and is allowed to go
//! negative; callers test [`Entity::is_defeated`] to see who fell.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::entity::Entity;

/// Damage dealt by `attack` against `defense`, floored at 1.
///
/// ```
/// use playermmo_core::resolver::damage_between;
///
/// assert_eq!(damage_between(20, 12), 8);
/// assert_eq!(damage_between(20, 25), 1);
/// ```
#[must_use]
pub fn damage_between(attack: i32, defense: i32) -> i32 {
    attack.saturating_sub(defense).max(1)
}

/// One-sided strike. Returns the damage dealt, always at least 1.
pub fn resolve_attack(attacker: &Entity, defender: &mut Entity) -> i32 {
    let damage = damage_between(attacker.stats().attack, defender.stats().defense);
    defender.stats_mut().health -= damage;
    debug!(
        attacker = attacker.name(),
        defender = defender.name(),
        damage,
        health = defender.stats().health,
        "strike"
    );
    damage
}

/// Result of a two-sided round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// Damage the attacker dealt
    pub damage: i32,
    /// Damage the defender dealt back, if it survived to counter
    pub counter: Option<i32>,
}

/// Attacker strikes; a surviving defender strikes back with the same formula.
pub fn resolve_round(attacker: &mut Entity, defender: &mut Entity) -> RoundOutcome {
    let damage = resolve_attack(attacker, defender);
    let counter = if defender.stats().health > 0 {
        Some(resolve_attack(defender, attacker))
    } else {
        None
    };
    RoundOutcome { damage, counter }
}

/// Which side of a battle was left standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Victor {
    /// The side that struck first
    Attacker,
    /// The side that was struck first
    Defender,
}

/// Summary of a fight to the finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    /// Number of rounds fought
    pub rounds: u32,
    /// Total damage the attacker dealt
    pub damage_dealt: i32,
    /// Total damage the attacker took
    pub damage_taken: i32,
    /// Who was still standing
    pub victor: Victor,
}

/// Trades rounds until one side is defeated.
///
/// Terminates because every strike removes at least 1 health. If either side
/// starts already defeated no round is fought and the other side wins.
pub fn resolve_battle(attacker: &mut Entity, defender: &mut Entity) -> BattleOutcome {
    let mut outcome = BattleOutcome {
        rounds: 0,
        damage_dealt: 0,
        damage_taken: 0,
        victor: Victor::Attacker,
    };

    while !attacker.is_defeated() && !defender.is_defeated() {
        let round = resolve_round(attacker, defender);
        outcome.rounds += 1;
        outcome.damage_dealt += round.damage;
        outcome.damage_taken += round.counter.unwrap_or(0);
    }

    outcome.victor = if attacker.is_defeated() {
        Victor::Defender
    } else {
        Victor::Attacker
    };
    info!(
        attacker = attacker.name(),
        defender = defender.name(),
        rounds = outcome.rounds,
        victor = ?outcome.victor,
        "battle finished"
    );
    outcome
}
