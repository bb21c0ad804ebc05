//! Resolver module: the arithmetic that turns intent into health loss.
//!
//! Resolvers read the acting entity, mutate the affected entities in place,
//! and return a plain summary of what happened. They never log at `info`
//! level per strike and never touch anything except the entities passed in.
//!
//! # Available Resolvers
//!
//! - [`combat`]: basic strikes ([`resolve_attack`]), two-sided rounds
//!   ([`resolve_round`]) and fights to the finish ([`resolve_battle`])
//! - [`strategy`]: strategy variants with their own damage and cost formulas
//!   ([`apply_strategy`], [`StrategySelector`])
//!
//! # Invariants
//!
//! - Every resolved hit deals at least 1 damage
//! - Given the same entities, a resolver always produces the same result

pub mod combat;
pub mod strategy;

pub use combat::{
    damage_between, resolve_attack, resolve_battle, resolve_round, BattleOutcome, RoundOutcome,
    Victor,
};
pub use strategy::{
    apply_strategy, StrategyOutcome, StrategyProfile, StrategySelector, StrategyVariant,
};

/// `attack * percent / 100`, truncated, computed in `i64` and saturated back
/// into `i32`.
pub(crate) fn scale(attack: i32, percent: i32) -> i32 {
    let scaled = i64::from(attack) * i64::from(percent) / 100;
    i32::try_from(scaled).unwrap_or(if scaled < 0 { i32::MIN } else { i32::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_truncates_and_saturates() {
        assert_eq!(scale(15, 130), 19);
        assert_eq!(scale(-7, 50), -3);
        assert_eq!(scale(30_000_000, 150), 45_000_000);
        assert_eq!(scale(i32::MAX, 150), i32::MAX);
        assert_eq!(scale(i32::MIN, 150), i32::MIN);
    }
}
