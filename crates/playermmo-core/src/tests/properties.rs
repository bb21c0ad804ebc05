//! Property checks for the combat arithmetic, tier machine and undo log.

use proptest::prelude::*;

use crate::command::{Command, CommandLog};
use crate::condition::ConditionTier;
use crate::config::Rules;
use crate::entity::{Entity, EntityId, Stats, Vitals};
use crate::resolver::{apply_strategy, damage_between, StrategyVariant};
use crate::Arena;

use super::helpers::{arb_command, arb_stats, arb_variant};

proptest! {
    /// Every hit lands for at least 1, and for exactly attack - defense
    /// when attack is higher.
    #[test]
    fn prop_damage_floor(attack in -100i32..1000, defense in -100i32..1000) {
        let damage = damage_between(attack, defense);
        prop_assert!(damage >= 1);
        if attack > defense {
            prop_assert_eq!(damage, attack - defense);
        }
    }

    /// `next` agrees with the written-out transition table for every tier.
    #[test]
    fn prop_next_matches_transition_table(
        tier in prop::sample::select(ConditionTier::ALL.to_vec()),
        health in -50i32..400,
        mana in -20i32..200,
        level in 1i32..20,
    ) {
        let vitals = Vitals::new(health, mana, level);
        prop_assert_eq!(
            tier.next(vitals, &Rules::default()),
            expected_next(tier, vitals)
        );
    }

    /// A defeated player keeps whatever tier it had.
    #[test]
    fn prop_defeated_never_transitions(
        health in -100i32..=0,
        mana in -20i32..200,
        level in 1i32..20,
    ) {
        let rules = Rules::default();
        for tier in ConditionTier::ALL {
            prop_assert_eq!(tier.next(Vitals::new(health, mana, level), &rules), tier);
        }
    }

    /// Exhausted holds until mana is back at the recovery threshold.
    #[test]
    fn prop_exhausted_waits_for_mana(
        health in 1i32..400,
        mana in -20i32..30,
        level in 1i32..20,
    ) {
        let rules = Rules::default();
        let next = ConditionTier::Exhausted.next(Vitals::new(health, mana, level), &rules);
        prop_assert_eq!(next, ConditionTier::Exhausted);
    }

    /// Executing N commands and undoing N restores the arena exactly.
    #[test]
    fn prop_undo_restores_arena(
        first in arb_stats(),
        second in arb_stats(),
        commands in prop::collection::vec(arb_command(EntityId::new(0), EntityId::new(1)), 0..20),
    ) {
        let mut arena = Arena::new();
        let a = arena.spawn(Entity::player("A", first));
        let b = arena.spawn(Entity::monster("B", second.defense, second.attack, second.health, second.level));
        prop_assert_eq!((a, b), (EntityId::new(0), EntityId::new(1)));
        let before = arena.clone();

        let mut log = CommandLog::new();
        for command in &commands {
            prop_assert!(log.execute(&mut arena, *command).is_ok());
        }
        prop_assert_eq!(log.undo_multiple(&mut arena, commands.len()), commands.len());
        prop_assert_eq!(arena, before);
        prop_assert!(log.is_empty());
    }

    /// A single strategy command undoes to the exact prior state.
    #[test]
    fn prop_strategy_undo_is_exact(
        attacker in arb_stats(),
        target in arb_stats(),
        variant in arb_variant(),
    ) {
        let mut arena = Arena::new();
        let a = arena.spawn(Entity::player("A", attacker));
        let b = arena.spawn(Entity::player("B", target));
        let before = arena.clone();

        let mut log = CommandLog::new();
        log.execute(&mut arena, Command::Strategy { variant, attacker: a, target: b })
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        log.undo(&mut arena);

        prop_assert_eq!(arena, before);
    }

    /// Magical strategy with too little mana spends nothing.
    #[test]
    fn prop_magical_fallback_is_free(
        base in arb_stats(),
        mana in -20i32..20,
        defense in 0i32..40,
    ) {
        let stats = Stats { mana, ..base };
        let mut mage = Entity::player("Mage", stats);
        let mut golem = Entity::monster("Golem", defense, 10, 100, 3);

        let outcome = apply_strategy(StrategyVariant::Magical, &mut mage, &mut golem);

        prop_assert!(outcome.fell_back);
        prop_assert_eq!(outcome.mana_spent, 0);
        prop_assert_eq!(mage.stats().mana, stats.mana);
        prop_assert!(outcome.damage >= 1);
    }
}

/// Transition table for the default rules, with percentages of
/// `100 + (level - 1) * 10` compared exactly.
fn expected_next(tier: ConditionTier, vitals: Vitals) -> ConditionTier {
    use ConditionTier::{Critical, Exhausted, Healthy, Injured};

    if vitals.health <= 0 {
        return tier;
    }
    let max = 100 + (i64::from(vitals.level) - 1) * 10;
    let at_most = |percent: i64| i64::from(vitals.health) * 100 <= percent * max;
    let (critical, injured, recovered) = (at_most(30), at_most(50), !at_most(80));
    let low_mana = vitals.mana < 20;

    match (tier, critical, injured, recovered, low_mana) {
        (Healthy | Injured, true, ..) => Critical,
        (Healthy, _, true, ..) => Injured,
        (Healthy, .., true) => Exhausted,
        (Healthy, ..) => Healthy,
        (Injured, _, _, true, _) => Healthy,
        (Injured, .., true) => Exhausted,
        (Injured, ..) => Injured,
        (Critical, _, _, true, _) => Healthy,
        (Critical, true, ..) => Critical,
        (Critical, ..) => Injured,
        (Exhausted, ..) if vitals.mana < 30 => Exhausted,
        (Exhausted, true, ..) => Critical,
        (Exhausted, _, true, ..) => Injured,
        (Exhausted, ..) => Healthy,
    }
}

#[test]
fn transition_boundaries() {
    use ConditionTier::{Critical, Exhausted, Healthy, Injured};

    let rules = Rules::default();
    // (from, health, mana, level, to)
    let rows = [
        (Injured, 80, 50, 1, Injured),
        (Injured, 81, 50, 1, Healthy),
        (Injured, 30, 50, 1, Critical),
        (Healthy, 50, 50, 1, Injured),
        (Healthy, 51, 19, 1, Exhausted),
        (Critical, 31, 0, 1, Injured),
        (Critical, 91, 0, 2, Healthy),
        (Exhausted, 10, 29, 1, Exhausted),
        (Exhausted, 10, 30, 1, Critical),
        (Exhausted, 100, 30, 1, Healthy),
    ];
    for (from, health, mana, level, to) in rows {
        let vitals = Vitals::new(health, mana, level);
        assert_eq!(from.next(vitals, &rules), to, "{from} with {vitals:?}");
        assert_eq!(expected_next(from, vitals), to, "table: {from} with {vitals:?}");
    }
}
