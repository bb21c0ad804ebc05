//! Fixtures and proptest generators shared by the cross-module tests.

use proptest::prelude::*;

use crate::arena::Arena;
use crate::command::Command;
use crate::entity::{Entity, EntityId, Stats};
use crate::resolver::StrategyVariant;

// =============================================================================
// Fixtures
// =============================================================================

/// Player with the given attack and defense and otherwise default stats.
pub fn hero(name: &str, attack: i32, defense: i32) -> Entity {
    Entity::player(
        name,
        Stats {
            attack,
            defense,
            ..Stats::default()
        },
    )
}

/// Arena holding one player and one monster. Returns `(arena, player, monster)`.
pub fn duel() -> (Arena, EntityId, EntityId) {
    let mut arena = Arena::new();
    let player = arena.spawn(hero("Hero", 20, 10));
    let monster = arena.spawn(Entity::monster("Orc", 12, 18, 100, 4));
    (arena, player, monster)
}

// =============================================================================
// Generators
// =============================================================================

/// Stat lines in a range wide enough to reach every tier, including
/// defeated and negative values.
pub fn arb_stats() -> impl Strategy<Value = Stats> {
    (-50i32..400, -20i32..200, 0i32..60, 0i32..40, 1i32..20).prop_map(
        |(health, mana, attack, defense, level)| Stats {
            health,
            mana,
            attack,
            defense,
            level,
        },
    )
}

/// Any strategy variant.
pub fn arb_variant() -> impl Strategy<Value = StrategyVariant> {
    prop::sample::select(StrategyVariant::ALL.to_vec())
}

/// Valid command between two distinct entities `a` and `b`.
pub fn arb_command(a: EntityId, b: EntityId) -> impl Strategy<Value = Command> {
    let pair = any::<bool>().prop_map(move |flip| if flip { (b, a) } else { (a, b) });
    prop_oneof![
        pair.clone()
            .prop_map(|(attacker, target)| Command::Attack { attacker, target }),
        (pair.clone(), arb_variant()).prop_map(|((attacker, target), variant)| {
            Command::Strategy {
                variant,
                attacker,
                target,
            }
        }),
        (pair.clone(), 0i32..50).prop_map(|((target, _), amount)| Command::Heal { target, amount }),
        (pair, 0i32..10).prop_map(|((target, _), boost)| Command::Defend { target, boost }),
    ]
}
