//! Combat strategies: interchangeable damage and resource-cost formulas.
//!
//! Each [`StrategyVariant`] maps to a fixed [`StrategyProfile`]. Applying a
//! strategy spends the attacker's mana, shifts the attacker's defense and
//! damages the target:
//!
//! ```text
//! raw    = attack * damage_percent / 100
//! final  = max(1, raw - (target.defense - defense_ignored))
//! ```
//!
//! Magical falls back to a half-strength basic attack with no mana cost and
//! no defense penetration when the attacker has less mana than the spell
//! costs.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::entity::Entity;

use super::scale;

/// The closed set of combat strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StrategyVariant {
    /// Hits hard, costs mana and lowers the attacker's guard
    Aggressive,
    /// Hits softly, raises the attacker's guard
    Defensive,
    /// Even trade of damage and guard
    #[default]
    Balanced,
    /// Spell that ignores half the target's defense
    Magical,
}

impl StrategyVariant {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Aggressive,
        Self::Defensive,
        Self::Balanced,
        Self::Magical,
    ];

    /// Returns the variant's formula table row.
    #[must_use]
    pub const fn profile(self) -> StrategyProfile {
        match self {
            Self::Aggressive => StrategyProfile {
                damage_percent: 150,
                mana_cost: 15,
                defense_delta: -2,
                ignores_half_defense: false,
            },
            Self::Defensive => StrategyProfile {
                damage_percent: 80,
                mana_cost: 5,
                defense_delta: 5,
                ignores_half_defense: false,
            },
            Self::Balanced => StrategyProfile {
                damage_percent: 100,
                mana_cost: 8,
                defense_delta: 1,
                ignores_half_defense: false,
            },
            Self::Magical => StrategyProfile {
                damage_percent: 130,
                mana_cost: 20,
                defense_delta: 0,
                ignores_half_defense: true,
            },
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Aggressive => "Aggressive Combat Strategy",
            Self::Defensive => "Defensive Combat Strategy",
            Self::Balanced => "Balanced Combat Strategy",
            Self::Magical => "Magical Combat Strategy",
        }
    }
}

impl fmt::Display for StrategyVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One row of the strategy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyProfile {
    /// Raw damage as a percentage of attack power
    pub damage_percent: i32,
    /// Mana spent by the attacker
    pub mana_cost: i32,
    /// Change to the attacker's defense; reductions never drop it below 1
    pub defense_delta: i32,
    /// Whether half of the target's defense is bypassed
    pub ignores_half_defense: bool,
}

/// Damage percentage of the magical fallback attack.
const FALLBACK_DAMAGE_PERCENT: i32 = 50;

/// What a strategy application did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyOutcome {
    /// Strategy that was applied
    pub variant: StrategyVariant,
    /// Damage before the target's defense
    pub raw_damage: i32,
    /// Health removed from the target, always at least 1
    pub damage: i32,
    /// Mana the attacker spent
    pub mana_spent: i32,
    /// Net change to the attacker's defense after clamping
    pub defense_change: i32,
    /// Portion of the target's defense that was bypassed
    pub defense_ignored: i32,
    /// `true` when Magical lacked mana and fell back to a basic attack
    pub fell_back: bool,
}

/// Applies `variant` with `attacker` against `target`.
///
/// Mutates the attacker's mana and defense and the target's health. Mana is
/// not clamped and may go negative for the non-magical variants.
///
/// ```
/// use playermmo_core::entity::{Entity, Stats};
/// use playermmo_core::resolver::{apply_strategy, StrategyVariant};
///
/// let mut mage = Entity::player("Mage", Stats { mana: 15, attack: 20, ..Stats::default() });
/// let mut golem = Entity::monster("Rock Golem", 4, 15, 90, 5);
///
/// let outcome = apply_strategy(StrategyVariant::Magical, &mut mage, &mut golem);
///
/// assert!(outcome.fell_back);
/// assert_eq!(outcome.mana_spent, 0);
/// assert_eq!(outcome.damage, 6);
/// ```
pub fn apply_strategy(
    variant: StrategyVariant,
    attacker: &mut Entity,
    target: &mut Entity,
) -> StrategyOutcome {
    let profile = variant.profile();
    let fell_back = variant == StrategyVariant::Magical && attacker.stats().mana < profile.mana_cost;

    let (damage_percent, mana_cost, defense_delta, ignores_half) = if fell_back {
        (FALLBACK_DAMAGE_PERCENT, 0, 0, false)
    } else {
        (
            profile.damage_percent,
            profile.mana_cost,
            profile.defense_delta,
            profile.ignores_half_defense,
        )
    };

    let raw_damage = scale(attacker.stats().attack, damage_percent);
    let target_defense = target.stats().defense;
    let defense_ignored = if ignores_half { target_defense / 2 } else { 0 };
    let damage = raw_damage
        .saturating_sub(target_defense - defense_ignored)
        .max(1);

    let stats = attacker.stats_mut();
    let defense_before = stats.defense;
    stats.mana -= mana_cost;
    stats.defense = if defense_delta < 0 {
        (stats.defense + defense_delta).max(1)
    } else {
        stats.defense + defense_delta
    };
    let defense_change = stats.defense - defense_before;

    target.stats_mut().health -= damage;

    if fell_back {
        info!(
            attacker = attacker.name(),
            mana = attacker.stats().mana,
            "not enough mana for a spell, falling back to a basic attack"
        );
    }
    debug!(
        strategy = %variant,
        attacker = attacker.name(),
        target = target.name(),
        raw_damage,
        damage,
        mana_cost,
        defense_change,
        "strategy applied"
    );

    StrategyOutcome {
        variant,
        raw_damage,
        damage,
        mana_spent: mana_cost,
        defense_change,
        defense_ignored,
        fell_back,
    }
}

/// Holds the strategy a combatant is currently using.
///
/// Starts on [`StrategyVariant::Balanced`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StrategySelector {
    current: StrategyVariant,
}

impl StrategySelector {
    /// Creates a selector using `variant`.
    #[must_use]
    pub const fn new(variant: StrategyVariant) -> Self {
        Self { current: variant }
    }

    /// Returns the active strategy.
    #[must_use]
    pub const fn current(&self) -> StrategyVariant {
        self.current
    }

    /// Switches to `variant`.
    pub fn set_strategy(&mut self, variant: StrategyVariant) {
        if variant != self.current {
            info!(from = %self.current, to = %variant, "combat strategy changed");
        }
        self.current = variant;
    }

    /// Applies the active strategy.
    pub fn execute(&self, attacker: &mut Entity, target: &mut Entity) -> StrategyOutcome {
        apply_strategy(self.current, attacker, target)
    }
}
