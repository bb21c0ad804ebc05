//! Condition tiers: a player's health/mana bucket and what it allows.
//!
//! A player is always in exactly one [`ConditionTier`]. The tier decides the
//! cost and magnitude of every action (see [`TierProfile`]) and is
//! re-evaluated after each action by [`ConditionTier::next`], an explicit
//! transition function over `(tier, health, mana, level)`.
//!
//! # Transitions
//!
//! With `pct = health / max_health(level)` and default thresholds:
//!
//! | From | Rule (first match wins) |
//! |---|---|
//! | Healthy | `pct <= 0.3` Critical, `pct <= 0.5` Injured, `mana < 20` Exhausted |
//! | Injured | `pct <= 0.3` Critical, `pct > 0.8` Healthy, `mana < 20` Exhausted |
//! | Critical | `pct > 0.8` Healthy, `pct > 0.3` Injured |
//! | Exhausted | only once `mana >= 30`: `pct <= 0.3` Critical, `pct <= 0.5` Injured, else Healthy |
//!
//! A defeated player (`health <= 0`) never transitions.
//!
//! # Example
//!
//! ```
//! use playermmo_core::condition::ConditionTier;
//! use playermmo_core::config::Rules;
//! use playermmo_core::entity::Vitals;
//!
//! let rules = Rules::default();
//! let tier = ConditionTier::classify(Vitals::new(25, 50, 1), &rules);
//! assert_eq!(tier, ConditionTier::Critical);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::config::Rules;
use crate::entity::{Entity, Vitals};
use crate::resolver::{damage_between, scale};

/// Condition bucket derived from health and mana thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConditionTier {
    /// Above half health with enough mana
    #[default]
    Healthy,
    /// Between the critical and injured thresholds
    Injured,
    /// Out of mana; actions are weak until mana recovers
    Exhausted,
    /// At or below the critical threshold
    Critical,
}

impl ConditionTier {
    /// Every tier, in declaration order.
    pub const ALL: [Self; 4] = [Self::Healthy, Self::Injured, Self::Exhausted, Self::Critical];

    /// Stateless classification of `vitals`.
    ///
    /// Health thresholds take priority over low mana.
    #[must_use]
    pub fn classify(vitals: Vitals, rules: &Rules) -> Self {
        if rules.health_at_most(vitals, rules.critical_percent) {
            Self::Critical
        } else if rules.health_at_most(vitals, rules.injured_percent) {
            Self::Injured
        } else if rules.has_low_mana(vitals) {
            Self::Exhausted
        } else {
            Self::Healthy
        }
    }

    /// Transition evaluated after an action.
    ///
    /// Pure: the result depends only on `self`, `vitals` and `rules`.
    #[must_use]
    pub fn next(self, vitals: Vitals, rules: &Rules) -> Self {
        if vitals.health <= 0 {
            return self;
        }

        let critical = rules.health_at_most(vitals, rules.critical_percent);
        let injured = rules.health_at_most(vitals, rules.injured_percent);
        let recovered = !rules.health_at_most(vitals, rules.recovered_percent);
        let low_mana = rules.has_low_mana(vitals);

        match self {
            Self::Healthy => {
                if critical {
                    Self::Critical
                } else if injured {
                    Self::Injured
                } else if low_mana {
                    Self::Exhausted
                } else {
                    Self::Healthy
                }
            }
            Self::Injured => {
                if critical {
                    Self::Critical
                } else if recovered {
                    Self::Healthy
                } else if low_mana {
                    Self::Exhausted
                } else {
                    Self::Injured
                }
            }
            Self::Critical => {
                if recovered {
                    Self::Healthy
                } else if critical {
                    Self::Critical
                } else {
                    Self::Injured
                }
            }
            Self::Exhausted => {
                if vitals.mana < rules.mana_recovery_threshold {
                    Self::Exhausted
                } else if critical {
                    Self::Critical
                } else if injured {
                    Self::Injured
                } else {
                    Self::Healthy
                }
            }
        }
    }

    /// Returns this tier's action table row.
    #[must_use]
    pub const fn profile(self) -> TierProfile {
        match self {
            Self::Healthy => TierProfile {
                attack_mana_cost: 5,
                attack_percent: 100,
                defend_boost: 2,
                heal_health: 15,
                heal_mana: -10,
            },
            Self::Injured => TierProfile {
                attack_mana_cost: 3,
                attack_percent: 75,
                defend_boost: 1,
                heal_health: 10,
                heal_mana: -8,
            },
            Self::Exhausted => TierProfile {
                attack_mana_cost: 0,
                attack_percent: 50,
                defend_boost: 0,
                heal_health: 5,
                heal_mana: 15,
            },
            Self::Critical => TierProfile {
                attack_mana_cost: 1,
                attack_percent: 25,
                defend_boost: 0,
                heal_health: 5,
                heal_mana: -5,
            },
        }
    }
}

impl fmt::Display for ConditionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Healthy => "Healthy",
            Self::Injured => "Injured",
            Self::Exhausted => "Exhausted",
            Self::Critical => "Critical",
        };
        f.write_str(name)
    }
}

/// Cost and magnitude of each action within a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierProfile {
    /// Mana spent by an attack
    pub attack_mana_cost: i32,
    /// Attack power applied, as a percentage
    pub attack_percent: i32,
    /// Defense gained by defending
    pub defend_boost: i32,
    /// Health restored by healing
    pub heal_health: i32,
    /// Mana change from healing; positive when resting recovers mana
    pub heal_mana: i32,
}

/// Actions a tracked player can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TierAction {
    /// Strike a target
    Attack,
    /// Raise defense
    Defend,
    /// Restore health
    Heal,
    /// Idle turn; only re-evaluates the tier
    Play,
}

/// What a tracked action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReport {
    /// Action taken
    pub action: TierAction,
    /// Tier the action was performed in
    pub before: ConditionTier,
    /// Tier after the transition check
    pub after: ConditionTier,
    /// Damage dealt, for attacks
    pub damage: Option<i32>,
}

impl ActionReport {
    /// Returns `true` if the action moved the player to another tier.
    #[must_use]
    pub fn changed_tier(&self) -> bool {
        self.before != self.after
    }
}

/// Tracks one player's tier across actions.
///
/// Every action applies the current tier's [`TierProfile`] row and then runs
/// [`ConditionTier::next`]. Starts in [`ConditionTier::Healthy`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConditionTracker {
    tier: ConditionTier,
    rules: Rules,
}

impl ConditionTracker {
    /// Creates a tracker in the Healthy tier.
    #[must_use]
    pub fn new(rules: Rules) -> Self {
        Self {
            tier: ConditionTier::Healthy,
            rules,
        }
    }

    /// Returns the current tier.
    #[must_use]
    pub const fn tier(&self) -> ConditionTier {
        self.tier
    }

    /// Forces the tier, bypassing the transition rules.
    pub fn set_tier(&mut self, tier: ConditionTier) {
        if tier != self.tier {
            info!(from = %self.tier, to = %tier, "condition tier changed");
        }
        self.tier = tier;
    }

    /// Attacks `target` with the current tier's strength and cost.
    ///
    /// Deals `max(1, attack * attack_percent / 100 - target.defense)`.
    pub fn attack(&mut self, player: &mut Entity, target: &mut Entity) -> ActionReport {
        let profile = self.tier.profile();
        player.stats_mut().mana -= profile.attack_mana_cost;
        let attack = scale(player.stats().attack, profile.attack_percent);
        let damage = damage_between(attack, target.stats().defense);
        let health = &mut target.stats_mut().health;
        *health = health.saturating_sub(damage);
        debug!(
            tier = %self.tier,
            player = player.name(),
            target = target.name(),
            damage,
            "tier attack"
        );
        self.finish(TierAction::Attack, player, Some(damage))
    }

    /// Raises the player's defense by the tier's boost.
    pub fn defend(&mut self, player: &mut Entity) -> ActionReport {
        player.stats_mut().defense += self.tier.profile().defend_boost;
        self.finish(TierAction::Defend, player, None)
    }

    /// Restores health and adjusts mana per the tier.
    pub fn heal(&mut self, player: &mut Entity) -> ActionReport {
        let profile = self.tier.profile();
        let stats = player.stats_mut();
        stats.health += profile.heal_health;
        stats.mana += profile.heal_mana;
        self.finish(TierAction::Heal, player, None)
    }

    /// Takes an idle turn; only the transition check runs.
    pub fn play(&mut self, player: &Entity) -> ActionReport {
        self.finish(TierAction::Play, player, None)
    }

    fn finish(&mut self, action: TierAction, player: &Entity, damage: Option<i32>) -> ActionReport {
        let before = self.tier;
        if player.is_defeated() {
            info!(player = player.name(), "player has been defeated");
        } else {
            let after = before.next(player.vitals(), &self.rules);
            self.set_tier(after);
        }
        ActionReport {
            action,
            before,
            after: self.tier,
            damage,
        }
    }
}
