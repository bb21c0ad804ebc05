//! Tunable rules for condition tiers, commands and scoring.
//!
//! Every field has a default matching the classic rule set, so an empty JSON
//! object is a valid rules document:
//!
//! ```
//! use playermmo_core::config::Rules;
//!
//! let rules = Rules::from_json("{}").unwrap();
//! assert_eq!(rules, Rules::default());
//!
//! let tuned = Rules::from_json(r#"{ "heal_amount": 35 }"#).unwrap();
//! assert_eq!(tuned.heal_amount, 35);
//! assert_eq!(tuned.low_mana_threshold, 20);
//! ```

use serde::{Deserialize, Serialize};

use crate::entity::Vitals;
use crate::error::ConfigError;

/// Thresholds and default magnitudes used across the crate.
///
/// Health thresholds are whole percentages of maximum health, where maximum
/// health is `base_max_health + (level - 1) * health_per_level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Maximum health at level 1
    pub base_max_health: i32,
    /// Maximum health gained per level above 1
    pub health_per_level: i32,
    /// At or below this percentage of max health an entity is critical
    pub critical_percent: i32,
    /// At or below this percentage of max health an entity is injured
    pub injured_percent: i32,
    /// Above this percentage an injured or critical entity is healthy again
    pub recovered_percent: i32,
    /// Mana strictly below this is "low"
    pub low_mana_threshold: i32,
    /// Mana an exhausted entity needs before its health is re-evaluated
    pub mana_recovery_threshold: i32,
    /// Default amount restored by a heal command
    pub heal_amount: i32,
    /// Default defense gained by a defend command
    pub defend_boost: i32,
    /// Score awarded when a session combat defeats a monster
    pub defeat_bounty: i64,
    /// Advancing to level N awards `N * level_score_multiplier`
    pub level_score_multiplier: i64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            base_max_health: 100,
            health_per_level: 10,
            critical_percent: 30,
            injured_percent: 50,
            recovered_percent: 80,
            low_mana_threshold: 20,
            mana_recovery_threshold: 30,
            heal_amount: 20,
            defend_boost: 5,
            defeat_bounty: 50,
            level_score_multiplier: 100,
        }
    }
}

impl Rules {
    /// Parses and validates a JSON rules document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when thresholds are out of order.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let rules: Self = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Checks that the thresholds describe a sensible ladder.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_max_health <= 0 {
            return Err(ConfigError::Invalid {
                field: "base_max_health",
                reason: format!("must be positive, got {}", self.base_max_health),
            });
        }
        if self.critical_percent >= self.injured_percent {
            return Err(ConfigError::Invalid {
                field: "critical_percent",
                reason: format!(
                    "must be below injured_percent ({} >= {})",
                    self.critical_percent, self.injured_percent
                ),
            });
        }
        if self.injured_percent >= self.recovered_percent {
            return Err(ConfigError::Invalid {
                field: "injured_percent",
                reason: format!(
                    "must be below recovered_percent ({} >= {})",
                    self.injured_percent, self.recovered_percent
                ),
            });
        }
        if self.recovered_percent > 100 {
            return Err(ConfigError::Invalid {
                field: "recovered_percent",
                reason: format!("must be at most 100, got {}", self.recovered_percent),
            });
        }
        Ok(())
    }

    /// Maximum health at `level`, never below 1.
    #[must_use]
    pub fn max_health(&self, level: i32) -> i32 {
        let max = i64::from(self.base_max_health)
            + (i64::from(level) - 1) * i64::from(self.health_per_level);
        i32::try_from(max.max(1)).unwrap_or(i32::MAX)
    }

    /// Health as a fraction of maximum health. For reporting only; tier
    /// decisions use [`health_at_most`](Self::health_at_most).
    #[must_use]
    pub fn health_percentage(&self, vitals: Vitals) -> f64 {
        f64::from(vitals.health) / f64::from(self.max_health(vitals.level))
    }

    /// Exact test of `health / max_health <= percent / 100`.
    #[must_use]
    pub fn health_at_most(&self, vitals: Vitals, percent: i32) -> bool {
        let max = i64::from(self.max_health(vitals.level));
        i64::from(vitals.health) * 100 <= i64::from(percent) * max
    }

    /// Returns `true` when mana is below the low-mana threshold.
    #[must_use]
    pub const fn has_low_mana(&self, vitals: Vitals) -> bool {
        vitals.mana < self.low_mana_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_health_grows_with_level() {
        let rules = Rules::default();
        assert_eq!(rules.max_health(1), 100);
        assert_eq!(rules.max_health(5), 140);
        assert_eq!(rules.max_health(-50), 1);
        assert_eq!(rules.max_health(i32::MAX), i32::MAX);
        assert_eq!(rules.max_health(i32::MIN), 1);
    }

    #[test]
    fn health_percentage_uses_level() {
        let rules = Rules::default();
        let pct = rules.health_percentage(Vitals::new(25, 50, 1));
        assert!((pct - 0.25).abs() < 1e-9);

        let pct = rules.health_percentage(Vitals::new(70, 50, 5));
        assert!((pct - 0.5).abs() < 1e-9);
    }

    #[test]
    fn threshold_comparison_is_inclusive() {
        let rules = Rules::default();
        assert!(rules.health_at_most(Vitals::new(30, 50, 1), 30));
        assert!(!rules.health_at_most(Vitals::new(31, 50, 1), 30));
        // 42 / 140 = 0.3 exactly
        assert!(rules.health_at_most(Vitals::new(42, 50, 5), 30));
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let rules = Rules::from_json(r#"{ "defend_boost": 9 }"#).unwrap();
        assert_eq!(rules.defend_boost, 9);
        assert_eq!(rules.heal_amount, 20);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = Rules::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn out_of_order_thresholds_rejected() {
        let err = Rules::from_json(r#"{ "critical_percent": 60 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "critical_percent",
                ..
            }
        ));

        let err = Rules::from_json(r#"{ "recovered_percent": 120 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "recovered_percent",
                ..
            }
        ));
    }

    #[test]
    fn nonpositive_base_health_rejected() {
        let err = Rules::from_json(r#"{ "base_max_health": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "base_max_health",
                ..
            }
        ));
    }
}
