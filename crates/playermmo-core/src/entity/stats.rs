//! Numeric attributes shared by players and monsters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mutable attributes of an entity.
///
/// `Default` yields the stat line of a freshly created player:
/// 100 health, 50 mana, 10 attack, 5 defense, level 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    /// Hit points. May go negative.
    pub health: i32,
    /// Spendable resource. May go negative.
    pub mana: i32,
    /// Attack power
    pub attack: i32,
    /// Flat damage reduction
    pub defense: i32,
    /// Character level, scales maximum health
    pub level: i32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            health: 100,
            mana: 50,
            attack: 10,
            defense: 5,
            level: 1,
        }
    }
}

impl Stats {
    /// Reads a single field.
    #[must_use]
    pub const fn get(&self, field: StatField) -> i32 {
        match field {
            StatField::Health => self.health,
            StatField::Mana => self.mana,
            StatField::Attack => self.attack,
            StatField::Defense => self.defense,
            StatField::Level => self.level,
        }
    }

    /// Overwrites a single field.
    pub fn set(&mut self, field: StatField, value: i32) {
        match field {
            StatField::Health => self.health = value,
            StatField::Mana => self.mana = value,
            StatField::Attack => self.attack = value,
            StatField::Defense => self.defense = value,
            StatField::Level => self.level = value,
        }
    }

    /// Returns the subset of stats the condition tiers are derived from.
    #[must_use]
    pub const fn vitals(&self) -> Vitals {
        Vitals {
            health: self.health,
            mana: self.mana,
            level: self.level,
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Health: {}, Mana: {}, Attack: {}, Defense: {}, Level: {}",
            self.health, self.mana, self.attack, self.defense, self.level
        )
    }
}

/// Names one field of [`Stats`].
///
/// Used by command snapshots to record exactly which values an action
/// overwrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatField {
    /// [`Stats::health`]
    Health,
    /// [`Stats::mana`]
    Mana,
    /// [`Stats::attack`]
    Attack,
    /// [`Stats::defense`]
    Defense,
    /// [`Stats::level`]
    Level,
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Health => "health",
            Self::Mana => "mana",
            Self::Attack => "attack",
            Self::Defense => "defense",
            Self::Level => "level",
        };
        f.write_str(name)
    }
}

/// Health, mana and level: the inputs of condition-tier classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vitals {
    /// Current health
    pub health: i32,
    /// Current mana
    pub mana: i32,
    /// Current level
    pub level: i32,
}

impl Vitals {
    /// Creates a vitals triple.
    #[must_use]
    pub const fn new(health: i32, mana: i32, level: i32) -> Self {
        Self {
            health,
            mana,
            level,
        }
    }
}
