//! Entity module for the player vs. monster model.
//!
//! This module provides the core entity types:
//! - [`EntityId`]: Unique identifier assigned by the [`Arena`](crate::arena::Arena)
//! - [`EntityKind`]: Closed classification tag (player or monster)
//! - [`Stats`]: The mutable numeric attributes of an entity
//! - [`Entity`]: The complete entity record
//!
//! # Example
//!
//! ```
//! use playermmo_core::entity::{Entity, EntityKind, Stats};
//!
//! let goblin = Entity::monster("Goblin", 5, 12, 60, 3);
//!
//! assert_eq!(goblin.kind(), EntityKind::Monster);
//! assert_eq!(goblin.stats().mana, 0);
//! assert_eq!(goblin.stats().attack, 12);
//! ```

pub mod builder;
pub mod convert;
pub mod stats;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use builder::{mage, rogue, warrior, PlayerBuilder};
pub use stats::{StatField, Stats, Vitals};

/// Unique identifier for an entity.
///
/// `EntityId` is a newtype wrapper around `u64`. Ids are handed out by the
/// arena in increasing order and never reused, so ordering by id is the same
/// as ordering by spawn time.
///
/// # Example
///
/// ```
/// use playermmo_core::entity::EntityId;
///
/// let id1 = EntityId::new(1);
/// let id2 = EntityId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Entity classification.
///
/// Players spend mana on strategies and tier actions; monsters never carry
/// mana. Behaviour that differs between the two is selected by matching on
/// this tag, never by inspecting concrete types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Player-controlled character
    Player,
    /// Hostile creature
    Monster,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::Monster => write!(f, "Monster"),
        }
    }
}

/// A player or monster record.
///
/// The numeric attributes live in [`Stats`] and are mutated in place by the
/// combat, strategy and condition modules. Nothing clamps them at zero:
/// health and mana may go negative, and [`Entity::is_defeated`] is the single
/// place that interprets `health <= 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    kind: EntityKind,
    name: String,
    stats: Stats,
}

impl Entity {
    /// Creates a new entity.
    #[must_use]
    pub fn new(kind: EntityKind, name: impl Into<String>, stats: Stats) -> Self {
        Self {
            kind,
            name: name.into(),
            stats,
        }
    }

    /// Creates a player with the given stats.
    #[must_use]
    pub fn player(name: impl Into<String>, stats: Stats) -> Self {
        Self::new(EntityKind::Player, name, stats)
    }

    /// Creates a monster. Monsters never carry mana.
    ///
    /// Argument order follows the monster stat line: defense, attack,
    /// health, level.
    #[must_use]
    pub fn monster(
        name: impl Into<String>,
        defense: i32,
        attack: i32,
        health: i32,
        level: i32,
    ) -> Self {
        Self::new(
            EntityKind::Monster,
            name,
            Stats {
                health,
                mana: 0,
                attack,
                defense,
                level,
            },
        )
    }

    /// Returns the entity's kind tag.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns the entity's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the entity's stats.
    #[must_use]
    pub const fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Returns mutable access to the entity's stats.
    #[must_use]
    pub fn stats_mut(&mut self) -> &mut Stats {
        &mut self.stats
    }

    /// Returns the current health, mana and level.
    #[must_use]
    pub const fn vitals(&self) -> Vitals {
        self.stats.vitals()
    }

    /// Returns `true` if this entity is a player.
    #[must_use]
    pub const fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player)
    }

    /// Returns `true` if this entity is a monster.
    #[must_use]
    pub const fn is_monster(&self) -> bool {
        matches!(self.kind, EntityKind::Monster)
    }

    /// Returns `true` once health has dropped to zero or below.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.stats.health <= 0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.stats)
    }
}
