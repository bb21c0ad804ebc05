//! Fluent construction of player entities.

use super::{Entity, Stats};

const DEFAULT_NAME: &str = "Default Player";

/// Step-by-step player construction.
///
/// Unset fields fall back to the [`Stats::default`] line and the name
/// `"Default Player"`. The builder keeps its state after [`build`](Self::build)
/// so a configured template can stamp out several players; call
/// [`reset`](Self::reset) to start over.
///
/// # Example
///
/// ```
/// use playermmo_core::entity::PlayerBuilder;
///
/// let hero = PlayerBuilder::new().name("Hero").attack(15).level(5).build();
///
/// assert_eq!(hero.name(), "Hero");
/// assert_eq!(hero.stats().attack, 15);
/// assert_eq!(hero.stats().health, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerBuilder {
    name: String,
    stats: Stats,
}

impl Default for PlayerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerBuilder {
    /// Creates a builder holding the default player line.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            stats: Stats::default(),
        }
    }

    /// Sets the player's name.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Sets starting health.
    pub fn health(&mut self, health: i32) -> &mut Self {
        self.stats.health = health;
        self
    }

    /// Sets starting mana.
    pub fn mana(&mut self, mana: i32) -> &mut Self {
        self.stats.mana = mana;
        self
    }

    /// Sets attack power.
    pub fn attack(&mut self, attack: i32) -> &mut Self {
        self.stats.attack = attack;
        self
    }

    /// Sets defense.
    pub fn defense(&mut self, defense: i32) -> &mut Self {
        self.stats.defense = defense;
        self
    }

    /// Sets the level.
    pub fn level(&mut self, level: i32) -> &mut Self {
        self.stats.level = level;
        self
    }

    /// Builds a player from the current settings.
    #[must_use]
    pub fn build(&self) -> Entity {
        Entity::player(self.name.clone(), self.stats)
    }

    /// Restores every setting to its default.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::new();
        self
    }
}

/// Level 5 warrior: 150 health, 30 mana, 20 attack, 15 defense.
#[must_use]
pub fn warrior(name: impl Into<String>) -> Entity {
    PlayerBuilder::new()
        .name(name)
        .health(150)
        .mana(30)
        .attack(20)
        .defense(15)
        .level(5)
        .build()
}

/// Level 5 mage: 80 health, 120 mana, 15 attack, 5 defense.
#[must_use]
pub fn mage(name: impl Into<String>) -> Entity {
    PlayerBuilder::new()
        .name(name)
        .health(80)
        .mana(120)
        .attack(15)
        .defense(5)
        .level(5)
        .build()
}

/// Level 5 rogue: 100 health, 60 mana, 18 attack, 8 defense.
#[must_use]
pub fn rogue(name: impl Into<String>) -> Entity {
    PlayerBuilder::new()
        .name(name)
        .health(100)
        .mana(60)
        .attack(18)
        .defense(8)
        .level(5)
        .build()
}
