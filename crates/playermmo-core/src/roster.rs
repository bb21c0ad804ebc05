//! Player classes and a registry that creates players by class name.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::entity::{Entity, Stats};
use crate::error::RosterError;

/// Built-in player classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerClass {
    /// High health and defense, little mana
    Warrior,
    /// Fragile spellcaster with a deep mana pool
    Mage,
    /// Balanced striker
    Rogue,
    /// Armoured support
    Paladin,
}

impl PlayerClass {
    /// Every built-in class.
    pub const ALL: [Self; 4] = [Self::Warrior, Self::Mage, Self::Rogue, Self::Paladin];

    /// Level 1 stat line for the class.
    #[must_use]
    pub const fn stats(self) -> Stats {
        let (health, mana, attack, defense) = match self {
            Self::Warrior => (180, 30, 25, 18),
            Self::Mage => (80, 120, 18, 3),
            Self::Rogue => (120, 70, 22, 8),
            Self::Paladin => (160, 90, 16, 25),
        };
        Stats {
            health,
            mana,
            attack,
            defense,
            level: 1,
        }
    }

    /// Creates a player of this class.
    #[must_use]
    pub fn create(self, name: impl Into<String>) -> Entity {
        let player = Entity::player(name, self.stats());
        info!(class = %self, player = player.name(), "player created");
        player
    }

    /// Lower-case registry key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Warrior => "warrior",
            Self::Mage => "mage",
            Self::Rogue => "rogue",
            Self::Paladin => "paladin",
        }
    }
}

impl fmt::Display for PlayerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Warrior => "Warrior",
            Self::Mage => "Mage",
            Self::Rogue => "Rogue",
            Self::Paladin => "Paladin",
        };
        f.write_str(name)
    }
}

/// Stat templates keyed by case-insensitive class name.
///
/// Starts with the four built-in classes; more can be added with
/// [`register`](Self::register).
///
/// # Example
///
/// ```
/// use playermmo_core::roster::ClassRegistry;
///
/// let registry = ClassRegistry::new();
/// assert_eq!(registry.available(), vec!["mage", "paladin", "rogue", "warrior"]);
///
/// let thorin = registry.create("Warrior", "Thorin");
/// assert_eq!(thorin.stats().health, 180);
///
/// assert!(registry.try_create("necromancer", "DarkLord").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRegistry {
    templates: BTreeMap<String, Stats>,
}

impl ClassRegistry {
    /// Creates a registry holding the built-in classes.
    #[must_use]
    pub fn new() -> Self {
        let templates = PlayerClass::ALL
            .into_iter()
            .map(|class| (class.key().to_string(), class.stats()))
            .collect();
        Self { templates }
    }

    /// Adds or replaces the template for `class`.
    pub fn register(&mut self, class: &str, template: Stats) {
        let key = class.to_lowercase();
        info!(class = %key, "player class registered");
        self.templates.insert(key, template);
    }

    /// Registered class names, sorted.
    #[must_use]
    pub fn available(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    /// Template for `class`, if registered.
    #[must_use]
    pub fn template(&self, class: &str) -> Option<&Stats> {
        self.templates.get(&class.to_lowercase())
    }

    /// Creates a player of `class`.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::UnknownClass`] if `class` is not registered.
    pub fn try_create(&self, class: &str, name: &str) -> Result<Entity, RosterError> {
        let template = self
            .template(class)
            .ok_or_else(|| RosterError::UnknownClass(class.to_string()))?;
        Ok(Entity::player(name, *template))
    }

    /// Creates a player of `class`, or a default player (with a warning) if
    /// the class is unknown.
    #[must_use]
    pub fn create(&self, class: &str, name: &str) -> Entity {
        self.try_create(class, name).unwrap_or_else(|err| {
            warn!(%err, player = name, "creating default player");
            Entity::player(name, Stats::default())
        })
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}
