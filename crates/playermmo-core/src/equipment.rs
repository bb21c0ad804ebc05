//! Items and the stack of items a player is carrying.
//!
//! Each [`Item`] adds a flat modifier to one stat while equipped and
//! restyles one action. A [`Loadout`] is a LIFO stack: unequipping always
//! removes the most recently equipped item and exactly the modifier that
//! item applied.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::entity::{Entity, StatField};

/// Actions an item can restyle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemAction {
    /// Striking a target
    Attack,
    /// Raising a guard
    Defend,
    /// Restoring health
    Heal,
}

impl ItemAction {
    const fn verb(self) -> &'static str {
        match self {
            Self::Attack => "attacks",
            Self::Defend => "defends",
            Self::Heal => "heals",
        }
    }
}

/// Equippable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Item {
    /// +5 attack; restyles attacks
    Sword,
    /// +5 defense; restyles defending
    Shield,
    /// +10 mana; restyles healing
    Staff,
}

impl Item {
    /// Every item.
    pub const ALL: [Self; 3] = [Self::Sword, Self::Shield, Self::Staff];

    /// Stat and amount added while equipped.
    #[must_use]
    pub const fn modifier(self) -> (StatField, i32) {
        match self {
            Self::Sword => (StatField::Attack, 5),
            Self::Shield => (StatField::Defense, 5),
            Self::Staff => (StatField::Mana, 10),
        }
    }

    /// Action this item changes.
    #[must_use]
    pub const fn restyles(self) -> ItemAction {
        match self {
            Self::Sword => ItemAction::Attack,
            Self::Shield => ItemAction::Defend,
            Self::Staff => ItemAction::Heal,
        }
    }

    fn adjust(self, entity: &mut Entity, sign: i32) {
        let (field, amount) = self.modifier();
        let stats = entity.stats_mut();
        let value = stats.get(field) + sign * amount;
        stats.set(field, value);
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sword => "sword",
            Self::Shield => "shield",
            Self::Staff => "staff",
        };
        f.write_str(name)
    }
}

/// Items a player is carrying, newest last.
///
/// # Example
///
/// ```
/// use playermmo_core::entity::{Entity, Stats};
/// use playermmo_core::equipment::{Item, ItemAction, Loadout};
///
/// let mut hero = Entity::player("Hero", Stats::default());
/// let mut loadout = Loadout::new();
///
/// loadout.equip(&mut hero, Item::Shield);
/// loadout.equip(&mut hero, Item::Sword);
/// assert_eq!(hero.stats().attack, 15);
/// assert_eq!(loadout.style(ItemAction::Defend), Some(Item::Shield));
///
/// assert_eq!(loadout.unequip(&mut hero), Some(Item::Sword));
/// assert_eq!(hero.stats().attack, 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadout {
    items: Vec<Item>,
}

impl Loadout {
    /// Creates an empty loadout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `item`'s modifier to `entity` and pushes it.
    pub fn equip(&mut self, entity: &mut Entity, item: Item) {
        item.adjust(entity, 1);
        self.items.push(item);
        info!(player = entity.name(), %item, "item equipped");
    }

    /// Pops the newest item and removes its modifier.
    pub fn unequip(&mut self, entity: &mut Entity) -> Option<Item> {
        let item = self.items.pop()?;
        item.adjust(entity, -1);
        info!(player = entity.name(), %item, "item unequipped");
        Some(item)
    }

    /// Unequips everything, newest first. Returns the removed items in
    /// removal order.
    pub fn unequip_all(&mut self, entity: &mut Entity) -> Vec<Item> {
        let mut removed = Vec::with_capacity(self.items.len());
        while let Some(item) = self.unequip(entity) {
            removed.push(item);
        }
        removed
    }

    /// Topmost item restyling `action`, or `None` when bare-handed.
    #[must_use]
    pub fn style(&self, action: ItemAction) -> Option<Item> {
        self.items
            .iter()
            .rev()
            .copied()
            .find(|item| item.restyles() == action)
    }

    /// Narration for `name` performing `action` with this loadout.
    #[must_use]
    pub fn describe(&self, name: &str, action: ItemAction) -> String {
        match self.style(action) {
            Some(item) => format!("{name} {} with {item}", action.verb()),
            None => format!("{name} {}", action.verb()),
        }
    }

    /// Equipped items, oldest first.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of equipped items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when nothing is equipped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
