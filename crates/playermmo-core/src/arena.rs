//! Arena: the container every command and session operates on.
//!
//! Entities are stored in a `BTreeMap` keyed by [`EntityId`], so iteration
//! order is always ascending id order. Ids come from a monotonically
//! increasing counter and are never reused, even after a despawn.
//!
//! # Example
//!
//! ```
//! use playermmo_core::arena::Arena;
//! use playermmo_core::entity::{Entity, Stats};
//!
//! let mut arena = Arena::new();
//! let hero = arena.spawn(Entity::player("Hero", Stats::default()));
//! let goblin = arena.spawn(Entity::monster("Goblin", 5, 12, 60, 3));
//!
//! let ids: Vec<_> = arena.ids().collect();
//! assert_eq!(ids, vec![hero, goblin]);
//! assert_eq!(arena.get(goblin).unwrap().name(), "Goblin");
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId};

/// Id-addressed entity storage with deterministic iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arena {
    next_id: u64,
    entities: BTreeMap<EntityId, Entity>,
}

impl Arena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entity` and returns its freshly assigned id.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, entity);
        id
    }

    /// Removes an entity, returning it if it was present.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Returns `true` if `id` is present.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Looks up an entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Looks up an entity mutably.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Borrows two distinct entities mutably at once.
    ///
    /// Returns `None` if `a == b` or either id is missing. The references
    /// come back in argument order.
    #[must_use]
    pub fn get_pair_mut(&mut self, a: EntityId, b: EntityId) -> Option<(&mut Entity, &mut Entity)> {
        if a == b {
            return None;
        }
        let mut first = None;
        let mut second = None;
        for (id, entity) in &mut self.entities {
            if *id == a {
                first = Some(entity);
            } else if *id == b {
                second = Some(entity);
            }
        }
        Some((first?, second?))
    }

    /// Entity ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// `(id, entity)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.entities.iter().map(|(id, entity)| (*id, entity))
    }

    /// Number of entities held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` when no entities are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Stats;

    fn goblin() -> Entity {
        Entity::monster("Goblin", 5, 12, 60, 3)
    }

    #[test]
    fn new_arena_is_empty() {
        let arena = Arena::new();
        assert!(arena.is_empty());
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn spawn_assigns_sequential_ids() {
        let mut arena = Arena::new();
        let a = arena.spawn(goblin());
        let b = arena.spawn(goblin());
        let c = arena.spawn(goblin());

        assert_eq!(a, EntityId::new(0));
        assert_eq!(b, EntityId::new(1));
        assert_eq!(c, EntityId::new(2));
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn ids_are_not_reused_after_despawn() {
        let mut arena = Arena::new();
        let a = arena.spawn(goblin());
        let b = arena.spawn(goblin());

        assert!(arena.despawn(a).is_some());
        let c = arena.spawn(goblin());

        assert_eq!(c, EntityId::new(2));
        assert_eq!(arena.ids().collect::<Vec<_>>(), vec![b, c]);
    }

    #[test]
    fn despawn_missing_returns_none() {
        let mut arena = Arena::new();
        assert!(arena.despawn(EntityId::new(7)).is_none());
    }

    #[test]
    fn get_mut_persists_changes() {
        let mut arena = Arena::new();
        let id = arena.spawn(goblin());

        arena.get_mut(id).unwrap().stats_mut().health = 5;

        assert_eq!(arena.get(id).unwrap().stats().health, 5);
    }

    #[test]
    fn pair_comes_back_in_argument_order() {
        let mut arena = Arena::new();
        let hero = arena.spawn(Entity::player("Hero", Stats::default()));
        let monster = arena.spawn(goblin());

        let (first, second) = arena.get_pair_mut(monster, hero).unwrap();
        assert_eq!(first.name(), "Goblin");
        assert_eq!(second.name(), "Hero");
    }

    #[test]
    fn pair_rejects_same_or_missing_ids() {
        let mut arena = Arena::new();
        let hero = arena.spawn(Entity::player("Hero", Stats::default()));

        assert!(arena.get_pair_mut(hero, hero).is_none());
        assert!(arena.get_pair_mut(hero, EntityId::new(99)).is_none());
    }

    #[test]
    fn serialization_keeps_id_counter() {
        let mut arena = Arena::new();
        arena.spawn(goblin());
        arena.spawn(goblin());

        let json = serde_json::to_string(&arena).unwrap();
        let mut restored: Arena = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, arena);
        assert_eq!(restored.spawn(goblin()), EntityId::new(2));
    }
}
