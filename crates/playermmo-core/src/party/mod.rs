//! Parties: named groups of entities that can nest.
//!
//! A [`Party`] holds [`Member`]s, each either an entity id or another party,
//! so groups form a tree. Operations on a party reach every entity in the
//! tree in depth-first insertion order. Parties only store ids; the entities
//! themselves stay in the [`Arena`].
//!
//! Walking a party one member at a time is done with a [`PartyCursor`].
//!
//! # Example
//!
//! ```
//! use playermmo_core::arena::Arena;
//! use playermmo_core::entity::{Entity, Stats};
//! use playermmo_core::party::{Member, Party};
//!
//! let mut arena = Arena::new();
//! let alice = arena.spawn(Entity::player("Alice", Stats::default()));
//! let goblin = arena.spawn(Entity::monster("Goblin", 3, 7, 30, 1));
//!
//! let mut squad = Party::new("Alpha Squad", None, &arena)?;
//! squad.add(Member::Entity(alice));
//!
//! let mut alliance = Party::new("Alliance", None, &arena)?;
//! alliance.add(Member::Party(squad));
//!
//! let damage = alliance.attack(&mut arena, goblin)?;
//! assert_eq!(damage, 7);
//! assert_eq!(alliance.member_ids(), vec![alice]);
//! # Ok::<(), playermmo_core::error::GameError>(())
//! ```

pub mod cursor;

pub use cursor::PartyCursor;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::arena::Arena;
use crate::entity::EntityId;
use crate::error::{CommandError, PartyError};
use crate::resolver::damage_between;

/// Name used when neither a name nor a resolvable leader is available.
const UNNAMED_PARTY: &str = "Unnamed Party";

/// One slot in a party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Member {
    /// A single entity
    Entity(EntityId),
    /// A nested party
    Party(Party),
}

/// A named, possibly nested group of entities.
///
/// The leader is recorded separately and is not a member unless added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    name: String,
    leader: Option<EntityId>,
    members: Vec<Member>,
}

impl Party {
    /// Creates an empty party.
    ///
    /// A blank `name` is replaced by the leader's name.
    ///
    /// # Errors
    ///
    /// Returns [`PartyError::Unnamed`] when `name` is blank and there is no
    /// leader.
    pub fn new(name: &str, leader: Option<EntityId>, arena: &Arena) -> Result<Self, PartyError> {
        let name = name.trim();
        let name = match (name.is_empty(), leader) {
            (false, _) => name.to_string(),
            (true, None) => return Err(PartyError::Unnamed),
            (true, Some(id)) => arena
                .get(id)
                .map_or_else(|| UNNAMED_PARTY.to_string(), |e| e.name().to_string()),
        };
        Ok(Self {
            name,
            leader,
            members: Vec::new(),
        })
    }

    /// Party name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Party leader, if any.
    #[must_use]
    pub const fn leader(&self) -> Option<EntityId> {
        self.leader
    }

    /// Replaces the leader.
    pub fn set_leader(&mut self, leader: Option<EntityId>) {
        self.leader = leader;
    }

    /// Direct members, in insertion order.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Adds a member. Returns `false` if that entity is already a direct
    /// member.
    pub fn add(&mut self, member: Member) -> bool {
        if self.members.contains(&member) {
            return false;
        }
        if let Member::Entity(id) = member {
            debug!(party = %self.name, entity = %id, "member joined");
        }
        self.members.push(member);
        true
    }

    /// Removes a direct entity member. Returns `true` if it was present.
    pub fn remove(&mut self, id: EntityId) -> bool {
        let before = self.members.len();
        self.members
            .retain(|member| !matches!(member, Member::Entity(existing) if *existing == id));
        before != self.members.len()
    }

    /// Removes and returns a direct sub-party by name.
    pub fn remove_party(&mut self, name: &str) -> Option<Self> {
        let index = self
            .members
            .iter()
            .position(|member| matches!(member, Member::Party(party) if party.name == name))?;
        match self.members.remove(index) {
            Member::Party(party) => Some(party),
            Member::Entity(_) => None,
        }
    }

    /// Drops every member. The leader is kept.
    pub fn disband(&mut self) {
        self.members.clear();
        info!(party = %self.name, "party has been disbanded");
    }

    /// Number of entities in the whole tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members
            .iter()
            .map(|member| match member {
                Member::Entity(_) => 1,
                Member::Party(party) => party.len(),
            })
            .sum()
    }

    /// Returns `true` when the tree holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every entity id in the tree, depth-first.
    #[must_use]
    pub fn member_ids(&self) -> Vec<EntityId> {
        let mut ids = Vec::with_capacity(self.members.len());
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, ids: &mut Vec<EntityId>) {
        for member in &self.members {
            match member {
                Member::Entity(id) => ids.push(*id),
                Member::Party(party) => party.collect_ids(ids),
            }
        }
    }

    /// Every living member strikes `target` once, depth-first.
    ///
    /// Members missing from the arena, already defeated, or equal to the
    /// target are skipped, and striking stops as soon as the target falls.
    /// Returns the total damage dealt.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::EntityNotFound`] if `target` is not in the
    /// arena.
    pub fn attack(&self, arena: &mut Arena, target: EntityId) -> Result<i32, CommandError> {
        if !arena.contains(target) {
            return Err(CommandError::EntityNotFound(target));
        }
        info!(party = %self.name, %target, "party attacks");

        let mut total = 0;
        for id in self.member_ids() {
            let Some((member, victim)) = arena.get_pair_mut(id, target) else {
                continue;
            };
            if victim.is_defeated() {
                break;
            }
            if member.is_defeated() {
                continue;
            }
            let damage = damage_between(member.stats().attack, victim.stats().defense);
            victim.stats_mut().health -= damage;
            debug!(member = member.name(), target = victim.name(), damage, "party strike");
            total += damage;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, Stats};

    fn fighter(arena: &mut Arena, name: &str, attack: i32) -> EntityId {
        arena.spawn(Entity::player(
            name,
            Stats {
                attack,
                ..Stats::default()
            },
        ))
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn named_party() {
            let arena = Arena::new();
            let party = Party::new("Alpha Squad", None, &arena).unwrap();
            assert_eq!(party.name(), "Alpha Squad");
            assert!(party.is_empty());
        }

        #[test]
        fn blank_name_without_leader_is_rejected() {
            let arena = Arena::new();
            assert_eq!(Party::new("   ", None, &arena), Err(PartyError::Unnamed));
        }

        #[test]
        fn blank_name_borrows_leader_name() {
            let mut arena = Arena::new();
            let alice = fighter(&mut arena, "Alice", 10);

            let party = Party::new("", Some(alice), &arena).unwrap();

            assert_eq!(party.name(), "Alice");
            assert_eq!(party.leader(), Some(alice));
            assert!(party.is_empty());
        }

        #[test]
        fn unknown_leader_falls_back() {
            let arena = Arena::new();
            let party = Party::new("", Some(EntityId::new(9)), &arena).unwrap();
            assert_eq!(party.name(), "Unnamed Party");
        }
    }

    mod membership_tests {
        use super::*;

        #[test]
        fn duplicates_are_ignored() {
            let arena = Arena::new();
            let mut party = Party::new("Squad", None, &arena).unwrap();
            let id = EntityId::new(1);

            assert!(party.add(Member::Entity(id)));
            assert!(!party.add(Member::Entity(id)));
            assert_eq!(party.len(), 1);
        }

        #[test]
        fn nested_ids_are_depth_first() {
            let arena = Arena::new();
            let mut heroes = Party::new("Heroes", None, &arena).unwrap();
            heroes.add(Member::Entity(EntityId::new(1)));
            heroes.add(Member::Entity(EntityId::new(2)));
            let mut mob = Party::new("Mob", None, &arena).unwrap();
            mob.add(Member::Entity(EntityId::new(3)));

            let mut alliance = Party::new("Alliance", None, &arena).unwrap();
            alliance.add(Member::Entity(EntityId::new(0)));
            alliance.add(Member::Party(heroes));
            alliance.add(Member::Party(mob));

            assert_eq!(alliance.len(), 4);
            assert_eq!(
                alliance.member_ids(),
                vec![
                    EntityId::new(0),
                    EntityId::new(1),
                    EntityId::new(2),
                    EntityId::new(3)
                ]
            );
        }

        #[test]
        fn remove_and_remove_party() {
            let arena = Arena::new();
            let mut inner = Party::new("Inner", None, &arena).unwrap();
            inner.add(Member::Entity(EntityId::new(5)));
            let mut outer = Party::new("Outer", None, &arena).unwrap();
            outer.add(Member::Entity(EntityId::new(4)));
            outer.add(Member::Party(inner));

            assert!(outer.remove(EntityId::new(4)));
            assert!(!outer.remove(EntityId::new(4)));

            let inner = outer.remove_party("Inner").unwrap();
            assert_eq!(inner.member_ids(), vec![EntityId::new(5)]);
            assert!(outer.is_empty());
            assert!(outer.remove_party("Inner").is_none());
        }

        #[test]
        fn disband_clears_members() {
            let arena = Arena::new();
            let mut party = Party::new("Squad", Some(EntityId::new(0)), &arena).unwrap();
            party.add(Member::Entity(EntityId::new(1)));

            party.disband();

            assert!(party.is_empty());
            assert_eq!(party.leader(), Some(EntityId::new(0)));
        }
    }

    mod attack_tests {
        use super::*;

        #[test]
        fn every_member_strikes_once() {
            let mut arena = Arena::new();
            let alice = fighter(&mut arena, "Alice", 10);
            let bob = fighter(&mut arena, "Bob", 20);
            let orc = arena.spawn(Entity::monster("Orc", 5, 12, 50, 2));
            let mut party = Party::new("Squad", None, &arena).unwrap();
            party.add(Member::Entity(alice));
            party.add(Member::Entity(bob));

            let total = party.attack(&mut arena, orc).unwrap();

            assert_eq!(total, 5 + 15);
            assert_eq!(arena.get(orc).unwrap().stats().health, 30);
        }

        #[test]
        fn defeated_and_missing_members_sit_out() {
            let mut arena = Arena::new();
            let alice = fighter(&mut arena, "Alice", 10);
            let fallen = fighter(&mut arena, "Fallen", 50);
            arena.get_mut(fallen).unwrap().stats_mut().health = 0;
            let orc = arena.spawn(Entity::monster("Orc", 5, 12, 50, 2));
            let mut party = Party::new("Squad", None, &arena).unwrap();
            party.add(Member::Entity(fallen));
            party.add(Member::Entity(EntityId::new(77)));
            party.add(Member::Entity(alice));
            party.add(Member::Entity(orc));

            let total = party.attack(&mut arena, orc).unwrap();

            assert_eq!(total, 5);
        }

        #[test]
        fn stops_once_target_falls() {
            let mut arena = Arena::new();
            let a = fighter(&mut arena, "A", 100);
            let b = fighter(&mut arena, "B", 100);
            let bat = arena.spawn(Entity::monster("Cave Bat", 4, 8, 30, 1));
            let mut party = Party::new("Squad", None, &arena).unwrap();
            party.add(Member::Entity(a));
            party.add(Member::Entity(b));

            let total = party.attack(&mut arena, bat).unwrap();

            assert_eq!(total, 96);
            assert_eq!(arena.get(bat).unwrap().stats().health, -66);
        }

        #[test]
        fn missing_target_is_an_error() {
            let mut arena = Arena::new();
            let party = Party::new("Squad", None, &arena).unwrap();
            let ghost = EntityId::new(3);
            assert_eq!(
                party.attack(&mut arena, ghost),
                Err(CommandError::EntityNotFound(ghost))
            );
        }
    }
}
