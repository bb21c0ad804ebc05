//! Resettable cursors over a party's members.
//!
//! A cursor copies the party's member ids when it is created, so later
//! changes to the party do not disturb a walk in progress.

use crate::arena::Arena;
use crate::entity::{Entity, EntityId};
use crate::error::CursorError;

use super::Party;

/// Explicit position over a snapshot of member ids.
///
/// Use [`has_next`](Self::has_next) / [`advance`](Self::advance) for
/// step-by-step walks, or treat it as a regular [`Iterator`].
///
/// # Example
///
/// ```
/// use playermmo_core::arena::Arena;
/// use playermmo_core::entity::{Entity, Stats};
/// use playermmo_core::party::{Member, Party, PartyCursor};
///
/// let mut arena = Arena::new();
/// let mut heroes = Party::new("The Heroes", None, &arena).unwrap();
/// for name in ["Aragorn", "Legolas", "Gimli"] {
///     heroes.add(Member::Entity(arena.spawn(Entity::player(name, Stats::default()))));
/// }
///
/// let mut cursor = PartyCursor::reverse(&heroes);
/// let first = cursor.advance().unwrap();
/// assert_eq!(arena.get(first).unwrap().name(), "Gimli");
/// assert_eq!(cursor.count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyCursor {
    party: String,
    ids: Vec<EntityId>,
    position: usize,
    current: Option<EntityId>,
}

impl PartyCursor {
    fn over(party: &Party, ids: Vec<EntityId>) -> Self {
        Self {
            party: party.name().to_string(),
            ids,
            position: 0,
            current: None,
        }
    }

    /// Visits members depth-first in insertion order.
    #[must_use]
    pub fn forward(party: &Party) -> Self {
        Self::over(party, party.member_ids())
    }

    /// Visits members in the opposite order to [`forward`](Self::forward).
    #[must_use]
    pub fn reverse(party: &Party) -> Self {
        let mut ids = party.member_ids();
        ids.reverse();
        Self::over(party, ids)
    }

    /// Visits only members whose entity satisfies `predicate`.
    ///
    /// The predicate is evaluated once, against the arena as it is now.
    /// Members missing from the arena are left out.
    #[must_use]
    pub fn filtered<F>(party: &Party, arena: &Arena, mut predicate: F) -> Self
    where
        F: FnMut(&Entity) -> bool,
    {
        let ids = party
            .member_ids()
            .into_iter()
            .filter(|id| arena.get(*id).is_some_and(&mut predicate))
            .collect();
        Self::over(party, ids)
    }

    /// Returns `true` while members remain.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.position < self.ids.len()
    }

    /// Moves to the next member and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Exhausted`] when every member has been visited.
    pub fn advance(&mut self) -> Result<EntityId, CursorError> {
        let id = self
            .ids
            .get(self.position)
            .copied()
            .ok_or_else(|| CursorError::Exhausted {
                party: self.party.clone(),
            })?;
        self.position += 1;
        self.current = Some(id);
        Ok(id)
    }

    /// Member most recently returned by [`advance`](Self::advance).
    #[must_use]
    pub const fn current(&self) -> Option<EntityId> {
        self.current
    }

    /// Rewinds to the first member.
    pub fn reset(&mut self) {
        self.position = 0;
        self.current = None;
    }

    /// Number of members this cursor visits in total.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the cursor visits no members at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Iterator for PartyCursor {
    type Item = EntityId;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.ids.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PartyCursor {}
