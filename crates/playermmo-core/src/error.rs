//! Error types for the combat core.
//!
//! Each concern owns a small error enum; [`GameError`] wraps them all for
//! callers that drive several subsystems at once.
//!
//! Conditions the game treats as ordinary (undo with an empty history,
//! negative health or mana) are not errors and never appear here.

use thiserror::Error;

use crate::entity::EntityId;

/// Errors raised while executing a command against the arena.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The command referenced an entity the arena does not hold.
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    /// Attacker and target were the same entity.
    #[error("entity {0} cannot target itself")]
    SelfTarget(EntityId),
}

/// Errors raised by party cursors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// `advance` was called with no members left to visit.
    #[error("no more members in party '{party}'")]
    Exhausted {
        /// Name of the party being walked
        party: String,
    },
}

/// Errors raised while assembling parties.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartyError {
    /// A party needs a name unless it has a leader to borrow one from.
    #[error("a party must have a name if there is no leader")]
    Unnamed,
}

/// Errors raised by the player class registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// No factory is registered under the requested class name.
    #[error("unknown player class: {0}")]
    UnknownClass(String),
}

/// Errors raised by session-level operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The operation referenced an entity the session does not hold.
    #[error("entity {0} not registered")]
    NotRegistered(EntityId),

    /// A player slot held a monster or vice versa.
    #[error("entity {id} is not a {expected}")]
    WrongKind {
        /// Offending entity
        id: EntityId,
        /// Kind the operation required
        expected: crate::entity::EntityKind,
    },

    /// Registration was offered an entity of the wrong kind.
    #[error("cannot register '{name}' as a {expected}")]
    Unregistrable {
        /// Name of the rejected entity
        name: String,
        /// Kind the registration required
        expected: crate::entity::EntityKind,
    },

    /// A command failed.
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Errors raised while loading [`Rules`](crate::config::Rules).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document was not valid JSON for `Rules`.
    #[error("invalid rules document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value was out of range.
    #[error("invalid rule `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field
        field: &'static str,
        /// Human-readable explanation
        reason: String,
    },
}

/// Umbrella error for callers that mix subsystems.
#[derive(Debug, Error)]
pub enum GameError {
    /// See [`CommandError`].
    #[error(transparent)]
    Command(#[from] CommandError),

    /// See [`CursorError`].
    #[error(transparent)]
    Cursor(#[from] CursorError),

    /// See [`PartyError`].
    #[error(transparent)]
    Party(#[from] PartyError),

    /// See [`RosterError`].
    #[error(transparent)]
    Roster(#[from] RosterError),

    /// See [`SessionError`].
    #[error(transparent)]
    Session(#[from] SessionError),

    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),
}
