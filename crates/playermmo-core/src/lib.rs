//! # PlayerMMO Core
//!
//! Combat core for a player-versus-monster game.
//!
//! This crate provides the entity model, the damage and strategy resolvers,
//! the condition-tier state machine and an undoable command log, plus the
//! session context that ties them together.
//!
//! ## Architecture
//!
//! - **Entities**: players and monsters stored by id in an [`Arena`]
//! - **Resolvers**: pure damage arithmetic ([`resolver`])
//! - **Condition tiers**: health and mana buckets that change what actions do
//!   ([`condition`])
//! - **Commands**: every state change as a value that can be undone
//!   ([`command`])
//! - **Session**: owns the arena, command log, event bus and rules
//!   ([`session`])
//!
//! Grouping ([`party`]), gear ([`equipment`]), class creation ([`roster`]),
//! notifications ([`event`]) and scripted levels ([`level`]) are built on
//! top of the same arena and resolvers.
//!
//! ## Usage
//!
//! ```
//! use playermmo_core::{Command, Entity, GameSession, Stats, StrategyVariant};
//!
//! let mut session = GameSession::default();
//! let mage = session.register_player(Entity::player("Mage", Stats {
//!     health: 80, mana: 120, attack: 15, defense: 5, level: 5,
//! }))?;
//! let troll = session.register_monster(Entity::monster("Troll", 10, 25, 200, 6))?;
//!
//! session.execute(Command::Strategy {
//!     variant: StrategyVariant::Magical,
//!     attacker: mage,
//!     target: troll,
//! })?;
//! assert_eq!(session.arena().get(mage).unwrap().stats().mana, 100);
//! # Ok::<(), playermmo_core::SessionError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

// Core modules
pub mod arena;
pub mod command;
pub mod condition;
pub mod config;
pub mod entity;
pub mod error;
pub mod resolver;
pub mod session;

// Built on the core
pub mod equipment;
pub mod event;
pub mod level;
pub mod party;
pub mod roster;

pub use arena::Arena;
pub use command::{Command, CommandEffect, CommandLog};
pub use condition::{ConditionTier, ConditionTracker};
pub use config::Rules;
pub use entity::{Entity, EntityId, EntityKind, Stats};
pub use error::{GameError, SessionError};
pub use event::{EventBus, EventMask, GameEvent};
pub use resolver::{StrategySelector, StrategyVariant};
pub use session::GameSession;

#[cfg(test)]
mod tests;
