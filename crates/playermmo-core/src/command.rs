//! Undoable combat actions.
//!
//! A [`Command`] is plain data naming the entities it touches. Executing it
//! through a [`CommandLog`] records the pre-state of every stat the command
//! mutates, applies the effect, and pushes a [`CommandRecord`]. Undo pops the
//! newest record and writes the snapshots back, so any sequence of `N`
//! executes followed by `N` undos leaves the arena exactly as it started.
//!
//! # Example
//!
//! ```
//! use playermmo_core::arena::Arena;
//! use playermmo_core::command::{Command, CommandLog};
//! use playermmo_core::entity::{Entity, Stats};
//!
//! let mut arena = Arena::new();
//! let hero = arena.spawn(Entity::player("Hero", Stats { attack: 15, ..Stats::default() }));
//! let goblin = arena.spawn(Entity::monster("Goblin", 5, 12, 60, 3));
//! let before = arena.clone();
//!
//! let mut log = CommandLog::new();
//! log.execute(&mut arena, Command::Attack { attacker: hero, target: goblin })?;
//! log.execute(&mut arena, Command::Heal { target: hero, amount: 20 })?;
//! assert_eq!(log.len(), 2);
//!
//! assert_eq!(log.undo_multiple(&mut arena, 2), 2);
//! assert_eq!(arena, before);
//! # Ok::<(), playermmo_core::error::CommandError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::arena::Arena;
use crate::config::Rules;
use crate::entity::{Entity, EntityId, StatField};
use crate::error::CommandError;
use crate::resolver::{
    apply_strategy, resolve_round, RoundOutcome, StrategyOutcome, StrategyVariant,
};

/// An action that can be executed against an [`Arena`] and undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Two-sided round: attacker strikes, a surviving target strikes back.
    Attack {
        /// Striking entity
        attacker: EntityId,
        /// Struck entity
        target: EntityId,
    },
    /// Restore `amount` health.
    Heal {
        /// Healed entity
        target: EntityId,
        /// Health restored
        amount: i32,
    },
    /// Raise defense by `boost`.
    Defend {
        /// Defending entity
        target: EntityId,
        /// Defense gained
        boost: i32,
    },
    /// Attack using a strategy variant's formula.
    Strategy {
        /// Strategy applied
        variant: StrategyVariant,
        /// Striking entity
        attacker: EntityId,
        /// Struck entity
        target: EntityId,
    },
}

impl Command {
    /// Heal for the rules' default amount.
    #[must_use]
    pub const fn heal(target: EntityId, rules: &Rules) -> Self {
        Self::Heal {
            target,
            amount: rules.heal_amount,
        }
    }

    /// Defend with the rules' default boost.
    #[must_use]
    pub const fn defend(target: EntityId, rules: &Rules) -> Self {
        Self::Defend {
            target,
            boost: rules.defend_boost,
        }
    }

    /// The entity performing the command.
    #[must_use]
    pub const fn actor(&self) -> EntityId {
        match *self {
            Self::Attack { attacker, .. } | Self::Strategy { attacker, .. } => attacker,
            Self::Heal { target, .. } | Self::Defend { target, .. } => target,
        }
    }

    /// The entity the command acts on. Same as [`actor`](Self::actor) for
    /// heals and defends.
    #[must_use]
    pub const fn target(&self) -> EntityId {
        match *self {
            Self::Attack { target, .. }
            | Self::Strategy { target, .. }
            | Self::Heal { target, .. }
            | Self::Defend { target, .. } => target,
        }
    }

    /// Every `(entity, field)` the command may write.
    fn touched(&self) -> Vec<(EntityId, StatField)> {
        match *self {
            Self::Attack { attacker, target } => vec![
                (attacker, StatField::Health),
                (target, StatField::Health),
            ],
            Self::Heal { target, .. } => vec![(target, StatField::Health)],
            Self::Defend { target, .. } => vec![(target, StatField::Defense)],
            Self::Strategy {
                attacker, target, ..
            } => vec![
                (attacker, StatField::Mana),
                (attacker, StatField::Defense),
                (target, StatField::Health),
            ],
        }
    }

    fn validate(&self, arena: &Arena) -> Result<(), CommandError> {
        match *self {
            Self::Attack { attacker, target } | Self::Strategy { attacker, target, .. } => {
                if attacker == target {
                    return Err(CommandError::SelfTarget(attacker));
                }
                require(arena, attacker)?;
                require(arena, target)
            }
            Self::Heal { target, .. } | Self::Defend { target, .. } => require(arena, target),
        }
    }

    fn apply(&self, arena: &mut Arena) -> Result<CommandEffect, CommandError> {
        match *self {
            Self::Attack { attacker, target } => {
                let (a, t) = pair(arena, attacker, target)?;
                Ok(CommandEffect::Round(resolve_round(a, t)))
            }
            Self::Heal { target, amount } => {
                entity_mut(arena, target)?.stats_mut().health += amount;
                Ok(CommandEffect::Healed(amount))
            }
            Self::Defend { target, boost } => {
                entity_mut(arena, target)?.stats_mut().defense += boost;
                Ok(CommandEffect::Defended(boost))
            }
            Self::Strategy {
                variant,
                attacker,
                target,
            } => {
                let (a, t) = pair(arena, attacker, target)?;
                Ok(CommandEffect::Strategy(apply_strategy(variant, a, t)))
            }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attack { attacker, target } => write!(f, "attack {attacker} -> {target}"),
            Self::Heal { target, amount } => write!(f, "heal {target} +{amount}"),
            Self::Defend { target, boost } => write!(f, "defend {target} +{boost}"),
            Self::Strategy {
                variant,
                attacker,
                target,
            } => write!(f, "{variant} strategy {attacker} -> {target}"),
        }
    }
}

fn require(arena: &Arena, id: EntityId) -> Result<(), CommandError> {
    if arena.contains(id) {
        Ok(())
    } else {
        Err(CommandError::EntityNotFound(id))
    }
}

fn entity_mut(arena: &mut Arena, id: EntityId) -> Result<&mut Entity, CommandError> {
    arena.get_mut(id).ok_or(CommandError::EntityNotFound(id))
}

fn pair(
    arena: &mut Arena,
    attacker: EntityId,
    target: EntityId,
) -> Result<(&mut Entity, &mut Entity), CommandError> {
    if attacker == target {
        return Err(CommandError::SelfTarget(attacker));
    }
    require(arena, attacker)?;
    arena
        .get_pair_mut(attacker, target)
        .ok_or(CommandError::EntityNotFound(target))
}

/// What an executed command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandEffect {
    /// Result of an attack round
    Round(RoundOutcome),
    /// Health restored
    Healed(i32),
    /// Defense gained
    Defended(i32),
    /// Result of a strategy attack
    Strategy(StrategyOutcome),
}

/// Value of one stat before a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    /// Entity the value belongs to
    pub entity: EntityId,
    /// Which stat
    pub field: StatField,
    /// Value before execution
    pub value: i32,
}

/// An executed command together with everything needed to undo it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// The command as executed
    pub command: Command,
    /// What it did
    pub effect: CommandEffect,
    /// Pre-state of every stat the command wrote
    pub snapshots: Vec<FieldSnapshot>,
}

impl CommandRecord {
    /// Writes the snapshots back, newest capture first.
    fn restore(&self, arena: &mut Arena) {
        for snapshot in self.snapshots.iter().rev() {
            match arena.get_mut(snapshot.entity) {
                Some(entity) => entity.stats_mut().set(snapshot.field, snapshot.value),
                None => warn!(
                    entity = %snapshot.entity,
                    field = %snapshot.field,
                    command = %self.command,
                    "cannot restore stat, entity no longer exists"
                ),
            }
        }
    }
}

/// Stack of executed commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLog {
    history: Vec<CommandRecord>,
}

impl CommandLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes `command` and records it for undo.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::EntityNotFound`] if a referenced entity is not
    /// in the arena and [`CommandError::SelfTarget`] if an attack names the
    /// same entity twice. On error nothing is mutated and nothing is pushed.
    pub fn execute(
        &mut self,
        arena: &mut Arena,
        command: Command,
    ) -> Result<CommandEffect, CommandError> {
        command.validate(arena)?;

        let mut snapshots = Vec::new();
        for (entity, field) in command.touched() {
            let value = arena
                .get(entity)
                .ok_or(CommandError::EntityNotFound(entity))?
                .stats()
                .get(field);
            snapshots.push(FieldSnapshot {
                entity,
                field,
                value,
            });
        }

        let effect = command.apply(arena)?;
        debug!(%command, ?effect, depth = self.history.len() + 1, "command executed");
        self.history.push(CommandRecord {
            command,
            effect,
            snapshots,
        });
        Ok(effect)
    }

    /// Reverts the most recent command.
    ///
    /// Returns the undone record, or `None` (with a warning) when there is
    /// nothing to undo.
    pub fn undo(&mut self, arena: &mut Arena) -> Option<CommandRecord> {
        let Some(record) = self.history.pop() else {
            warn!("no commands to undo");
            return None;
        };
        record.restore(arena);
        info!(command = %record.command, "command undone");
        Some(record)
    }

    /// Undoes up to `n` commands, stopping early when the log empties.
    ///
    /// Returns how many were undone.
    pub fn undo_multiple(&mut self, arena: &mut Arena, n: usize) -> usize {
        let mut undone = 0;
        while undone < n && !self.history.is_empty() {
            if self.undo(arena).is_some() {
                undone += 1;
            }
        }
        undone
    }

    /// Forgets every recorded command without reverting anything.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Number of undoable commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Returns `true` when there is nothing to undo.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Recorded commands, oldest first.
    #[must_use]
    pub fn history(&self) -> &[CommandRecord] {
        &self.history
    }
}
