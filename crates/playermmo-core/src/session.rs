//! Game session: the explicitly owned context that ties everything together.
//!
//! A [`GameSession`] owns the [`Arena`], the [`CommandLog`], the [`EventBus`]
//! and the [`Rules`], plus the session's level counter and score. There is
//! no global instance; callers create one and pass it where it is needed.
//!
//! # Architecture
//!
//! ```text
//! register_player / register_monster
//!            |
//!            v
//!   +----------------+   execute / undo   +------------+
//!   |     Arena      | <----------------> | CommandLog |
//!   +----------------+                    +------------+
//!            |
//!            | tier re-evaluation, defeats, score
//!            v
//!   +----------------+
//!   |    EventBus    | ---> observers (push), history (pull)
//!   +----------------+
//! ```
//!
//! Every player's [`ConditionTier`] is tracked by the session. Executing a
//! command runs the tier transition for each player it touched; undoing one
//! puts back the tiers those players had before it ran.
//!
//! # Example
//!
//! ```
//! use playermmo_core::command::Command;
//! use playermmo_core::entity::{Entity, Stats};
//! use playermmo_core::session::GameSession;
//!
//! let mut session = GameSession::default();
//! let warrior = session.register_player(Entity::player("Warrior", Stats {
//!     health: 150, mana: 60, attack: 20, defense: 15, level: 3,
//! }))?;
//! let goblin = session.register_monster(Entity::monster("Goblin", 8, 12, 60, 2))?;
//!
//! session.start();
//! session.execute(Command::Attack { attacker: warrior, target: goblin })?;
//! assert_eq!(session.arena().get(goblin).unwrap().stats().health, 48);
//!
//! session.undo();
//! assert_eq!(session.arena().get(goblin).unwrap().stats().health, 60);
//! # Ok::<(), playermmo_core::error::SessionError>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::arena::Arena;
use crate::command::{Command, CommandEffect, CommandLog, CommandRecord};
use crate::condition::ConditionTier;
use crate::config::Rules;
use crate::entity::{Entity, EntityId, EntityKind, Stats};
use crate::error::SessionError;
use crate::event::{EventBus, GameEvent};
use crate::level::{Level, LevelReport};
use crate::resolver::resolve_attack;

// =============================================================================
// Status types
// =============================================================================

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Created; entities may be registered
    #[default]
    Initialized,
    /// Started and accepting play
    Playing,
    /// Ended; the arena has been cleared
    Ended,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initialized => write!(f, "Initialized"),
            Self::Playing => write!(f, "Playing"),
            Self::Ended => write!(f, "Ended"),
        }
    }
}

/// One entity as shown in a [`SessionStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
    /// Arena id
    pub id: EntityId,
    /// Display name
    pub name: String,
    /// Current stats
    pub stats: Stats,
    /// Current tier, for players
    pub tier: Option<ConditionTier>,
}

/// Snapshot of a session for display or serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Lifecycle phase
    pub phase: SessionPhase,
    /// Current level
    pub level: i32,
    /// Current score
    pub score: i64,
    /// Registered players, by id
    pub players: Vec<EntitySummary>,
    /// Registered monsters, by id
    pub monsters: Vec<EntitySummary>,
    /// Commands that can still be undone
    pub undoable_commands: usize,
}

/// What [`GameSession::process_combat`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatReport {
    /// Damage the player dealt
    pub damage: i32,
    /// Damage the monster dealt back, if it survived
    pub counter: Option<i32>,
    /// `true` if the monster fell and was removed
    pub monster_defeated: bool,
    /// `true` if the counter-attack dropped the player
    pub player_defeated: bool,
}

// =============================================================================
// Session
// =============================================================================

/// Owns the arena, command history, event bus, rules and progress.
#[derive(Debug)]
pub struct GameSession {
    arena: Arena,
    commands: CommandLog,
    events: EventBus,
    rules: Rules,
    tiers: BTreeMap<EntityId, ConditionTier>,
    level: i32,
    score: i64,
    phase: SessionPhase,
    /// Tiers of the players each logged command touched, as they were before
    /// it ran. Kept in step with `commands`.
    tier_undo: Vec<Vec<(EntityId, ConditionTier)>>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

impl GameSession {
    /// Creates a session at level 1 with a score of 0.
    #[must_use]
    pub fn new(rules: Rules) -> Self {
        Self {
            arena: Arena::new(),
            commands: CommandLog::new(),
            events: EventBus::new(),
            rules,
            tiers: BTreeMap::new(),
            level: 1,
            score: 0,
            phase: SessionPhase::Initialized,
            tier_undo: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The entities in play.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Mutable access to the entities. Tier tracking is not updated for
    /// changes made this way until the next command touches the player.
    #[must_use]
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// The command history.
    #[must_use]
    pub const fn commands(&self) -> &CommandLog {
        &self.commands
    }

    /// The event bus, for reading history.
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    /// The event bus, for subscribing and publishing.
    #[must_use]
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// The active rules.
    #[must_use]
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Current level, starting at 1.
    #[must_use]
    pub const fn level(&self) -> i32 {
        self.level
    }

    /// Current score.
    #[must_use]
    pub const fn score(&self) -> i64 {
        self.score
    }

    /// Lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Tracked tier of a registered player.
    #[must_use]
    pub fn tier(&self, id: EntityId) -> Option<ConditionTier> {
        self.tiers.get(&id).copied()
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Adds a player and starts tracking its tier.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Unregistrable`] if `player` is a monster.
    pub fn register_player(&mut self, player: Entity) -> Result<EntityId, SessionError> {
        self.register(player, EntityKind::Player)
    }

    /// Adds a monster.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Unregistrable`] if `monster` is a player.
    pub fn register_monster(&mut self, monster: Entity) -> Result<EntityId, SessionError> {
        self.register(monster, EntityKind::Monster)
    }

    fn register(&mut self, entity: Entity, expected: EntityKind) -> Result<EntityId, SessionError> {
        if entity.kind() != expected {
            return Err(SessionError::Unregistrable {
                name: entity.name().to_string(),
                expected,
            });
        }
        let name = entity.name().to_string();
        let tier = entity
            .is_player()
            .then(|| ConditionTier::classify(entity.vitals(), &self.rules));
        let id = self.arena.spawn(entity);
        if let Some(tier) = tier {
            self.tiers.insert(id, tier);
        }
        info!(%id, name, kind = %expected, "entity registered");
        Ok(id)
    }

    /// Moves the session into [`SessionPhase::Playing`].
    pub fn start(&mut self) {
        self.phase = SessionPhase::Playing;
        let players = self.tiers.len();
        let monsters = self.arena.len().saturating_sub(players);
        info!(level = self.level, players, monsters, "game started");
        self.events.publish(GameEvent::Announcement(format!(
            "Game started at level {} with {players} players and {monsters} monsters",
            self.level
        )));
    }

    /// Ends the session, clearing every entity and the command history.
    ///
    /// Level and score are kept for the final status.
    pub fn end(&mut self) {
        self.phase = SessionPhase::Ended;
        self.arena = Arena::new();
        self.commands.clear();
        self.tier_undo.clear();
        self.tiers.clear();
        info!(
            score = self.score,
            levels_completed = self.level - 1,
            "game ended"
        );
        self.events.publish(GameEvent::Announcement(format!(
            "Game ended with a score of {}",
            self.score
        )));
    }

    /// Advances one level and awards `new_level * level_score_multiplier`.
    ///
    /// Returns the new level.
    pub fn next_level(&mut self) -> i32 {
        self.level += 1;
        info!(level = self.level, "advanced to next level");
        self.add_score(i64::from(self.level) * self.rules.level_score_multiplier);
        self.level
    }

    /// Adds `points` to the score.
    pub fn add_score(&mut self, points: i64) {
        self.score += points;
        self.events.publish(GameEvent::ScoreChanged {
            delta: points,
            score: self.score,
        });
    }

    // -------------------------------------------------------------------------
    // Play
    // -------------------------------------------------------------------------

    /// Single exchange: the player strikes; a defeated monster pays the
    /// bounty and is removed, a surviving one counter-attacks.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotRegistered`] for unknown ids and
    /// [`SessionError::WrongKind`] if the ids name the wrong kinds.
    pub fn process_combat(
        &mut self,
        player: EntityId,
        monster: EntityId,
    ) -> Result<CombatReport, SessionError> {
        self.expect_kind(player, EntityKind::Player)?;
        self.expect_kind(monster, EntityKind::Monster)?;
        let (hero, foe) = self
            .arena
            .get_pair_mut(player, monster)
            .ok_or(SessionError::NotRegistered(monster))?;

        info!(player = hero.name(), monster = foe.name(), "processing combat");
        let damage = resolve_attack(hero, foe);

        if foe.is_defeated() {
            let name = foe.name().to_string();
            self.arena.despawn(monster);
            self.publish_attack(player, monster, damage, None);
            self.events.publish(GameEvent::Defeated {
                entity: monster,
                name,
            });
            self.add_score(self.rules.defeat_bounty);
            return Ok(CombatReport {
                damage,
                counter: None,
                monster_defeated: true,
                player_defeated: false,
            });
        }

        let counter = resolve_attack(foe, hero);
        let player_defeated = hero.is_defeated();
        self.publish_attack(player, monster, damage, Some(counter));
        self.after_change(&[player]);
        Ok(CombatReport {
            damage,
            counter: Some(counter),
            monster_defeated: false,
            player_defeated,
        })
    }

    /// Executes `command` through the command log and publishes the result.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Command`] if the command is rejected.
    pub fn execute(&mut self, command: Command) -> Result<CommandEffect, SessionError> {
        let (actor, target) = (command.actor(), command.target());
        let touched: Vec<_> = if actor == target {
            vec![actor]
        } else {
            vec![actor, target]
        };
        let prior_tiers: Vec<_> = touched
            .iter()
            .filter_map(|&id| self.tier(id).map(|tier| (id, tier)))
            .collect();

        let effect = self.commands.execute(&mut self.arena, command)?;
        self.tier_undo.push(prior_tiers);

        let event = match effect {
            CommandEffect::Round(round) => GameEvent::Attacked {
                attacker: actor,
                target,
                damage: round.damage,
                counter: round.counter,
            },
            CommandEffect::Strategy(outcome) => GameEvent::StrategyUsed {
                variant: outcome.variant,
                attacker: actor,
                target,
                damage: outcome.damage,
                fell_back: outcome.fell_back,
            },
            CommandEffect::Healed(amount) => GameEvent::Healed { target, amount },
            CommandEffect::Defended(boost) => GameEvent::Defended { target, boost },
        };
        self.events.publish(event);

        self.after_change(&touched);
        Ok(effect)
    }

    /// Undoes the most recent command, restoring both the stats it changed
    /// and the tiers its players had before it ran. Returns `None` if there
    /// was nothing to undo.
    pub fn undo(&mut self) -> Option<CommandRecord> {
        let record = self.commands.undo(&mut self.arena)?;
        self.events.publish(GameEvent::CommandUndone {
            command: record.command,
        });

        for (id, tier) in self.tier_undo.pop().unwrap_or_default() {
            if let Some(current) = self.tier(id) {
                self.set_tier(id, current, tier);
            }
        }
        Some(record)
    }

    /// Plays `level` with a registered player, publishes the result, and
    /// advances the session level if the player survived.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotRegistered`] or [`SessionError::WrongKind`]
    /// if `player` is not a registered player.
    pub fn play_level(
        &mut self,
        player: EntityId,
        level: &mut dyn Level,
        rng: &mut ChaCha8Rng,
    ) -> Result<LevelReport, SessionError> {
        self.expect_kind(player, EntityKind::Player)?;
        let hero = self
            .arena
            .get_mut(player)
            .ok_or(SessionError::NotRegistered(player))?;

        let report = level.play(hero, rng);
        self.events.publish(GameEvent::LevelCompleted {
            level: report.level.clone(),
            survived: report.survived,
        });
        self.after_change(&[player]);
        if report.survived {
            self.next_level();
        }
        Ok(report)
    }

    /// Snapshot of phase, progress and every registered entity.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        let mut players = Vec::new();
        let mut monsters = Vec::new();
        for (id, entity) in self.arena.iter() {
            let summary = EntitySummary {
                id,
                name: entity.name().to_string(),
                stats: *entity.stats(),
                tier: self.tier(id),
            };
            match entity.kind() {
                EntityKind::Player => players.push(summary),
                EntityKind::Monster => monsters.push(summary),
            }
        }
        SessionStatus {
            phase: self.phase,
            level: self.level,
            score: self.score,
            players,
            monsters,
            undoable_commands: self.commands.len(),
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn expect_kind(&self, id: EntityId, expected: EntityKind) -> Result<(), SessionError> {
        let entity = self.arena.get(id).ok_or(SessionError::NotRegistered(id))?;
        if entity.kind() == expected {
            Ok(())
        } else {
            Err(SessionError::WrongKind { id, expected })
        }
    }

    fn publish_attack(
        &mut self,
        attacker: EntityId,
        target: EntityId,
        damage: i32,
        counter: Option<i32>,
    ) {
        self.events.publish(GameEvent::Attacked {
            attacker,
            target,
            damage,
            counter,
        });
    }

    /// Publishes defeats and runs tier transitions for `ids`.
    fn after_change(&mut self, ids: &[EntityId]) {
        for &id in ids {
            let Some(entity) = self.arena.get(id) else {
                continue;
            };
            if entity.is_defeated() {
                info!(%id, name = entity.name(), "entity defeated");
                let name = entity.name().to_string();
                self.events.publish(GameEvent::Defeated { entity: id, name });
                continue;
            }
            let vitals = entity.vitals();
            if let Some(before) = self.tiers.get(&id).copied() {
                let after = before.next(vitals, &self.rules);
                self.set_tier(id, before, after);
            }
        }
    }

    fn set_tier(&mut self, id: EntityId, from: ConditionTier, to: ConditionTier) {
        if from == to {
            return;
        }
        self.tiers.insert(id, to);
        info!(%id, %from, %to, "condition tier changed");
        self.events.publish(GameEvent::TierChanged { entity: id, from, to });
    }
}
