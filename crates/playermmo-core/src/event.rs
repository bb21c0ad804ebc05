//! Game events and the bus that fans them out.
//!
//! Every notable thing the session does is described by a [`GameEvent`].
//! Events reach interested parties two ways:
//!
//! - **Push**: observers registered with [`EventBus::subscribe`] are called
//!   synchronously, in subscription order, for each event whose
//!   [`EventKind`] is in their [`EventMask`].
//! - **Pull**: the bus keeps a bounded history that can be read back with
//!   [`EventBus::latest`] and [`EventBus::history`].
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use playermmo_core::event::{EventBus, EventMask, GameEvent};
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//!
//! let mut bus = EventBus::new();
//! bus.subscribe(
//!     move |event: &GameEvent| sink.borrow_mut().push(event.to_string()),
//!     EventMask::ANNOUNCEMENT,
//! );
//!
//! bus.publish(GameEvent::Announcement("Server maintenance at midnight".into()));
//! bus.publish(GameEvent::ScoreChanged { delta: 50, score: 50 });
//!
//! assert_eq!(seen.borrow().len(), 1);
//! assert_eq!(bus.history().count(), 2);
//! ```

use std::collections::VecDeque;
use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::command::Command;
use crate::condition::ConditionTier;
use crate::entity::EntityId;
use crate::resolver::StrategyVariant;

/// Events retained for pull-model readers.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

// =============================================================================
// Events
// =============================================================================

/// Something that happened in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A basic attack round landed.
    Attacked {
        /// Striking entity
        attacker: EntityId,
        /// Struck entity
        target: EntityId,
        /// Damage dealt to the target
        damage: i32,
        /// Damage the target dealt back, if it survived
        counter: Option<i32>,
    },
    /// Health was restored.
    Healed {
        /// Healed entity
        target: EntityId,
        /// Health restored
        amount: i32,
    },
    /// Defense was raised.
    Defended {
        /// Defending entity
        target: EntityId,
        /// Defense gained
        boost: i32,
    },
    /// A strategy attack landed.
    StrategyUsed {
        /// Strategy applied
        variant: StrategyVariant,
        /// Striking entity
        attacker: EntityId,
        /// Struck entity
        target: EntityId,
        /// Damage dealt
        damage: i32,
        /// `true` if a spell fizzled into a basic attack
        fell_back: bool,
    },
    /// A player's condition tier changed.
    TierChanged {
        /// Player whose tier changed
        entity: EntityId,
        /// Previous tier
        from: ConditionTier,
        /// New tier
        to: ConditionTier,
    },
    /// An entity dropped to zero health.
    Defeated {
        /// Fallen entity
        entity: EntityId,
        /// Its name, since the entity may be despawned
        name: String,
    },
    /// A command was reverted.
    CommandUndone {
        /// The reverted command
        command: Command,
    },
    /// A level script finished.
    LevelCompleted {
        /// Level name
        level: String,
        /// Whether the player survived
        survived: bool,
    },
    /// The session score moved.
    ScoreChanged {
        /// Points added
        delta: i64,
        /// Score afterwards
        score: i64,
    },
    /// Free-form broadcast.
    Announcement(String),
}

impl GameEvent {
    /// Returns the event's kind tag.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Attacked { .. } => EventKind::Attacked,
            Self::Healed { .. } => EventKind::Healed,
            Self::Defended { .. } => EventKind::Defended,
            Self::StrategyUsed { .. } => EventKind::StrategyUsed,
            Self::TierChanged { .. } => EventKind::TierChanged,
            Self::Defeated { .. } => EventKind::Defeated,
            Self::CommandUndone { .. } => EventKind::CommandUndone,
            Self::LevelCompleted { .. } => EventKind::LevelCompleted,
            Self::ScoreChanged { .. } => EventKind::ScoreChanged,
            Self::Announcement(_) => EventKind::Announcement,
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attacked {
                attacker,
                target,
                damage,
                ..
            } => write!(f, "{attacker} hit {target} for {damage}"),
            Self::Healed { target, amount } => write!(f, "{target} healed {amount}"),
            Self::Defended { target, boost } => write!(f, "{target} raised defense by {boost}"),
            Self::StrategyUsed {
                variant,
                attacker,
                target,
                damage,
                ..
            } => write!(f, "{attacker} used {variant} on {target} for {damage}"),
            Self::TierChanged { entity, from, to } => write!(f, "{entity} went from {from} to {to}"),
            Self::Defeated { name, .. } => write!(f, "{name} was defeated"),
            Self::CommandUndone { command } => write!(f, "undid {command}"),
            Self::LevelCompleted { level, survived } => {
                if *survived {
                    write!(f, "{level} cleared")
                } else {
                    write!(f, "{level} failed")
                }
            }
            Self::ScoreChanged { delta, score } => write!(f, "score +{delta} = {score}"),
            Self::Announcement(text) => f.write_str(text),
        }
    }
}

/// Data-free tag for each [`GameEvent`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// [`GameEvent::Attacked`]
    Attacked,
    /// [`GameEvent::Healed`]
    Healed,
    /// [`GameEvent::Defended`]
    Defended,
    /// [`GameEvent::StrategyUsed`]
    StrategyUsed,
    /// [`GameEvent::TierChanged`]
    TierChanged,
    /// [`GameEvent::Defeated`]
    Defeated,
    /// [`GameEvent::CommandUndone`]
    CommandUndone,
    /// [`GameEvent::LevelCompleted`]
    LevelCompleted,
    /// [`GameEvent::ScoreChanged`]
    ScoreChanged,
    /// [`GameEvent::Announcement`]
    Announcement,
}

bitflags! {
    /// Set of [`EventKind`]s an observer wants to hear about.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct EventMask: u16 {
        const ATTACKED        = 1 << 0;
        const HEALED          = 1 << 1;
        const DEFENDED        = 1 << 2;
        const STRATEGY_USED   = 1 << 3;
        const TIER_CHANGED    = 1 << 4;
        const DEFEATED        = 1 << 5;
        const COMMAND_UNDONE  = 1 << 6;
        const LEVEL_COMPLETED = 1 << 7;
        const SCORE_CHANGED   = 1 << 8;
        const ANNOUNCEMENT    = 1 << 9;

        /// Everything that changes health.
        const COMBAT = Self::ATTACKED.bits() | Self::STRATEGY_USED.bits() | Self::DEFEATED.bits();
        /// Session bookkeeping.
        const PROGRESS = Self::LEVEL_COMPLETED.bits() | Self::SCORE_CHANGED.bits();
    }
}

impl From<EventKind> for EventMask {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Attacked => Self::ATTACKED,
            EventKind::Healed => Self::HEALED,
            EventKind::Defended => Self::DEFENDED,
            EventKind::StrategyUsed => Self::STRATEGY_USED,
            EventKind::TierChanged => Self::TIER_CHANGED,
            EventKind::Defeated => Self::DEFEATED,
            EventKind::CommandUndone => Self::COMMAND_UNDONE,
            EventKind::LevelCompleted => Self::LEVEL_COMPLETED,
            EventKind::ScoreChanged => Self::SCORE_CHANGED,
            EventKind::Announcement => Self::ANNOUNCEMENT,
        }
    }
}

impl EventMask {
    /// Returns `true` if events of `kind` pass this mask.
    #[must_use]
    pub fn accepts(self, kind: EventKind) -> bool {
        self.contains(Self::from(kind))
    }
}

// =============================================================================
// Bus
// =============================================================================

/// Receives pushed events.
///
/// Implemented for every `FnMut(&GameEvent)` closure.
pub trait Observer {
    /// Called once per matching event.
    fn notify(&mut self, event: &GameEvent);
}

impl<F> Observer for F
where
    F: FnMut(&GameEvent),
{
    fn notify(&mut self, event: &GameEvent) {
        self(event);
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Raw id value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

struct Subscription {
    id: SubscriberId,
    mask: EventMask,
    observer: Box<dyn Observer>,
}

/// Publishes events to observers and remembers recent ones.
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<Subscription>,
    history: VecDeque<GameEvent>,
    history_limit: usize,
}

impl EventBus {
    /// Creates a bus keeping [`DEFAULT_HISTORY_LIMIT`] events.
    #[must_use]
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Creates a bus keeping at most `limit` events.
    #[must_use]
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
            history: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT)),
            history_limit: limit,
        }
    }

    /// Registers `observer` for the kinds in `mask`.
    pub fn subscribe<O>(&mut self, observer: O, mask: EventMask) -> SubscriberId
    where
        O: Observer + 'static,
    {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscription {
            id,
            mask,
            observer: Box::new(observer),
        });
        debug!(subscriber = id.0, ?mask, "observer subscribed");
        id
    }

    /// Removes a subscription. Returns `false` if `id` was unknown.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        before != self.subscribers.len()
    }

    /// Delivers `event` to matching observers and records it.
    pub fn publish(&mut self, event: GameEvent) {
        let kind = event.kind();
        for subscription in &mut self.subscribers {
            if subscription.mask.accepts(kind) {
                subscription.observer.notify(&event);
            }
        }
        if self.history_limit == 0 {
            return;
        }
        if self.history.len() == self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(event);
    }

    /// Most recent event, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&GameEvent> {
        self.history.back()
    }

    /// Retained events, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &GameEvent> + '_ {
        self.history.iter()
    }

    /// Forgets the retained history. Subscriptions are kept.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Number of active subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("history", &self.history.len())
            .field("history_limit", &self.history_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(bus: &mut EventBus, mask: EventMask) -> (SubscriberId, Rc<RefCell<Vec<EventKind>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let id = bus.subscribe(move |e: &GameEvent| sink.borrow_mut().push(e.kind()), mask);
        (id, log)
    }

    fn announcement(text: &str) -> GameEvent {
        GameEvent::Announcement(text.to_string())
    }

    mod mask_tests {
        use super::*;

        #[test]
        fn every_kind_maps_to_one_bit() {
            let kinds = [
                EventKind::Attacked,
                EventKind::Healed,
                EventKind::Defended,
                EventKind::StrategyUsed,
                EventKind::TierChanged,
                EventKind::Defeated,
                EventKind::CommandUndone,
                EventKind::LevelCompleted,
                EventKind::ScoreChanged,
                EventKind::Announcement,
            ];
            let mut seen = EventMask::empty();
            for kind in kinds {
                let bit = EventMask::from(kind);
                assert_eq!(bit.bits().count_ones(), 1);
                assert!(!seen.intersects(bit));
                seen |= bit;
            }
            assert_eq!(seen, EventMask::all());
        }

        #[test]
        fn combat_group() {
            assert!(EventMask::COMBAT.accepts(EventKind::Attacked));
            assert!(EventMask::COMBAT.accepts(EventKind::Defeated));
            assert!(!EventMask::COMBAT.accepts(EventKind::Healed));
        }
    }

    mod bus_tests {
        use super::*;

        #[test]
        fn push_respects_mask() {
            let mut bus = EventBus::new();
            let (_, everything) = recorder(&mut bus, EventMask::all());
            let (_, scores) = recorder(&mut bus, EventMask::SCORE_CHANGED);

            bus.publish(announcement("hello"));
            bus.publish(GameEvent::ScoreChanged { delta: 5, score: 5 });

            assert_eq!(
                *everything.borrow(),
                vec![EventKind::Announcement, EventKind::ScoreChanged]
            );
            assert_eq!(*scores.borrow(), vec![EventKind::ScoreChanged]);
        }

        #[test]
        fn unsubscribe_stops_delivery() {
            let mut bus = EventBus::new();
            let (id, log) = recorder(&mut bus, EventMask::all());

            bus.publish(announcement("one"));
            assert!(bus.unsubscribe(id));
            assert!(!bus.unsubscribe(id));
            bus.publish(announcement("two"));

            assert_eq!(log.borrow().len(), 1);
            assert_eq!(bus.subscriber_count(), 0);
        }

        #[test]
        fn pull_model_reads_latest() {
            let mut bus = EventBus::new();
            assert!(bus.latest().is_none());

            bus.publish(announcement("first"));
            bus.publish(announcement("second"));

            assert_eq!(bus.latest(), Some(&announcement("second")));
            assert_eq!(bus.history().count(), 2);
        }

        #[test]
        fn history_is_bounded() {
            let mut bus = EventBus::with_history_limit(2);
            for text in ["a", "b", "c"] {
                bus.publish(announcement(text));
            }

            let kept: Vec<_> = bus.history().map(ToString::to_string).collect();
            assert_eq!(kept, vec!["b", "c"]);
        }

        #[test]
        fn zero_limit_keeps_nothing_but_still_pushes() {
            let mut bus = EventBus::with_history_limit(0);
            let (_, log) = recorder(&mut bus, EventMask::all());

            bus.publish(announcement("gone"));

            assert!(bus.latest().is_none());
            assert_eq!(log.borrow().len(), 1);
        }

        #[test]
        fn subscriber_ids_are_unique() {
            let mut bus = EventBus::new();
            let a = bus.subscribe(|_: &GameEvent| {}, EventMask::all());
            let b = bus.subscribe(|_: &GameEvent| {}, EventMask::all());
            assert_ne!(a, b);
            assert!(a < b);
        }
    }

    #[test]
    fn display_and_serde() {
        let event = GameEvent::TierChanged {
            entity: EntityId::new(3),
            from: ConditionTier::Healthy,
            to: ConditionTier::Critical,
        };
        assert_eq!(event.to_string(), "3 went from Healthy to Critical");

        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
