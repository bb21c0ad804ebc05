//! Level scripts.
//!
//! A [`Level`] supplies the hooks; [`Level::play`] fixes the order they run
//! in:
//!
//! 1. [`initialize`](Level::initialize) applies the level's entry effect
//! 2. [`spawn_enemies`](Level::spawn_enemies) populates the level
//! 3. [`step`](Level::step) runs while the level is not complete and the
//!    player is alive
//! 4. [`finish`](Level::finish) runs, then [`reward`](Level::reward) if the
//!    player survived
//!
//! Fights inside a level are full battles ([`resolve_battle`]): the player
//! strikes, a surviving enemy strikes back, until one side falls.
//!
//! # Example
//!
//! ```
//! use playermmo_core::entity::{Entity, Stats};
//! use playermmo_core::level::{ForestLevel, Level};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut player = Entity::player("Adventurer", Stats {
//!     health: 400, mana: 60, attack: 30, defense: 12, level: 1,
//! });
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//!
//! let report = ForestLevel::new().play(&mut player, &mut rng);
//!
//! assert!(report.survived);
//! assert_eq!(report.enemies_defeated, 3);
//! assert_eq!(player.stats().level, 2);
//! ```

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::entity::{Entity, Stats};
use crate::resolver::{resolve_battle, BattleOutcome, Victor};

/// Summary of one [`Level::play`] run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelReport {
    /// Level name
    pub level: String,
    /// Whether the player was alive at the end
    pub survived: bool,
    /// Number of `step` calls
    pub steps: u32,
    /// Every battle fought, in order
    pub battles: Vec<BattleOutcome>,
    /// Battles the player won
    pub enemies_defeated: u32,
    /// Player stats after the reward
    pub final_stats: Stats,
}

/// Level +1, health +20, mana +10.
pub fn base_reward(player: &mut Entity) {
    let stats = player.stats_mut();
    stats.level += 1;
    stats.health += 20;
    stats.mana += 10;
    info!(player = player.name(), level = player.stats().level, "level up");
}

/// A playable level.
pub trait Level {
    /// Display name.
    fn name(&self) -> &str;

    /// Entry effect on the player.
    fn initialize(&mut self, player: &mut Entity);

    /// Creates the level's enemies.
    fn spawn_enemies(&mut self);

    /// One turn of the level. Returns the battle fought, if any.
    fn step(&mut self, player: &mut Entity, rng: &mut ChaCha8Rng) -> Option<BattleOutcome>;

    /// Whether the level's goal is met.
    fn is_complete(&self) -> bool;

    /// Runs once after the loop, before any reward.
    fn finish(&mut self, player: &Entity) {
        if player.is_defeated() {
            info!(player = player.name(), level = self.name(), "player was defeated");
        } else {
            info!(player = player.name(), level = self.name(), "level completed");
        }
    }

    /// Reward for surviving. Defaults to [`base_reward`].
    fn reward(&mut self, player: &mut Entity) {
        base_reward(player);
    }

    /// Plays the level start to finish.
    fn play(&mut self, player: &mut Entity, rng: &mut ChaCha8Rng) -> LevelReport {
        info!(level = self.name(), player = player.name(), "level starting");
        self.initialize(player);
        self.spawn_enemies();

        let mut steps = 0;
        let mut battles = Vec::new();
        while !self.is_complete() && !player.is_defeated() {
            steps += 1;
            if let Some(battle) = self.step(player, rng) {
                battles.push(battle);
            }
        }

        self.finish(player);
        let survived = !player.is_defeated();
        if survived {
            self.reward(player);
        }

        let enemies_defeated = battles
            .iter()
            .filter(|battle| battle.victor == Victor::Attacker)
            .count();
        LevelReport {
            level: self.name().to_string(),
            survived,
            steps,
            enemies_defeated: u32::try_from(enemies_defeated).unwrap_or(u32::MAX),
            battles,
            final_stats: *player.stats(),
        }
    }
}

fn fight(player: &mut Entity, enemy: &mut Entity) -> BattleOutcome {
    debug!(player = player.name(), enemy = enemy.name(), "encounter");
    resolve_battle(player, enemy)
}

// =============================================================================
// Forest
// =============================================================================

/// Three wild creatures in a row; the forest feeds the player mana.
#[derive(Debug, Clone, Default)]
pub struct ForestLevel {
    enemies: Vec<Entity>,
    defeated: usize,
}

impl ForestLevel {
    /// Creates the level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Level for ForestLevel {
    fn name(&self) -> &str {
        "Enchanted Forest"
    }

    fn initialize(&mut self, player: &mut Entity) {
        player.stats_mut().mana += 20;
    }

    fn spawn_enemies(&mut self) {
        self.enemies = vec![
            Entity::monster("Forest Wolf", 6, 14, 50, 2),
            Entity::monster("Angry Bear", 10, 16, 80, 4),
            Entity::monster("Forest Troll", 12, 20, 100, 5),
        ];
        self.defeated = 0;
    }

    fn step(&mut self, player: &mut Entity, _rng: &mut ChaCha8Rng) -> Option<BattleOutcome> {
        let enemy = self.enemies.get_mut(self.defeated)?;
        let battle = fight(player, enemy);
        if enemy.is_defeated() {
            self.defeated += 1;
            player.stats_mut().mana += 15;
        }
        Some(battle)
    }

    fn is_complete(&self) -> bool {
        self.defeated >= self.enemies.len()
    }

    fn reward(&mut self, player: &mut Entity) {
        base_reward(player);
        player.stats_mut().mana += 25;
    }
}

// =============================================================================
// Dungeon
// =============================================================================

/// Three increasingly dangerous enemies; drains mana on entry.
#[derive(Debug, Clone, Default)]
pub struct DungeonLevel {
    enemies: Vec<Entity>,
    current: usize,
}

impl DungeonLevel {
    /// Creates the level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Level for DungeonLevel {
    fn name(&self) -> &str {
        "Dark Dungeon"
    }

    fn initialize(&mut self, player: &mut Entity) {
        let stats = player.stats_mut();
        stats.mana = (stats.mana - 15).max(10);
    }

    fn spawn_enemies(&mut self) {
        self.enemies = vec![
            Entity::monster("Skeleton Warrior", 8, 12, 60, 3),
            Entity::monster("Dark Mage", 5, 18, 45, 4),
            Entity::monster("Dungeon Boss", 15, 25, 120, 6),
        ];
        self.current = 0;
    }

    fn step(&mut self, player: &mut Entity, _rng: &mut ChaCha8Rng) -> Option<BattleOutcome> {
        let enemy = self.enemies.get_mut(self.current)?;
        let battle = fight(player, enemy);
        if enemy.is_defeated() {
            self.current += 1;
            if self.current < self.enemies.len() {
                player.stats_mut().health += 10;
            }
        }
        Some(battle)
    }

    fn is_complete(&self) -> bool {
        self.current >= self.enemies.len()
    }

    fn reward(&mut self, player: &mut Entity) {
        base_reward(player);
        player.stats_mut().defense += 3;
    }
}

// =============================================================================
// Cave
// =============================================================================

/// Turns spent in the cave before the player must leave.
pub const CAVE_MAX_TURNS: u32 = 5;

/// Turns at the start of a cave run spent fighting.
const CAVE_FIGHT_TURNS: u32 = 2;

/// Two fights, then a treasure hunt against the clock.
#[derive(Debug, Clone, Default)]
pub struct CaveLevel {
    enemies: Vec<Entity>,
    turns: u32,
    treasure_found: bool,
}

impl CaveLevel {
    /// Creates the level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the crystal treasure turned up.
    #[must_use]
    pub const fn treasure_found(&self) -> bool {
        self.treasure_found
    }

    /// Turns spent so far.
    #[must_use]
    pub const fn turns(&self) -> u32 {
        self.turns
    }
}

impl Level for CaveLevel {
    fn name(&self) -> &str {
        "Crystal Cave"
    }

    fn initialize(&mut self, _player: &mut Entity) {
        self.turns = 0;
        self.treasure_found = false;
    }

    fn spawn_enemies(&mut self) {
        self.enemies = vec![
            Entity::monster("Cave Bat", 4, 8, 30, 1),
            Entity::monster("Rock Golem", 18, 15, 90, 5),
        ];
    }

    fn step(&mut self, player: &mut Entity, rng: &mut ChaCha8Rng) -> Option<BattleOutcome> {
        self.turns += 1;

        if self.turns <= CAVE_FIGHT_TURNS && !self.enemies.is_empty() {
            let enemy = &mut self.enemies[0];
            let battle = fight(player, enemy);
            if enemy.is_defeated() {
                self.enemies.remove(0);
            }
            return Some(battle);
        }

        if !self.treasure_found {
            if rng.gen_range(1..4) == 1 {
                self.treasure_found = true;
                let stats = player.stats_mut();
                stats.attack += 5;
                stats.health += 30;
                info!(player = player.name(), "found a crystal treasure");
            } else {
                debug!(player = player.name(), turn = self.turns, "nothing valuable found");
            }
        }
        None
    }

    fn is_complete(&self) -> bool {
        self.turns >= CAVE_MAX_TURNS || (self.enemies.is_empty() && self.treasure_found)
    }

    fn finish(&mut self, player: &Entity) {
        info!(
            player = player.name(),
            treasure = self.treasure_found,
            defeated = player.is_defeated(),
            "left the cave"
        );
    }

    fn reward(&mut self, player: &mut Entity) {
        base_reward(player);
        let stats = player.stats_mut();
        stats.attack += 2;
        stats.defense += 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn adventurer() -> Entity {
        Entity::player(
            "Adventurer",
            Stats {
                health: 120,
                mana: 60,
                attack: 18,
                defense: 12,
                level: 1,
            },
        )
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    mod forest_tests {
        use super::*;

        #[test]
        fn strong_player_clears_the_forest() {
            let mut player = Entity::player(
                "Champion",
                Stats {
                    health: 500,
                    mana: 0,
                    attack: 50,
                    defense: 30,
                    level: 1,
                },
            );

            let report = ForestLevel::new().play(&mut player, &mut rng());

            assert!(report.survived);
            assert_eq!(report.steps, 3);
            assert_eq!(report.enemies_defeated, 3);
            // 20 entry + 3 * 15 per kill + 10 base + 25 bonus
            assert_eq!(player.stats().mana, 100);
            assert_eq!(player.stats().level, 2);
        }

        #[test]
        fn weak_player_falls_without_reward() {
            let mut player = Entity::player(
                "Peasant",
                Stats {
                    health: 10,
                    mana: 0,
                    attack: 5,
                    defense: 0,
                    level: 1,
                },
            );

            let report = ForestLevel::new().play(&mut player, &mut rng());

            assert!(!report.survived);
            assert_eq!(report.enemies_defeated, 0);
            assert_eq!(player.stats().level, 1);
            assert_eq!(player.stats().mana, 20);
        }
    }

    mod dungeon_tests {
        use super::*;

        #[test]
        fn entry_drains_mana_with_a_floor() {
            let mut level = DungeonLevel::new();
            let mut player = adventurer();
            level.initialize(&mut player);
            assert_eq!(player.stats().mana, 45);

            player.stats_mut().mana = 12;
            level.initialize(&mut player);
            assert_eq!(player.stats().mana, 10);
        }

        #[test]
        fn rests_between_battles_and_gains_defense() {
            let mut player = Entity::player(
                "Knight",
                Stats {
                    health: 100,
                    mana: 40,
                    attack: 200,
                    defense: 100,
                    level: 3,
                },
            );

            let report = DungeonLevel::new().play(&mut player, &mut rng());

            assert!(report.survived);
            assert_eq!(report.enemies_defeated, 3);
            // one-shot every enemy: two rests of +10, base +20
            assert_eq!(player.stats().health, 140);
            assert_eq!(player.stats().defense, 103);
            assert_eq!(player.stats().level, 4);
        }
    }

    mod cave_tests {
        use super::*;

        #[test]
        fn never_exceeds_max_turns() {
            for seed in 0..20 {
                let mut level = CaveLevel::new();
                let mut player = adventurer();
                let report = level.play(&mut player, &mut ChaCha8Rng::seed_from_u64(seed));
                assert!(report.steps <= CAVE_MAX_TURNS);
                assert!(level.turns() <= CAVE_MAX_TURNS);
            }
        }

        #[test]
        fn same_seed_same_run() {
            let mut first = adventurer();
            let mut second = adventurer();

            let a = CaveLevel::new().play(&mut first, &mut rng());
            let b = CaveLevel::new().play(&mut second, &mut rng());

            assert_eq!(a, b);
            assert_eq!(first, second);
        }

        #[test]
        fn treasure_boosts_attack_and_health() {
            let mut player = Entity::player(
                "Seeker",
                Stats {
                    health: 1000,
                    mana: 0,
                    attack: 500,
                    defense: 100,
                    level: 1,
                },
            );

            for seed in 0..50 {
                let mut level = CaveLevel::new();
                let mut candidate = player.clone();
                level.play(&mut candidate, &mut ChaCha8Rng::seed_from_u64(seed));
                if level.treasure_found() {
                    // +5 treasure, +2 completion bonus
                    assert_eq!(candidate.stats().attack, 507);
                    // +30 treasure, +20 base reward
                    assert_eq!(candidate.stats().health, 1050);
                    player = candidate;
                    break;
                }
            }
            assert_eq!(player.stats().attack, 507, "no seed in 0..50 found treasure");
        }
    }
}
