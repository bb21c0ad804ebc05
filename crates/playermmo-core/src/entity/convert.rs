//! Conversions between players and monsters.
//!
//! A player turned monster hits harder and soaks more; a monster turned
//! player keeps only a fraction of its power and loses all mana.

use super::{Entity, EntityKind, Stats};

impl Entity {
    /// Reinterprets this entity as a monster.
    ///
    /// Defense is tripled, attack and health doubled; name and level carry
    /// over. Mana is dropped because monsters never carry it.
    ///
    /// ```
    /// use playermmo_core::entity::{Entity, Stats};
    ///
    /// let hero = Entity::player("Hero", Stats::default());
    /// let beast = hero.to_monster();
    ///
    /// assert!(beast.is_monster());
    /// assert_eq!(beast.stats().defense, 15);
    /// assert_eq!(beast.stats().health, 200);
    /// ```
    #[must_use]
    pub fn to_monster(&self) -> Entity {
        let stats = self.stats();
        Entity::monster(
            self.name(),
            stats.defense * 3,
            stats.attack * 2,
            stats.health * 2,
            stats.level,
        )
    }

    /// Reinterprets this entity as a player.
    ///
    /// Health and attack are halved, defense divided by three, mana starts at
    /// zero. The name gains a `"Monster "` prefix.
    #[must_use]
    pub fn to_player(&self) -> Entity {
        let stats = self.stats();
        Entity::new(
            EntityKind::Player,
            format!("Monster {}", self.name()),
            Stats {
                health: stats.health / 2,
                mana: 0,
                attack: stats.attack / 2,
                defense: stats.defense / 3,
                level: stats.level,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monster_to_player_scales_down() {
        let orc = Entity::monster("Orc", 9, 15, 80, 4);
        let player = orc.to_player();

        assert!(player.is_player());
        assert_eq!(player.name(), "Monster Orc");
        assert_eq!(
            *player.stats(),
            Stats {
                health: 40,
                mana: 0,
                attack: 7,
                defense: 3,
                level: 4,
            }
        );
    }

    #[test]
    fn player_to_monster_scales_up() {
        let hero = Entity::player(
            "Hero",
            Stats {
                health: 120,
                mana: 40,
                attack: 11,
                defense: 6,
                level: 2,
            },
        );
        let monster = hero.to_monster();

        assert_eq!(monster.name(), "Hero");
        assert_eq!(
            *monster.stats(),
            Stats {
                health: 240,
                mana: 0,
                attack: 22,
                defense: 18,
                level: 2,
            }
        );
    }

    #[test]
    fn conversion_leaves_source_untouched() {
        let hero = Entity::player("Hero", Stats::default());
        let _ = hero.to_monster();
        assert_eq!(*hero.stats(), Stats::default());
    }
}
