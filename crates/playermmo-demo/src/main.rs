//! Scripted walkthrough of the combat core.
//!
//! Logs go to stderr (filtered by `RUST_LOG`); the final session status is
//! printed to stdout as JSON. Set `PLAYERMMO_RULES` to a JSON rules file to
//! override the defaults.

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use playermmo_core::condition::ConditionTracker;
use playermmo_core::entity::{mage, warrior, PlayerBuilder};
use playermmo_core::equipment::{Item, ItemAction, Loadout};
use playermmo_core::event::EventKind;
use playermmo_core::level::{CaveLevel, DungeonLevel, ForestLevel, Level};
use playermmo_core::party::{Member, Party, PartyCursor};
use playermmo_core::roster::ClassRegistry;
use playermmo_core::{
    Command, Entity, EventMask, GameEvent, GameSession, Rules, StrategySelector, StrategyVariant,
};

const RULES_ENV: &str = "PLAYERMMO_RULES";

fn load_rules() -> Result<Rules> {
    let Ok(path) = std::env::var(RULES_ENV) else {
        return Ok(Rules::default());
    };
    let json =
        std::fs::read_to_string(&path).with_context(|| format!("reading rules from {path}"))?;
    let rules = Rules::from_json(&json).with_context(|| format!("parsing rules in {path}"))?;
    info!(path, "loaded rules");
    Ok(rules)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let rules = load_rules()?;
    let mut session = GameSession::new(rules.clone());
    session.events_mut().subscribe(
        |event: &GameEvent| info!(kind = ?event.kind(), "{event}"),
        EventMask::COMBAT | EventMask::PROGRESS | EventMask::from(EventKind::TierChanged),
    );

    // Roster and builder
    let registry = ClassRegistry::new();
    info!(classes = ?registry.available(), "available classes");
    let thorin = session.register_player(registry.create("warrior", "Thorin"))?;
    let merlin = session.register_player(mage("Merlin"))?;
    let scout = session.register_player(
        PlayerBuilder::new()
            .name("Scout")
            .health(90)
            .mana(40)
            .attack(16)
            .defense(6)
            .level(2)
            .build(),
    )?;
    let goblin = session.register_monster(Entity::monster("Goblin", 5, 12, 40, 2))?;
    let troll = session.register_monster(Entity::monster("Cave Troll", 10, 25, 200, 6))?;
    session.start();

    // Undoable commands
    session.execute(Command::Attack {
        attacker: thorin,
        target: troll,
    })?;
    session.execute(Command::Strategy {
        variant: StrategyVariant::Magical,
        attacker: merlin,
        target: troll,
    })?;
    session.execute(Command::defend(scout, &rules))?;
    session.execute(Command::heal(thorin, &rules))?;
    while session.undo().is_some() {}
    // empty log: warns and does nothing
    session.undo();

    // Direct combat with bounty
    let report = session.process_combat(thorin, goblin)?;
    info!(?report, "combat processed");

    // Party assault on the troll
    let mut party = Party::new("", Some(thorin), session.arena())?;
    for id in [thorin, merlin, scout] {
        party.add(Member::Entity(id));
    }
    let dealt = party.attack(session.arena_mut(), troll)?;
    info!(party = party.name(), dealt, "party assault");
    let casters: Vec<_> =
        PartyCursor::filtered(&party, session.arena(), |e| e.stats().mana >= 70).collect();
    info!(?casters, "members with spare mana");

    // Standalone strategy and tier walkthrough
    let mut selector = StrategySelector::default();
    let mut hero = warrior("Conan");
    let mut dummy = Entity::monster("Training Dummy", 8, 0, 1_000, 1);
    for variant in StrategyVariant::ALL {
        selector.set_strategy(variant);
        let outcome = selector.execute(&mut hero, &mut dummy);
        info!(%variant, damage = outcome.damage, mana = hero.stats().mana, "strategy");
    }
    let mut tracker = ConditionTracker::new(rules.clone());
    for _ in 0..3 {
        let step = tracker.attack(&mut hero, &mut dummy);
        info!(tier = %step.after, "tracked attack");
    }
    tracker.heal(&mut hero);

    // Gear
    let mut loadout = Loadout::new();
    loadout.equip(&mut hero, Item::Sword);
    loadout.equip(&mut hero, Item::Staff);
    info!("{}", loadout.describe(hero.name(), ItemAction::Heal));
    loadout.unequip_all(&mut hero);

    // Levels
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut levels: Vec<Box<dyn Level>> = vec![
        Box::new(ForestLevel::new()),
        Box::new(CaveLevel::new()),
        Box::new(DungeonLevel::new()),
    ];
    for level in &mut levels {
        let report = session.play_level(thorin, level.as_mut(), &mut rng)?;
        if !report.survived {
            break;
        }
    }

    let status = session.status();
    session.end();
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
