//! Property tests over arbitrary inputs and upgrade sequences

use glam::Vec2;
use proptest::prelude::*;

use sector_runner::consts::{MAX_SPEED, MAX_SQUAD_SIZE, MIN_FIRE_INTERVAL_MS, PLAYER_X_MARGIN};
use sector_runner::sim::combat::resolve_bullet_hits;
use sector_runner::sim::rng::seeded;
use sector_runner::sim::spawn::build_enemy;
use sector_runner::sim::upgrade::apply_upgrade;
use sector_runner::sim::{
    Bullet, EnemyVariant, EntityStore, GameState, Player, RunState, SimConfig, TickInput,
    UpgradeChoice, tick,
};

fn input_strategy() -> impl Strategy<Value = Vec<(bool, bool)>> {
    prop::collection::vec((any::<bool>(), any::<bool>()), 1..300)
}

fn to_input((move_left, move_right): (bool, bool)) -> TickInput {
    TickInput {
        move_left,
        move_right,
        command: None,
    }
}

fn choice_strategy() -> impl Strategy<Value = UpgradeChoice> {
    prop_oneof![Just(UpgradeChoice::Weapon), Just(UpgradeChoice::Squad)]
}

proptest! {
    #[test]
    fn player_stays_inside_margins(seed in any::<u64>(), inputs in input_strategy()) {
        let config = SimConfig::default();
        let mut state = GameState::new(seed, config);
        state.reset_run();
        for (frame, held) in inputs.into_iter().enumerate() {
            tick(&mut state, &to_input(held), frame as f64 * 16.0);
            prop_assert!(state.player.pos.x >= PLAYER_X_MARGIN);
            prop_assert!(state.player.pos.x <= config.width() - PLAYER_X_MARGIN);
            prop_assert!((0..=100).contains(&state.player.health));
        }
    }

    #[test]
    fn upgrades_keep_caps_and_raise_thresholds(
        choices in prop::collection::vec(choice_strategy(), 0..40)
    ) {
        let mut player = Player::new(&SimConfig::default());
        let mut run = RunState::default();
        for choice in choices {
            let before = run.next_choice_at;
            apply_upgrade(&mut player, &mut run, choice);
            prop_assert!(run.next_choice_at > before);
            prop_assert!(player.squad_size <= MAX_SQUAD_SIZE);
            prop_assert!(player.fire_interval >= MIN_FIRE_INTERVAL_MS);
            prop_assert!(run.speed <= MAX_SPEED);
        }
    }

    #[test]
    fn hit_removes_exactly_bullet_damage(hp in 1i32..200, damage in 1i32..200) {
        let mut entities = EntityStore::default();
        let mut run = RunState::default();
        let mut rng = seeded(3);
        let mut events = Vec::new();
        let id = entities.next_entity_id();
        let mut enemy = build_enemy(id, EnemyVariant::Walker, 200.0, 0.0, 0, &mut rng);
        enemy.pos = Vec2::new(200.0, 300.0);
        enemy.hp = hp;
        entities.enemies.push(enemy);
        entities.bullets.push(Bullet {
            pos: Vec2::new(200.0, 300.0),
            vel: Vec2::new(0.0, -8.82),
            damage,
            life: 100,
        });

        let hits = resolve_bullet_hits(&mut entities, &mut run, &mut rng, &mut events);
        prop_assert_eq!(hits.len(), 1);
        prop_assert_eq!(entities.enemies[0].hp, hp - damage);
        prop_assert_eq!(entities.enemies[0].dead, damage >= hp);
        prop_assert_eq!(run.kills, u32::from(damage >= hp));
    }

    #[test]
    fn same_seed_same_run(seed in any::<u64>(), inputs in input_strategy()) {
        let mut a = GameState::new(seed, SimConfig::default());
        let mut b = GameState::new(seed, SimConfig::default());
        a.reset_run();
        b.reset_run();
        for (frame, held) in inputs.into_iter().enumerate() {
            let now = frame as f64 * 1000.0 / 60.0;
            tick(&mut a, &to_input(held), now);
            tick(&mut b, &to_input(held), now);
        }
        prop_assert_eq!(a.run.distance, b.run.distance);
        prop_assert_eq!(a.run.kills, b.run.kills);
        prop_assert_eq!(a.player.health, b.player.health);
        prop_assert_eq!(a.player.pos, b.player.pos);
        let ids = |s: &GameState| s.entities.enemies.iter().map(|e| e.id).collect::<Vec<_>>();
        prop_assert_eq!(ids(&a), ids(&b));
        prop_assert_eq!(a.entities.particles.len(), b.entities.particles.len());
    }
}
