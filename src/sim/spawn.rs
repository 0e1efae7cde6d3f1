//! Enemy spawning scaled by the difficulty curve

use glam::Vec2;
use std::f32::consts::TAU;

use super::rng::RandomSource;
use super::state::{Enemy, EnemyVariant, EntityStore, GameEvent, RunState};
use crate::consts::SPAWN_MARGIN;


/// Per-tick spawn probability at difficulty `d`
pub fn spawn_chance(d: f32) -> f32 {
    0.03 + d * 0.025
}

/// Probability that a spawn is a Brute at difficulty `d`
pub fn brute_chance(d: f32) -> f32 {
    0.18 + d * 0.3
}

/// Build an enemy of the given variant at `x`, drawing zigzag and phase
pub fn build_enemy(
    id: u32,
    variant: EnemyVariant,
    x: f32,
    d: f32,
    hp_boost: i32,
    rng: &mut impl RandomSource,
) -> Enemy {
    let (speed, zigzag) = match variant {
        EnemyVariant::Brute => (1.6 + d * 1.6, rng.range(0.02, 0.04)),
        EnemyVariant::Walker => (2.2 + d * 2.2, rng.range(0.025, 0.055)),
    };
    let phase = rng.range(0.0, TAU);
    Enemy {
        id,
        variant,
        pos: Vec2::new(x, variant.spawn_y()),
        radius: variant.radius(),
        hp: variant.base_hp() + hp_boost,
        speed,
        zigzag,
        phase,
        tint: variant.tint(),
        dead: false,
    }
}

/// Roll for a spawn this tick. Returns the new enemy's id when one appears.
pub fn maybe_spawn(
    entities: &mut EntityStore,
    run: &RunState,
    width: f32,
    rng: &mut impl RandomSource,
    events: &mut Vec<GameEvent>,
) -> Option<u32> {
    let d = run.difficulty();
    if rng.unit() >= spawn_chance(d) {
        return None;
    }

    let variant = if rng.unit() < brute_chance(d) {
        EnemyVariant::Brute
    } else {
        EnemyVariant::Walker
    };
    let x = rng.range(SPAWN_MARGIN, width - SPAWN_MARGIN);
    let id = entities.next_entity_id();
    let enemy = build_enemy(id, variant, x, d, run.enemy_hp_boost, rng);
    log::debug!("Spawned {:?} #{} at x={:.1} hp={}", variant, id, x, enemy.hp);

    entities.enemies.push(enemy);
    events.push(GameEvent::EnemySpawned { id, variant });
    Some(id)
}
