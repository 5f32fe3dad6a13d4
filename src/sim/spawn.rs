//! Enemy, meteor and boss spawning

use rand::Rng;

use super::entity::{EnemyClass, Entity};
use super::state::{GameEvent, GameState};
use crate::consts::HEAVY_ENEMY_CHANCE;

/// Whether the periodic spawn fires on the current frame
pub fn periodic_spawn_due(state: &GameState) -> bool {
    !state.boss_active && state.frame % state.config.spawn_interval(state.level) == 0
}

/// Whether the boss for the current level should appear now
pub fn boss_spawn_due(state: &GameState) -> bool {
    state.score >= state.config.boss_threshold(state.level)
        && !state.boss_active
        && state.bosses.is_empty()
}

/// Spawn one enemy above the top edge at a random horizontal offset
pub fn spawn_enemy(state: &mut GameState) {
    let class = if state.rng.random_bool(HEAVY_ENEMY_CHANCE) {
        EnemyClass::Heavy
    } else {
        EnemyClass::Light
    };
    let x = state.rng.random::<f32>() * (state.field.width - class.size()).max(0.0);
    let fall_speed = state.config.enemy_speed * state.multiplier();
    let id = state.next_entity_id();
    let enemy = Entity::enemy(id, class, x, state.level, fall_speed, &mut state.rng);
    log::debug!("Spawned {class:?} enemy #{id} at x={x:.0}");
    state.enemies.push(enemy);
}

/// Spawn one meteor above the top edge
pub fn spawn_meteor(state: &mut GameState) {
    let fall_speed = state.config.meteor_speed * state.multiplier();
    let id = state.next_entity_id();
    let meteor = Entity::meteor(id, state.field, fall_speed, &mut state.rng);
    state.meteors.push(meteor);
}

/// Spawn the boss for the current level and start the boss fight
pub fn spawn_boss(state: &mut GameState) {
    let id = state.next_entity_id();
    let multiplier = state.multiplier();
    let boss = Entity::boss(id, state.level, state.field, multiplier, &mut state.rng);
    let health = boss.health;
    state.bosses.push(boss);
    state.boss_active = true;
    state.emit(GameEvent::BossSpawned {
        level: state.level,
        health,
    });
    log::info!("Boss for level {} spawned ({} hp)", state.level, health);
}

/// Run both spawn triggers for this frame
///
/// Enemies already on screen stay when the boss arrives.
pub fn run_spawner(state: &mut GameState) {
    if periodic_spawn_due(state) {
        spawn_enemy(state);
        spawn_meteor(state);
    }
    if boss_spawn_due(state) {
        spawn_boss(state);
    }
}
