//! Collision detection and resolution
//!
//! All checks are axis-aligned box overlaps between entity collections.
//! [`resolve_collisions`] runs the pairings in a fixed order once per tick;
//! the order decides which effect claims an entity first.

use rand::Rng;

use super::entity::{Body, Entity};
use super::state::{GameEvent, GameState};
use crate::consts::{BOSS_SCORE, ENEMY_SCORE};

/// Index of the first entity in `targets` overlapping `body`
pub fn first_overlap(body: &Body, targets: &[Entity]) -> Option<usize> {
    targets.iter().position(|t| t.body.overlaps(body))
}

/// Remove every entity overlapping `body`, returning how many were removed
pub fn remove_overlapping(body: &Body, targets: &mut Vec<Entity>) -> usize {
    let before = targets.len();
    targets.retain(|t| !t.body.overlaps(body));
    before - targets.len()
}

/// Player projectiles against regular enemies
///
/// Each projectile hits at most one enemy (the first in collection order).
pub fn projectiles_vs_enemies(state: &mut GameState) {
    let mut i = 0;
    while i < state.projectiles.len() {
        let shot = state.projectiles[i].body;
        let Some(j) = first_overlap(&shot, &state.enemies) else {
            i += 1;
            continue;
        };
        state.projectiles.remove(i);

        if state.enemies[j].hit() {
            let enemy = state.enemies.remove(j);
            state.score += ENEMY_SCORE;
            state.emit(GameEvent::EnemyDestroyed { score: state.score });
            log::debug!("Enemy #{} destroyed, score {}", enemy.id, state.score);

            let roll = state.rng.random_bool(state.config.capsule_drop_chance);
            if roll && state.lives < state.config.max_lives {
                let id = state.next_entity_id();
                let speed = state.config.energy_speed;
                state
                    .capsules
                    .push(Entity::capsule(id, enemy.body.center(), speed));
                state.emit(GameEvent::CapsuleDropped);
            }
        }
    }
}

/// Player projectiles against bosses
///
/// A boss is pruned as soon as its health runs out.
pub fn projectiles_vs_bosses(state: &mut GameState) {
    let mut i = 0;
    while i < state.projectiles.len() {
        let shot = state.projectiles[i].body;
        let Some(j) = first_overlap(&shot, &state.bosses) else {
            i += 1;
            continue;
        };
        state.projectiles.remove(i);

        if state.bosses[j].hit() {
            let boss = state.bosses.remove(j);
            state.score += BOSS_SCORE;
            state.emit(GameEvent::BossDestroyed { score: state.score });
            log::info!("Boss #{} destroyed, score {}", boss.id, state.score);
        } else {
            let health = state.bosses[j].health;
            state.emit(GameEvent::BossDamaged { health });
        }
    }
}

/// Ramming an enemy destroys it outright and costs a life
pub fn player_vs_enemies(state: &mut GameState) {
    let player = state.player.body;
    for _ in 0..remove_overlapping(&player, &mut state.enemies) {
        state.take_damage();
    }
}

pub fn player_vs_meteors(state: &mut GameState) {
    let player = state.player.body;
    for _ in 0..remove_overlapping(&player, &mut state.meteors) {
        state.take_damage();
    }
}

pub fn player_vs_capsules(state: &mut GameState) {
    let player = state.player.body;
    for _ in 0..remove_overlapping(&player, &mut state.capsules) {
        state.gain_life();
    }
}

pub fn player_vs_enemy_projectiles(state: &mut GameState) {
    let player = state.player.body;
    for _ in 0..remove_overlapping(&player, &mut state.enemy_projectiles) {
        state.take_damage();
    }
}

/// Run every collision pairing for one tick
pub fn resolve_collisions(state: &mut GameState) {
    projectiles_vs_enemies(state);
    projectiles_vs_bosses(state);
    player_vs_enemies(state);
    player_vs_meteors(state);
    player_vs_capsules(state);
    player_vs_enemy_projectiles(state);
}
