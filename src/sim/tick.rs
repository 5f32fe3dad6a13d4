//! Per-frame simulation tick
//!
//! One tick runs to completion: update every entity, resolve collisions,
//! spawn, then check for level transitions. Nothing happens unless the game
//! is playing.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::collision::resolve_collisions;
use super::entity::{Entity, Shooter, UpdateCtx};
use super::spawn::run_spawner;
use super::state::GameState;
use crate::consts::ENEMY_SHOT_SPEED_FACTOR;

/// Advance the game state by one frame
pub fn tick(state: &mut GameState) {
    if !state.is_running() {
        return;
    }

    state.frame += 1;

    update_entities(state);
    resolve_collisions(state);

    // The last life may have gone during collisions
    if !state.is_running() {
        return;
    }

    run_spawner(state);
    state.check_boss_defeat();
}

/// Update a collection, dropping expired entities and collecting shots fired
fn advance_all(entities: &mut Vec<Entity>, ctx: &UpdateCtx<'_>, rng: &mut Pcg32, fired: &mut Vec<Vec2>) {
    entities.retain_mut(|entity| {
        let outcome = entity.update(ctx, rng);
        if let Some(muzzle) = outcome.fired {
            fired.push(muzzle);
        }
        !outcome.expired
    });
}

/// Move the player and every entity collection one frame
fn update_entities(state: &mut GameState) {
    let input = state.input;
    let ctx = UpdateCtx {
        field: state.field,
        multiplier: state.multiplier(),
        input: &input,
        player_speed: state.config.player_speed,
    };

    state.player.update(&ctx, &mut state.rng);

    let mut fired = Vec::new();
    advance_all(&mut state.projectiles, &ctx, &mut state.rng, &mut fired);
    advance_all(&mut state.enemy_projectiles, &ctx, &mut state.rng, &mut fired);
    advance_all(&mut state.enemies, &ctx, &mut state.rng, &mut fired);
    advance_all(&mut state.meteors, &ctx, &mut state.rng, &mut fired);
    advance_all(&mut state.capsules, &ctx, &mut state.rng, &mut fired);
    advance_all(&mut state.bosses, &ctx, &mut state.rng, &mut fired);

    // Shots fired this frame start moving next frame
    let shot_speed = state.config.bullet_speed * ENEMY_SHOT_SPEED_FACTOR * ctx.multiplier;
    for muzzle in fired {
        let id = state.next_entity_id();
        state
            .enemy_projectiles
            .push(Entity::projectile(id, Shooter::Enemy, muzzle, shot_speed));
    }
}
