//! Star Raiders - A single-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, game state)
//! - `renderer`: Render surface contract and draw rules
//! - `game`: Frame driver and host entry points
//! - `config`: Data-driven game balance and key bindings
//! - `autopilot`: Deterministic pilot for headless runs

pub mod autopilot;
pub mod config;
pub mod game;
pub mod renderer;
pub mod sim;

pub use config::{ConfigError, GameConfig, KeyBindings};
pub use game::{Game, Hud};

/// Game configuration constants
pub mod consts {
    /// Player ship size (square)
    pub const PLAYER_SIZE: f32 = 50.0;
    /// Distance from the bottom edge to the top of the player ship
    pub const PLAYER_BOTTOM_OFFSET: f32 = 80.0;

    /// Projectile dimensions
    pub const PROJECTILE_WIDTH: f32 = 6.0;
    pub const PROJECTILE_HEIGHT: f32 = 20.0;
    /// Enemy shots travel at this fraction of the player's bullet speed
    pub const ENEMY_SHOT_SPEED_FACTOR: f32 = 0.7;

    /// Enemy sizes (square)
    pub const LIGHT_ENEMY_SIZE: f32 = 40.0;
    pub const HEAVY_ENEMY_SIZE: f32 = 50.0;
    /// Chance that a periodic spawn produces a heavy enemy
    pub const HEAVY_ENEMY_CHANCE: f64 = 0.3;
    /// Per-frame chance that an enemy resamples its horizontal drift
    pub const ENEMY_WANDER_CHANCE: f64 = 0.02;
    /// Horizontal drift range (before level multiplier)
    pub const ENEMY_WANDER_RANGE: f32 = 3.0;
    /// Per-frame chance that a ready enemy opens fire
    pub const ENEMY_FIRE_CHANCE: f64 = 0.05;
    /// Enemy shoot cooldown range (frames)
    pub const ENEMY_COOLDOWN_MIN: i32 = 50;
    pub const ENEMY_COOLDOWN_MAX: i32 = 150;

    /// Boss geometry: base size plus per-level growth
    pub const BOSS_BASE_WIDTH: f32 = 100.0;
    pub const BOSS_WIDTH_PER_LEVEL: f32 = 20.0;
    pub const BOSS_BASE_HEIGHT: f32 = 80.0;
    pub const BOSS_HEIGHT_PER_LEVEL: f32 = 15.0;
    pub const BOSS_SPAWN_Y: f32 = 50.0;
    pub const BOSS_HEALTH_PER_LEVEL: u8 = 3;
    /// Boss horizontal speed (before level multiplier)
    pub const BOSS_SPEED: f32 = 2.0;
    /// Boss shoot cooldown range (frames)
    pub const BOSS_COOLDOWN_MIN: i32 = 20;
    pub const BOSS_COOLDOWN_MAX: i32 = 50;

    /// Meteor size range
    pub const METEOR_MIN_SIZE: f32 = 20.0;
    pub const METEOR_MAX_SIZE: f32 = 50.0;
    /// Meteor horizontal drift range
    pub const METEOR_DRIFT_RANGE: f32 = 2.0;

    /// Energy capsule size (square)
    pub const CAPSULE_SIZE: f32 = 20.0;

    /// Points awarded
    pub const ENEMY_SCORE: u32 = 10;
    pub const BOSS_SCORE: u32 = 50;

    /// Starfield flicker: stars drawn every N frames
    pub const STAR_INTERVAL: u64 = 10;
    pub const STARS_PER_FLICKER: u32 = 3;
}

/// Axis-aligned rectangle overlap on one axis (strict, touching edges don't count)
#[inline]
pub fn spans_overlap(a_min: f32, a_len: f32, b_min: f32, b_len: f32) -> bool {
    a_min < b_min + b_len && a_min + a_len > b_min
}

/// Hash a pair of integers into a float in [0, 1)
///
/// Used where rendering needs "random" placement without touching the
/// simulation RNG.
#[inline]
pub fn hash_unit(a: u64, b: u64) -> f32 {
    let mut h = a
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(b.wrapping_mul(0xC2B2_AE3D_27D4_EB4F));
    h ^= h >> 33;
    h = h.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    h ^= h >> 33;
    (h >> 40) as f32 / (1u64 << 24) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_overlap_strict() {
        assert!(spans_overlap(0.0, 10.0, 5.0, 10.0));
        // Touching edges do not overlap
        assert!(!spans_overlap(0.0, 10.0, 10.0, 10.0));
        assert!(!spans_overlap(10.0, 10.0, 0.0, 10.0));
    }

    #[test]
    fn test_hash_unit_range() {
        for a in 0..50 {
            for b in 0..10 {
                let v = hash_unit(a, b);
                assert!((0.0..1.0).contains(&v), "got {v}");
            }
        }
        assert_eq!(hash_unit(7, 3), hash_unit(7, 3));
    }
}
