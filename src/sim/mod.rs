//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, velocities in pixels per frame
//! - Seeded RNG only
//! - Stable iteration order (collection order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::resolve_collisions;
pub use entity::{Body, EnemyClass, Entity, EntityKind, Field, Shooter, UpdateCtx, UpdateOutcome};
pub use spawn::run_spawner;
pub use state::{Direction, GameEvent, GamePhase, GameState, InputState};
pub use tick::tick;
