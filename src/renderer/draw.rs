//! Draw rules: how each kind of entity looks
//!
//! Drawing only reads the game state. The flickering starfield is derived
//! from a hash of the run seed and frame so it never touches the simulation RNG.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::Surface;
use super::vertex::colors;
use crate::consts::{STAR_INTERVAL, STARS_PER_FLICKER};
use crate::hash_unit;
use crate::sim::{EnemyClass, Entity, EntityKind, GamePhase, GameState};

/// Cockpit disc radius and its offset below the ship's nose
const COCKPIT_RADIUS: f32 = 8.0;
const COCKPIT_OFFSET: f32 = 20.0;

/// Render one frame of the game
pub fn draw_frame<S: Surface + ?Sized>(state: &GameState, surface: &mut S) {
    surface.clear(colors::BACKGROUND);

    if state.phase == GamePhase::Menu {
        return;
    }

    if state.config.starfield {
        draw_stars(state.seed, state.frame, surface);
    }

    draw_entity(&state.player, surface);
    for entity in state
        .projectiles
        .iter()
        .chain(&state.enemy_projectiles)
        .chain(&state.enemies)
        .chain(&state.meteors)
        .chain(&state.capsules)
        .chain(&state.bosses)
    {
        draw_entity(entity, surface);
    }
}

/// A few 1-3 px stars every few frames
pub fn draw_stars<S: Surface + ?Sized>(seed: u64, frame: u64, surface: &mut S) {
    if frame % STAR_INTERVAL != 0 {
        return;
    }

    let bounds = surface.size();
    for i in 0..STARS_PER_FLICKER {
        let key = frame.wrapping_mul(8).wrapping_add(u64::from(i) * 3);
        let x = hash_unit(seed, key) * bounds.x;
        let y = hash_unit(seed, key.wrapping_add(1)) * bounds.y;
        let size = hash_unit(seed, key.wrapping_add(2)) * 2.0 + 1.0;
        surface.fill_rect(Vec2::new(x, y), Vec2::splat(size), colors::STAR);
    }
}

/// Draw a single entity with its kind's shape and color
pub fn draw_entity<S: Surface + ?Sized>(entity: &Entity, surface: &mut S) {
    let body = &entity.body;
    let (x, y) = (body.pos.x, body.pos.y);
    let (w, h) = (body.size.x, body.size.y);

    match entity.kind {
        EntityKind::Player => {
            let hull = [
                Vec2::new(x + w / 2.0, y),
                Vec2::new(x + w, y + h),
                Vec2::new(x, y + h),
            ];
            surface.fill_polygon(&hull, colors::PLAYER);
            surface.fill_circle(
                Vec2::new(x + w / 2.0, y + COCKPIT_OFFSET),
                COCKPIT_RADIUS,
                colors::COCKPIT,
            );
        }
        EntityKind::Projectile(_) => {
            surface.fill_rect(body.pos, body.size, colors::PROJECTILE);
        }
        EntityKind::Enemy(EnemyClass::Light) => {
            // Arrowhead pointing right
            let points = [
                Vec2::new(x, y),
                Vec2::new(x + w, y + h / 2.0),
                Vec2::new(x, y + h),
            ];
            surface.fill_polygon(&points, colors::LIGHT_ENEMY);
        }
        EntityKind::Enemy(EnemyClass::Heavy) => {
            // Middle third band
            surface.fill_rect(
                Vec2::new(x, y + h / 3.0),
                Vec2::new(w, h / 3.0),
                colors::HEAVY_ENEMY,
            );
        }
        EntityKind::Boss { level } => {
            surface.fill_arc(body.center(), w / 2.0, PI, TAU, colors::boss(level));
        }
        EntityKind::Meteor => {
            surface.fill_circle(body.center(), w / 2.0, colors::METEOR);
        }
        EntityKind::EnergyCapsule => {
            surface.fill_circle(body.center(), w / 2.0, colors::CAPSULE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::renderer::shapes::{CIRCLE_SEGMENTS, MeshSurface};
    use crate::renderer::vertex::Color;
    use crate::sim::{Field, Shooter};

    /// Surface that records each call by name
    #[derive(Default)]
    struct Recorder {
        calls: Vec<(&'static str, Color)>,
    }

    impl Surface for Recorder {
        fn size(&self) -> Vec2 {
            Vec2::new(800.0, 600.0)
        }
        fn clear(&mut self, color: Color) {
            self.calls.clear();
            self.calls.push(("clear", color));
        }
        fn fill_rect(&mut self, _pos: Vec2, _size: Vec2, color: Color) {
            self.calls.push(("rect", color));
        }
        fn fill_polygon(&mut self, _points: &[Vec2], color: Color) {
            self.calls.push(("polygon", color));
        }
        fn fill_arc(&mut self, _c: Vec2, _r: f32, _s: f32, _e: f32, color: Color) {
            self.calls.push(("arc", color));
        }
    }

    fn new_state() -> GameState {
        let config = GameConfig::default();
        let field = Field {
            width: config.width,
            height: config.height,
        };
        GameState::new(config, field, 7).unwrap()
    }

    #[test]
    fn test_menu_draws_background_only() {
        let mut state = new_state();
        state.phase = GamePhase::Menu;
        let mut surface = Recorder::default();
        draw_frame(&state, &mut surface);
        assert_eq!(surface.calls, vec![("clear", colors::BACKGROUND)]);
    }

    #[test]
    fn test_player_ship_shape() {
        let mut state = new_state();
        state.frame = 1;
        let mut surface = Recorder::default();
        draw_frame(&state, &mut surface);
        assert_eq!(
            surface.calls,
            vec![
                ("clear", colors::BACKGROUND),
                ("polygon", colors::PLAYER),
                ("arc", colors::COCKPIT),
            ]
        );
    }

    #[test]
    fn test_each_kind_has_its_color() {
        let mut state = new_state();
        state.frame = 1;
        let muzzle = state.player.body.pos;
        state
            .projectiles
            .push(Entity::projectile(10, Shooter::Player, muzzle, -10.0));
        let mut rng = state.rng.clone();
        state
            .enemies
            .push(Entity::enemy(11, EnemyClass::Light, 0.0, 1, 3.0, &mut rng));
        state
            .enemies
            .push(Entity::enemy(12, EnemyClass::Heavy, 100.0, 1, 3.0, &mut rng));
        state.meteors.push(Entity::meteor(13, state.field, 4.0, &mut rng));
        state
            .capsules
            .push(Entity::capsule(14, Vec2::new(50.0, 50.0), 3.0));
        state
            .bosses
            .push(Entity::boss(15, 2, state.field, 1.3, &mut rng));

        let mut surface = Recorder::default();
        draw_frame(&state, &mut surface);
        let tail: Vec<_> = surface.calls[3..].to_vec();
        assert_eq!(
            tail,
            vec![
                ("rect", colors::PROJECTILE),
                ("polygon", colors::LIGHT_ENEMY),
                ("rect", colors::HEAVY_ENEMY),
                ("arc", colors::METEOR),
                ("arc", colors::CAPSULE),
                ("arc", colors::BOSSES[1]),
            ]
        );
    }

    #[test]
    fn test_stars_flicker_every_tenth_frame() {
        let mut surface = Recorder::default();
        draw_stars(1, 9, &mut surface);
        assert!(surface.calls.is_empty());

        draw_stars(1, 10, &mut surface);
        assert_eq!(surface.calls.len(), STARS_PER_FLICKER as usize);
        assert!(surface.calls.iter().all(|c| *c == ("rect", colors::STAR)));
    }

    #[test]
    fn test_stars_are_reproducible_and_small() {
        let mut a = MeshSurface::new(800.0, 600.0);
        let mut b = MeshSurface::new(800.0, 600.0);
        draw_stars(42, 30, &mut a);
        draw_stars(42, 30, &mut b);
        assert_eq!(a.vertices(), b.vertices());

        for star in a.vertices().chunks(6) {
            let w = star[1].position[0] - star[0].position[0];
            assert!(w > 0.99 && w < 3.01, "star size {w}");
        }
        for v in a.vertices() {
            let [x, y] = v.position;
            assert!((0.0..=803.0).contains(&x) && (0.0..=603.0).contains(&y));
        }
    }

    #[test]
    fn test_starfield_toggle() {
        let mut state = new_state();
        state.frame = 10;
        state.config.starfield = false;
        let mut surface = MeshSurface::new(800.0, 600.0);
        draw_frame(&state, &mut surface);
        // Player hull plus cockpit only
        assert_eq!(surface.triangle_count(), 1 + CIRCLE_SEGMENTS as usize);
    }
}
