//! Headless autopilot
//!
//! A simple deterministic pilot that plays the game without a display. Used
//! by the native binary for seeded soak runs and by tests that need a game
//! to progress on its own.

use serde::Serialize;

use crate::game::Game;
use crate::renderer::{Surface, Vertex};
use crate::sim::{Direction, GameEvent, GamePhase, GameState};
use crate::spans_overlap;

/// Default look-ahead above the ship when scanning for hazards
pub const DEFAULT_LOOKAHEAD: f32 = 160.0;
/// Extra clearance added on each side of a hazard
pub const DEFAULT_MARGIN: f32 = 8.0;

/// What the pilot wants to do this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub direction: Option<Direction>,
    pub fire: bool,
}

/// Dodge what is about to hit the ship, otherwise line up under the lowest target
#[derive(Debug, Clone, Copy)]
pub struct Pilot {
    pub lookahead: f32,
    pub margin: f32,
}

impl Default for Pilot {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
            margin: DEFAULT_MARGIN,
        }
    }
}

impl Pilot {
    pub fn decide(&self, state: &GameState) -> Controls {
        let ship = &state.player.body;
        let ship_center = ship.center().x;

        let threat = state
            .enemy_projectiles
            .iter()
            .chain(&state.meteors)
            .chain(&state.enemies)
            .filter(|e| {
                let bottom = e.body.bottom();
                bottom > ship.pos.y - self.lookahead && e.body.pos.y < ship.bottom()
            })
            .filter(|e| {
                spans_overlap(
                    e.body.pos.x - self.margin,
                    e.body.size.x + 2.0 * self.margin,
                    ship.pos.x,
                    ship.size.x,
                )
            })
            .max_by(|a, b| a.body.bottom().total_cmp(&b.body.bottom()));

        if let Some(threat) = threat {
            let mut direction = if threat.body.center().x > ship_center {
                Direction::Left
            } else {
                Direction::Right
            };
            // Pinned against a wall: squeeze past on the other side
            if direction == Direction::Left && ship.pos.x <= 0.0 {
                direction = Direction::Right;
            } else if direction == Direction::Right && ship.right() >= state.field.width {
                direction = Direction::Left;
            }
            return Controls {
                direction: Some(direction),
                fire: true,
            };
        }

        let target = state
            .enemies
            .iter()
            .chain(&state.bosses)
            .max_by(|a, b| a.body.bottom().total_cmp(&b.body.bottom()));

        let direction = target.and_then(|t| {
            let dx = t.body.center().x - ship_center;
            if dx.abs() < state.config.player_speed {
                None
            } else if dx < 0.0 {
                Some(Direction::Left)
            } else {
                Some(Direction::Right)
            }
        });

        Controls {
            direction,
            fire: target.is_some(),
        }
    }
}

/// Summary of one headless run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunMetrics {
    pub seed: u64,
    pub max_frames: u64,
    pub frame_count: u64,
    pub final_score: u32,
    pub final_lives: u8,
    pub final_level: u8,
    pub final_phase: GamePhase,
    pub shots_fired: u32,
    pub enemies_destroyed: u32,
    pub bosses_destroyed: u32,
    pub lives_lost: u32,
    pub lives_gained: u32,
    /// Triangles in the last rendered frame
    pub last_frame_triangles: usize,
    /// Size of the last frame's vertex buffer upload
    pub last_frame_bytes: usize,
}

impl RunMetrics {
    fn new(seed: u64, max_frames: u64) -> Self {
        Self {
            seed,
            max_frames,
            frame_count: 0,
            final_score: 0,
            final_lives: 0,
            final_level: 0,
            final_phase: GamePhase::Menu,
            shots_fired: 0,
            enemies_destroyed: 0,
            bosses_destroyed: 0,
            lives_lost: 0,
            lives_gained: 0,
            last_frame_triangles: 0,
            last_frame_bytes: 0,
        }
    }

    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::EnemyDestroyed { .. } => self.enemies_destroyed += 1,
            GameEvent::BossDestroyed { .. } => self.bosses_destroyed += 1,
            GameEvent::PlayerDamaged { .. } => self.lives_lost += 1,
            GameEvent::LifeGained { .. } => self.lives_gained += 1,
            _ => {}
        }
    }
}

/// Play a fresh game with the pilot until it ends or `max_frames` run out
///
/// Levels are advanced as soon as they complete. `mesh` exposes the vertices
/// the surface holds after each frame (empty if the surface does not keep
/// them).
pub fn run_headless<S, F>(
    game: &mut Game,
    pilot: &Pilot,
    seed: u64,
    max_frames: u64,
    surface: &mut S,
    mesh: F,
) -> RunMetrics
where
    S: Surface + ?Sized,
    F: Fn(&S) -> &[Vertex],
{
    let mut metrics = RunMetrics::new(seed, max_frames);
    game.start_game(seed);

    while metrics.frame_count < max_frames {
        match game.phase() {
            GamePhase::Playing => {}
            GamePhase::LevelComplete => {
                game.advance_level();
                continue;
            }
            GamePhase::Menu | GamePhase::Paused | GamePhase::GameOver | GamePhase::GameComplete => {
                break;
            }
        }

        let controls = pilot.decide(game.state());
        game.set_horizontal_input(Direction::Left, controls.direction == Some(Direction::Left));
        game.set_horizontal_input(Direction::Right, controls.direction == Some(Direction::Right));
        if controls.fire && game.fire_requested() {
            metrics.shots_fired += 1;
        }

        game.frame(surface);
        metrics.frame_count += 1;
        let vertices = mesh(&*surface);
        metrics.last_frame_triangles = vertices.len() / 3;
        metrics.last_frame_bytes = Vertex::as_bytes(vertices).len();

        for event in game.drain_events() {
            metrics.record(&event);
        }
    }

    let hud = game.hud();
    metrics.final_score = hud.score;
    metrics.final_lives = hud.lives;
    metrics.final_level = hud.level;
    metrics.final_phase = hud.phase;
    log::info!(
        "Run finished after {} frames: {:?}, level {}, score {}",
        metrics.frame_count,
        hud.phase,
        hud.level,
        hud.score
    );
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::renderer::MeshSurface;
    use crate::sim::{Entity, Shooter};
    use glam::Vec2;

    fn run(seed: u64, frames: u64) -> RunMetrics {
        let mut game = Game::new(GameConfig::default(), seed).unwrap();
        let mut surface = MeshSurface::new(800.0, 600.0);
        run_headless(
            &mut game,
            &Pilot::default(),
            seed,
            frames,
            &mut surface,
            MeshSurface::vertices,
        )
    }

    fn playing_state() -> GameState {
        let mut game = Game::new(GameConfig::default(), 11).unwrap();
        game.start_game(11);
        game.state().clone()
    }

    #[test]
    fn test_dodges_shot_from_above() {
        let mut state = playing_state();
        let ship = state.player.body;
        // Slightly right of the ship's center, falling toward it
        let pos = Vec2::new(ship.center().x + 2.0, ship.pos.y - 60.0);
        state
            .enemy_projectiles
            .push(Entity::projectile(50, Shooter::Enemy, pos, 7.0));

        let controls = Pilot::default().decide(&state);
        assert_eq!(controls.direction, Some(Direction::Left));
    }

    #[test]
    fn test_dodges_away_from_wall() {
        let mut state = playing_state();
        state.player.body.pos.x = 0.0;
        let ship = state.player.body;
        let pos = Vec2::new(ship.center().x + 2.0, ship.pos.y - 60.0);
        state
            .enemy_projectiles
            .push(Entity::projectile(50, Shooter::Enemy, pos, 7.0));

        let controls = Pilot::default().decide(&state);
        assert_eq!(controls.direction, Some(Direction::Right));
    }

    #[test]
    fn test_idle_without_targets() {
        let state = playing_state();
        assert_eq!(Pilot::default().decide(&state), Controls::default());
    }

    #[test]
    fn test_lines_up_under_target() {
        let mut state = playing_state();
        let mut rng = state.rng.clone();
        let enemy = Entity::enemy(60, crate::sim::EnemyClass::Light, 40.0, 1, 3.0, &mut rng);
        state.enemies.push(enemy);

        let controls = Pilot::default().decide(&state);
        assert_eq!(controls.direction, Some(Direction::Left));
        assert!(controls.fire);
    }

    #[test]
    fn test_headless_run_is_reproducible() {
        let a = run(2024, 1500);
        let b = run(2024, 1500);
        assert_eq!(a, b);
    }

    #[test]
    fn test_headless_run_metrics() {
        let metrics = run(7, 2000);
        assert!(metrics.frame_count <= 2000);
        assert!(metrics.final_lives <= 4);
        assert!(metrics.final_level >= 1 && metrics.final_level <= 4);
        assert_eq!(
            metrics.final_score,
            metrics.enemies_destroyed * 10 + metrics.bosses_destroyed * 50
        );
        assert!(metrics.shots_fired > 0);
        assert!(metrics.last_frame_triangles > 0);
        assert_eq!(
            metrics.last_frame_bytes,
            metrics.last_frame_triangles * 3 * std::mem::size_of::<Vertex>()
        );

        match metrics.final_phase {
            GamePhase::Playing | GamePhase::LevelComplete => {
                assert_eq!(metrics.frame_count, 2000)
            }
            GamePhase::GameOver => assert_eq!(metrics.final_lives, 0),
            GamePhase::GameComplete => assert_eq!(metrics.bosses_destroyed, 4),
            other => panic!("unexpected final phase {other:?}"),
        }
    }
}
