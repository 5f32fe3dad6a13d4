//! Frame driver and host entry points
//!
//! [`Game`] owns the configuration, the play-field bounds and the current
//! [`GameState`]. Hosts forward input and resize notifications to it, call
//! [`Game::frame`] once per display frame, and read [`Game::hud`] and
//! [`Game::drain_events`] to update their own UI.

use serde::Serialize;

use crate::config::{Action, ConfigError, GameConfig};
use crate::renderer::{Surface, draw_frame};
use crate::sim::{Direction, Field, GameEvent, GamePhase, GameState, tick};

/// Snapshot of what the HUD shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hud {
    pub score: u32,
    pub lives: u8,
    pub level: u8,
    pub phase: GamePhase,
}

/// The running game, as seen by a host
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    field: Field,
    state: GameState,
}

impl Game {
    /// Validate the config and sit on the menu until [`Game::start_game`]
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        let field = Field {
            width: config.width,
            height: config.height,
        };
        let state = GameState::new(config.clone(), field, seed)?;
        let mut game = Self {
            config,
            field,
            state,
        };
        game.enter_menu();
        Ok(game)
    }

    fn enter_menu(&mut self) {
        self.state.phase = GamePhase::Menu;
        self.state.events.clear();
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Start a fresh game (also used for restart)
    pub fn start_game(&mut self, seed: u64) {
        self.state = GameState::with_validated(self.config.clone(), self.field, seed);
    }

    /// Continue after a level-complete screen
    ///
    /// Returns false when the game is not waiting between levels.
    pub fn advance_level(&mut self) -> bool {
        if self.state.phase != GamePhase::LevelComplete {
            log::warn!("advance_level ignored in phase {:?}", self.state.phase);
            return false;
        }
        self.state.next_level()
    }

    /// Fire a player projectile if the game is running and the gun is ready
    pub fn fire_requested(&mut self) -> bool {
        self.state.fire()
    }

    pub fn set_horizontal_input(&mut self, direction: Direction, pressed: bool) {
        self.state.input.set(direction, pressed);
    }

    /// Apply a new viewport size; zero-sized viewports are ignored
    pub fn on_resize(&mut self, width: f32, height: f32) {
        let field = Field { width, height };
        match self.state.resize(field) {
            Ok(()) => self.field = field,
            Err(e) => log::warn!("Resize ignored: {e}"),
        }
    }

    /// Run one simulation tick and draw the result
    ///
    /// Returns whether the game is still running, so hosts know whether to
    /// schedule another frame.
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        tick(&mut self.state);
        draw_frame(&self.state, surface);
        self.state.is_running()
    }

    pub fn toggle_pause(&mut self) {
        self.state.toggle_pause();
        log::info!("Phase now {:?}", self.state.phase);
    }

    /// Abandon the current run and go back to the title screen
    pub fn return_to_menu(&mut self) {
        let seed = self.state.seed;
        self.state = GameState::with_validated(self.config.clone(), self.field, seed);
        self.enter_menu();
    }

    /// Route a key press or release through the key bindings
    ///
    /// Returns true if the key is bound to an action.
    pub fn handle_key(&mut self, key: &str, pressed: bool) -> bool {
        let Some(action) = self.config.keys.action_for(key) else {
            return false;
        };
        match action {
            Action::Left => self.set_horizontal_input(Direction::Left, pressed),
            Action::Right => self.set_horizontal_input(Direction::Right, pressed),
            Action::Fire if pressed => {
                self.fire_requested();
            }
            Action::Pause if pressed => self.toggle_pause(),
            Action::Fire | Action::Pause => {}
        }
        true
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.state.score,
            lives: self.state.lives,
            level: self.state.level,
            phase: self.state.phase,
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}
