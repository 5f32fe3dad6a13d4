//! Game state and phase transitions
//!
//! A [`GameState`] is one run of the game: built fresh on start/restart,
//! mutated by [`super::tick`] every frame, and replaced on restart or
//! return-to-menu.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, Field, Shooter};
use crate::config::{ConfigError, GameConfig, validate_field};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    Menu,
    /// Active gameplay
    Playing,
    /// Gameplay suspended by the player
    Paused,
    /// Boss beaten, waiting for the player to continue
    LevelComplete,
    /// Out of lives
    GameOver,
    /// Final boss beaten
    GameComplete,
}

/// Horizontal input direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// Held directional input, read by the player at the top of each tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
}

impl InputState {
    pub fn set(&mut self, direction: Direction, pressed: bool) {
        match direction {
            Direction::Left => self.left = pressed,
            Direction::Right => self.right = pressed,
        }
    }
}

/// Things that happened during a tick, for hosts to react to (HUD, screens)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: u8 },
    EnemyDestroyed { score: u32 },
    CapsuleDropped,
    BossSpawned { level: u8, health: u8 },
    BossDamaged { health: u8 },
    BossDestroyed { score: u32 },
    PlayerDamaged { lives: u8 },
    LifeGained { lives: u8 },
    LevelComplete { level: u8 },
    GameOver { score: u32 },
    GameComplete { score: u32 },
}

/// Complete state of one game
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation RNG (all gameplay randomness comes from here)
    pub rng: Pcg32,
    /// Balance values this run was built with
    pub config: GameConfig,
    pub phase: GamePhase,
    pub score: u32,
    pub lives: u8,
    /// Current level (1-based)
    pub level: u8,
    /// Frames simulated in the current level
    pub frame: u64,
    pub input: InputState,
    pub field: Field,
    pub player: Entity,
    /// Player-fired projectiles
    pub projectiles: Vec<Entity>,
    pub enemies: Vec<Entity>,
    /// Projectiles fired by enemies and bosses
    pub enemy_projectiles: Vec<Entity>,
    pub meteors: Vec<Entity>,
    pub capsules: Vec<Entity>,
    pub bosses: Vec<Entity>,
    /// Set while a boss fight is in progress
    pub boss_active: bool,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Start a new game at level 1 with full lives
    pub fn new(config: GameConfig, field: Field, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        validate_field(field.width, field.height)?;
        Ok(Self::with_validated(config, field, seed))
    }

    /// Build a state from a config and field that already passed validation
    pub(crate) fn with_validated(config: GameConfig, field: Field, seed: u64) -> Self {
        let lives = config.max_lives;
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
            phase: GamePhase::Playing,
            score: 0,
            lives,
            level: 1,
            frame: 0,
            input: InputState::default(),
            field,
            player: Entity::player(0, field),
            projectiles: Vec::new(),
            enemies: Vec::new(),
            enemy_projectiles: Vec::new(),
            meteors: Vec::new(),
            capsules: Vec::new(),
            bosses: Vec::new(),
            boss_active: false,
            events: Vec::new(),
            next_id: 1,
        };
        state.player.id = state.next_entity_id();
        state.emit(GameEvent::LevelStarted { level: 1 });
        log::info!("New game (seed {seed}, field {}x{})", field.width, field.height);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Difficulty multiplier of the current level
    pub fn multiplier(&self) -> f32 {
        self.config.multiplier(self.level)
    }

    /// Player fires, if the game is running and the cooldown allows
    pub fn fire(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(muzzle) = self.player.try_shoot(self.config.player_cooldown) else {
            return false;
        };
        let id = self.next_entity_id();
        let speed = self.config.bullet_speed;
        self.projectiles
            .push(Entity::projectile(id, Shooter::Player, muzzle, -speed));
        true
    }

    /// Lose a life; the last one ends the game immediately
    pub fn take_damage(&mut self) {
        if self.lives == 0 {
            return;
        }
        self.lives -= 1;
        self.emit(GameEvent::PlayerDamaged { lives: self.lives });
        log::debug!("Player hit, {} lives left", self.lives);

        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            self.emit(GameEvent::GameOver { score: self.score });
            log::info!("Game over at level {} with score {}", self.level, self.score);
        }
    }

    /// Gain a life, up to the configured maximum
    ///
    /// Only a game in progress can gain lives; a finished game stays finished.
    pub fn gain_life(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        if self.lives < self.config.max_lives {
            self.lives += 1;
            self.emit(GameEvent::LifeGained { lives: self.lives });
        }
    }

    /// Finish the level once the active boss is gone
    ///
    /// Returns true if a transition happened.
    pub fn check_boss_defeat(&mut self) -> bool {
        if !self.boss_active || !self.bosses.is_empty() {
            return false;
        }
        self.boss_active = false;

        if self.level < self.config.levels {
            self.phase = GamePhase::LevelComplete;
            self.emit(GameEvent::LevelComplete { level: self.level });
            log::info!("Level {} complete (score {})", self.level, self.score);
        } else {
            self.phase = GamePhase::GameComplete;
            self.emit(GameEvent::GameComplete { score: self.score });
            log::info!("All {} levels cleared, final score {}", self.level, self.score);
        }
        true
    }

    /// Drop every transient entity (the player stays)
    pub fn clear_entities(&mut self) {
        self.projectiles.clear();
        self.enemies.clear();
        self.enemy_projectiles.clear();
        self.meteors.clear();
        self.capsules.clear();
        self.bosses.clear();
    }

    /// Move on to the next level and resume play
    ///
    /// Returns false (and changes nothing) when already on the last level.
    pub fn next_level(&mut self) -> bool {
        if self.level >= self.config.levels {
            log::warn!("next_level called on final level {}", self.level);
            return false;
        }
        self.level += 1;
        self.frame = 0;
        self.clear_entities();
        self.boss_active = false;
        self.phase = GamePhase::Playing;
        self.emit(GameEvent::LevelStarted { level: self.level });
        log::info!("Level {} started", self.level);
        true
    }

    /// Toggle between playing and paused; other phases are left alone
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }

    /// Apply new play-field bounds and keep the player inside them
    pub fn resize(&mut self, field: Field) -> Result<(), ConfigError> {
        validate_field(field.width, field.height)?;
        self.field = field;
        self.player.body.clamp_x(field.width);
        Ok(())
    }

    /// Number of live entities, player included
    pub fn entity_count(&self) -> usize {
        1 + self.projectiles.len()
            + self.enemies.len()
            + self.enemy_projectiles.len()
            + self.meteors.len()
            + self.capsules.len()
            + self.bosses.len()
    }
}
