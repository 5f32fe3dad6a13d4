//! Game configuration and key bindings
//!
//! Balance values are data-driven so hosts can load them from JSON. A config
//! must pass [`GameConfig::validate`] before a game is built from it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Host-level actions a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Fire,
    Pause,
}

/// Key names (as reported by `KeyboardEvent.key`) bound to each action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub fire: Vec<String>,
    pub pause: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: vec!["ArrowLeft".into(), "a".into()],
            right: vec!["ArrowRight".into(), "d".into()],
            fire: vec![" ".into()],
            pause: vec!["Escape".into(), "p".into()],
        }
    }
}

impl KeyBindings {
    /// Look up the action bound to a key, if any
    pub fn action_for(&self, key: &str) -> Option<Action> {
        let bound = |keys: &[String]| keys.iter().any(|k| k == key);
        if bound(&self.left) {
            Some(Action::Left)
        } else if bound(&self.right) {
            Some(Action::Right)
        } else if bound(&self.fire) {
            Some(Action::Fire)
        } else if bound(&self.pause) {
            Some(Action::Pause)
        } else {
            None
        }
    }
}

/// Game balance and play-field configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Initial play-field width in pixels
    pub width: f32,
    /// Initial play-field height in pixels
    pub height: f32,

    // === Speeds (pixels per frame) ===
    pub player_speed: f32,
    pub bullet_speed: f32,
    pub enemy_speed: f32,
    pub meteor_speed: f32,
    pub energy_speed: f32,

    // === Progression ===
    /// Base number of frames between enemy/meteor spawns (divided by the level multiplier)
    pub spawn_rate: u32,
    /// Score needed per level before the boss appears
    pub boss_spawn_score: u32,
    /// Number of levels
    pub levels: u8,
    /// Per-level difficulty multipliers (one per level)
    pub level_multipliers: Vec<f32>,

    // === Player ===
    pub max_lives: u8,
    /// Frames between player shots
    pub player_cooldown: u32,
    /// Chance that a destroyed enemy drops an energy capsule
    pub capsule_drop_chance: f64,

    // === Presentation ===
    /// Draw the flickering background stars
    pub starfield: bool,
    pub keys: KeyBindings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,

            player_speed: 8.0,
            bullet_speed: 10.0,
            enemy_speed: 3.0,
            meteor_speed: 4.0,
            energy_speed: 3.0,

            spawn_rate: 60,
            boss_spawn_score: 150,
            levels: 4,
            level_multipliers: vec![1.0, 1.3, 1.7, 2.2],

            max_lives: 4,
            player_cooldown: 10,
            capsule_drop_chance: 0.2,

            starfield: true,
            keys: KeyBindings::default(),
        }
    }
}

/// Reasons a configuration cannot start a game
#[derive(Debug)]
pub enum ConfigError {
    /// Play field has a zero or negative dimension
    EmptyField { width: f32, height: f32 },
    /// No levels configured
    NoLevels,
    /// Multiplier table length doesn't match the level count
    MultiplierCount { levels: u8, multipliers: usize },
    /// A multiplier is zero, negative or not finite
    BadMultiplier { level: usize, value: f32 },
    /// A speed is zero, negative or not finite
    BadSpeed { name: &'static str, value: f32 },
    /// Spawn rate of zero frames
    ZeroSpawnRate,
    /// Player starts with no lives
    NoLives,
    /// Drop chance outside [0, 1]
    BadChance(f64),
    /// JSON could not be parsed
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyField { width, height } => {
                write!(f, "play field must be non-empty, got {width}x{height}")
            }
            ConfigError::NoLevels => write!(f, "at least one level is required"),
            ConfigError::MultiplierCount {
                levels,
                multipliers,
            } => write!(
                f,
                "expected {levels} level multipliers, got {multipliers}"
            ),
            ConfigError::BadMultiplier { level, value } => {
                write!(f, "level {level} multiplier must be positive, got {value}")
            }
            ConfigError::BadSpeed { name, value } => {
                write!(f, "{name} must be positive, got {value}")
            }
            ConfigError::ZeroSpawnRate => write!(f, "spawn_rate must be at least 1 frame"),
            ConfigError::NoLives => write!(f, "max_lives must be at least 1"),
            ConfigError::BadChance(p) => {
                write!(f, "capsule_drop_chance must be within [0, 1], got {p}")
            }
            ConfigError::Parse(e) => write!(f, "invalid config JSON: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Check a play-field size
pub fn validate_field(width: f32, height: f32) -> Result<(), ConfigError> {
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
        return Err(ConfigError::EmptyField { width, height });
    }
    Ok(())
}

impl GameConfig {
    /// Parse a config from JSON (missing fields take defaults) and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> String {
        // A plain struct of numbers, strings and vectors always serializes
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_field(self.width, self.height)?;

        if self.levels == 0 {
            return Err(ConfigError::NoLevels);
        }
        if self.level_multipliers.len() != self.levels as usize {
            return Err(ConfigError::MultiplierCount {
                levels: self.levels,
                multipliers: self.level_multipliers.len(),
            });
        }
        for (i, &m) in self.level_multipliers.iter().enumerate() {
            if !(m > 0.0 && m.is_finite()) {
                return Err(ConfigError::BadMultiplier {
                    level: i + 1,
                    value: m,
                });
            }
        }

        let speeds = [
            ("player_speed", self.player_speed),
            ("bullet_speed", self.bullet_speed),
            ("enemy_speed", self.enemy_speed),
            ("meteor_speed", self.meteor_speed),
            ("energy_speed", self.energy_speed),
        ];
        for (name, value) in speeds {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::BadSpeed { name, value });
            }
        }

        if self.spawn_rate == 0 {
            return Err(ConfigError::ZeroSpawnRate);
        }
        if self.max_lives == 0 {
            return Err(ConfigError::NoLives);
        }
        if !(0.0..=1.0).contains(&self.capsule_drop_chance) {
            return Err(ConfigError::BadChance(self.capsule_drop_chance));
        }
        Ok(())
    }

    /// Difficulty multiplier for a 1-based level (clamped to the table)
    pub fn multiplier(&self, level: u8) -> f32 {
        let idx = (level.max(1) as usize - 1).min(self.level_multipliers.len().saturating_sub(1));
        self.level_multipliers.get(idx).copied().unwrap_or(1.0)
    }

    /// Frames between periodic spawns at a level (never less than 1)
    pub fn spawn_interval(&self, level: u8) -> u64 {
        let interval = (self.spawn_rate as f32 / self.multiplier(level)).floor() as u64;
        interval.max(1)
    }

    /// Score at which the boss for a level appears
    pub fn boss_threshold(&self, level: u8) -> u32 {
        self.boss_spawn_score.saturating_mul(level as u32)
    }
}
