//! Tuning constants for a wave, loadable from a TOML file.
//!
//! Every field has a default matching the classic 800×700 layout, so a
//! config file only needs to name the values it wants to change.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Playfield ────────────────────────────────────────────────────────────
    pub game_width: f64,
    pub game_height: f64,
    /// Aliens whose bottom edge drops below this y-coordinate end the wave.
    pub defense_line: f64,

    // ── Ship ─────────────────────────────────────────────────────────────────
    pub ship_width: f64,
    pub ship_height: f64,
    /// Centre y of the ship.
    pub ship_bottom: f64,
    /// Pixels moved per frame while a direction key is held.
    pub ship_movement: f64,
    pub ship_lives: u32,

    // ── Aliens ───────────────────────────────────────────────────────────────
    pub alien_width: f64,
    pub alien_height: f64,
    pub alien_h_sep: f64,
    pub alien_v_sep: f64,
    pub alien_h_walk: f64,
    pub alien_v_walk: f64,
    /// Gap between the top of the playfield and the first row.
    pub alien_ceiling: f64,
    pub alien_rows: usize,
    pub aliens_in_row: usize,
    /// Seconds between march steps.
    pub alien_speed: f64,

    // ── Bolts ────────────────────────────────────────────────────────────────
    pub bolt_width: f64,
    pub bolt_height: f64,
    /// Pixels moved per frame.
    pub bolt_speed: f64,
    /// Aliens fire after a random 0..bolt_rate march steps.
    pub bolt_rate: u32,

    /// Seconds a death animation plays for.
    pub death_speed: f64,

    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            game_width: 800.0,
            game_height: 700.0,
            defense_line: 100.0,
            ship_width: 44.0,
            ship_height: 44.0,
            ship_bottom: 32.0,
            ship_movement: 5.0,
            ship_lives: 3,
            alien_width: 33.0,
            alien_height: 33.0,
            alien_h_sep: 16.0,
            alien_v_sep: 16.0,
            alien_h_walk: 8.0,
            alien_v_walk: 16.0,
            alien_ceiling: 100.0,
            alien_rows: 5,
            aliens_in_row: 12,
            alien_speed: 1.0,
            bolt_width: 4.0,
            bolt_height: 16.0,
            bolt_speed: 10.0,
            bolt_rate: 5,
            death_speed: 0.3,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alien_rows == 0 || self.aliens_in_row == 0 {
            return Err(ConfigError::Invalid(
                "the alien grid needs at least one row and one column".to_string(),
            ));
        }
        if self.bolt_rate == 0 {
            return Err(ConfigError::Invalid("bolt_rate must be at least 1".to_string()));
        }

        let positive = [
            ("game_width", self.game_width),
            ("game_height", self.game_height),
            ("ship_width", self.ship_width),
            ("ship_height", self.ship_height),
            ("ship_movement", self.ship_movement),
            ("alien_width", self.alien_width),
            ("alien_height", self.alien_height),
            ("alien_speed", self.alien_speed),
            ("bolt_width", self.bolt_width),
            ("bolt_height", self.bolt_height),
            ("bolt_speed", self.bolt_speed),
            ("death_speed", self.death_speed),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, v)| !(*v > 0.0)) {
            return Err(ConfigError::Invalid(format!(
                "{} must be positive, got {}",
                name, value
            )));
        }

        if self.defense_line < 0.0 || self.defense_line > self.game_height {
            return Err(ConfigError::Invalid(format!(
                "defense_line {} lies outside the playfield",
                self.defense_line
            )));
        }
        Ok(())
    }
}
