//! Game configuration.
//!
//! Defaults reproduce the classic game: an 8×8 board, 140 reserve points per
//! player, 4 stat points per power, White moving first and no cap on
//! placements per turn. Configs can be loaded from JSON; missing fields take
//! their default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{BOARD_SIZE, BUDGET_PER_POWER, Color};

/// Default starting reserve for each player.
pub const STARTING_RESERVE: i64 = 140;

/// Largest supported board side.
pub const MAX_BOARD_SIZE: u16 = 256;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Board too small or too large.
    #[error("board size {0} out of range (2..=256)")]
    BoardSize(u16),
    /// Reserve must start positive or the game would end before it begins.
    #[error("starting reserve must be positive, got {0}")]
    StartingReserve(i64),
    /// Each power point must buy at least one stat point.
    #[error("budget per power must be positive, got {0}")]
    BudgetPerPower(i32),
    /// A placement cap of zero would forbid placing entirely.
    #[error("placement cap must be at least 1")]
    PlacementCap,
    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The config file is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Board side length.
    pub board_size: u16,
    /// Reserve each player starts with.
    pub starting_reserve: i64,
    /// Stat points granted per point of power.
    pub budget_per_power: i32,
    /// Color that takes the first turn.
    pub first_player: Color,
    /// Maximum placements per turn (`None` = until the player skips).
    pub max_placements_per_turn: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            starting_reserve: STARTING_RESERVE,
            budget_per_power: BUDGET_PER_POWER,
            first_player: Color::White,
            max_placements_per_turn: None,
        }
    }
}

impl GameConfig {
    /// Check that the values describe a playable game.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(ConfigError::BoardSize(self.board_size));
        }
        if self.starting_reserve <= 0 {
            return Err(ConfigError::StartingReserve(self.starting_reserve));
        }
        if self.budget_per_power <= 0 {
            return Err(ConfigError::BudgetPerPower(self.budget_per_power));
        }
        if self.max_placements_per_turn == Some(0) {
            return Err(ConfigError::PlacementCap);
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values are invalid.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
