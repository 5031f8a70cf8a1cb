//! Settings for the terminal front end.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::games::checkers::{Board, is_valid_size};

/// Front-end configuration, usually read from `checkers.toml`.
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct CheckersConfig {
    /// Squares per side of new boards.
    #[serde(default = "default_board_size")]
    board_size: usize,

    /// Whether capture chains may continue past the first jump.
    #[serde(default = "default_multi_jumps")]
    multi_jumps: bool,

    /// JSON file holding the win counters.
    #[serde(default = "default_leaderboard_path")]
    leaderboard_path: PathBuf,
}

fn default_board_size() -> usize {
    Board::DEFAULT_SIZE
}

fn default_multi_jumps() -> bool {
    true
}

fn default_leaderboard_path() -> PathBuf {
    PathBuf::from("leaderboard.json")
}

impl Default for CheckersConfig {
    fn default() -> Self {
        Self {
            board_size: default_board_size(),
            multi_jumps: default_multi_jumps(),
            leaderboard_path: default_leaderboard_path(),
        }
    }
}

impl CheckersConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or names
    /// an unsupported board size.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(board_size = config.board_size, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        if !is_valid_size(config.board_size) {
            return Err(ConfigError::new(format!(
                "Unsupported board size {}",
                config.board_size
            )));
        }
        Ok(config)
    }

    /// Loads `path` if it exists, falling back to defaults otherwise.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Returns a copy with the multi-jump rule overridden.
    pub fn with_multi_jumps(mut self, enabled: bool) -> Self {
        self.multi_jumps = enabled;
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
