//! Win counters kept across games.
//!
//! The session reports each decided game through [`WinRecorder`]. The file
//! backend re-reads and rewrites its JSON file on every win so several
//! processes sharing a file see each other's results.

use crate::games::checkers::Color;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Receives the winner of every decided game.
pub trait WinRecorder: Send {
    /// Records one win for `winner`.
    fn record_win(&mut self, winner: Color) -> Result<(), LeaderboardError>;
}

/// Per-color win totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct WinCounts {
    /// Games won by Black.
    #[serde(default)]
    black_wins: u32,
    /// Games won by White.
    #[serde(default)]
    white_wins: u32,
}

impl WinCounts {
    /// Wins recorded for one color.
    pub fn wins(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black_wins,
            Color::White => self.white_wins,
        }
    }

    /// Adds one win for `color`. Counters stop at `u32::MAX`.
    pub fn increment(&mut self, color: Color) {
        let wins = match color {
            Color::Black => &mut self.black_wins,
            Color::White => &mut self.white_wins,
        };
        *wins = wins.saturating_add(1);
    }

    /// Total decided games, capped at `u32::MAX`.
    pub fn total(&self) -> u32 {
        self.black_wins.saturating_add(self.white_wins)
    }
}

/// Leaderboard stored as a JSON file.
#[derive(Debug, Clone)]
pub struct FileLeaderboard {
    path: PathBuf,
}

impl FileLeaderboard {
    /// Uses the file at `path`; it is created on the first recorded win.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current totals. A missing file counts as no wins yet.
    ///
    /// # Errors
    ///
    /// Returns [`LeaderboardError`] if the file exists but cannot be read or
    /// parsed.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<WinCounts, LeaderboardError> {
        if !self.path.exists() {
            debug!("Leaderboard file not found, starting from zero");
            return Ok(WinCounts::default());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            LeaderboardError::new(format!("Failed to read leaderboard: {}", e))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| LeaderboardError::new(format!("Failed to parse leaderboard: {}", e)))
    }

    fn store(&self, counts: &WinCounts) -> Result<(), LeaderboardError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                LeaderboardError::new(format!("Failed to create leaderboard directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(counts).map_err(|e| {
            LeaderboardError::new(format!("Failed to serialize leaderboard: {}", e))
        })?;

        std::fs::write(&self.path, json)
            .map_err(|e| LeaderboardError::new(format!("Failed to write leaderboard: {}", e)))
    }
}

impl WinRecorder for FileLeaderboard {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn record_win(&mut self, winner: Color) -> Result<(), LeaderboardError> {
        let mut counts = self.load()?;
        counts.increment(winner);
        self.store(&counts)?;
        info!(%winner, wins = counts.wins(winner), "Win recorded");
        Ok(())
    }
}

/// Leaderboard held in memory, lost when dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryLeaderboard {
    counts: WinCounts,
}

impl MemoryLeaderboard {
    /// Creates an empty leaderboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current totals.
    pub fn counts(&self) -> WinCounts {
        self.counts
    }
}

impl WinRecorder for MemoryLeaderboard {
    fn record_win(&mut self, winner: Color) -> Result<(), LeaderboardError> {
        self.counts.increment(winner);
        Ok(())
    }
}

/// Discards every result.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLeaderboard;

impl WinRecorder for NoLeaderboard {
    fn record_win(&mut self, _winner: Color) -> Result<(), LeaderboardError> {
        Ok(())
    }
}

/// Leaderboard error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Leaderboard error: {} at {}:{}", message, file, line)]
pub struct LeaderboardError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LeaderboardError {
    /// Creates a new leaderboard error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_leaderboard_counts_per_color() {
        let mut board = MemoryLeaderboard::new();
        board.record_win(Color::Black).unwrap();
        board.record_win(Color::Black).unwrap();
        board.record_win(Color::White).unwrap();
        assert_eq!(board.counts().wins(Color::Black), 2);
        assert_eq!(board.counts().wins(Color::White), 1);
        assert_eq!(board.counts().total(), 3);
    }

    #[test]
    fn test_saturated_file_keeps_recording() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wins.json");
        std::fs::write(&path, r#"{"black_wins":4294967295,"white_wins":1}"#).unwrap();

        let mut leaderboard = FileLeaderboard::new(&path);
        assert_eq!(leaderboard.load().unwrap().total(), u32::MAX);

        leaderboard.record_win(Color::Black).unwrap();
        leaderboard.record_win(Color::White).unwrap();

        let counts = leaderboard.load().unwrap();
        assert_eq!(counts.wins(Color::Black), u32::MAX);
        assert_eq!(counts.wins(Color::White), 2);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let counts: WinCounts = serde_json::from_str(r#"{"white_wins": 4}"#).unwrap();
        assert_eq!(*counts.black_wins(), 0);
        assert_eq!(*counts.white_wins(), 4);
    }
}
