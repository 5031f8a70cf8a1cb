//! Persistable session snapshots.
//!
//! A snapshot is a flat record of everything a session needs to resume:
//! board cells in row-major order, the player to move, the lifecycle state
//! and the multi-jump rule. It is stored as pretty-printed JSON.

use super::board::{Board, is_valid_size};
use super::error::SessionError;
use super::types::{Color, Piece};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Lifecycle of a game session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum SessionState {
    /// No move or move query has happened yet.
    NotStarted,
    /// The game is underway.
    Playing,
    /// Black captured every white piece.
    BlackWon,
    /// White captured every black piece.
    WhiteWon,
    /// The player to move had no legal move.
    Drawn,
}

impl SessionState {
    /// Terminal state for a win by `color`.
    pub fn won_by(color: Color) -> Self {
        match color {
            Color::Black => SessionState::BlackWon,
            Color::White => SessionState::WhiteWon,
        }
    }

    /// Returns true once the game has ended.
    pub fn is_over(self) -> bool {
        matches!(
            self,
            SessionState::BlackWon | SessionState::WhiteWon | SessionState::Drawn
        )
    }

    /// Winner of a finished game, if it was not drawn.
    pub fn winner(self) -> Option<Color> {
        match self {
            SessionState::BlackWon => Some(Color::Black),
            SessionState::WhiteWon => Some(Color::White),
            _ => None,
        }
    }
}

/// Serializable record of a session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Squares per side.
    board_size: usize,
    /// Row-major cells, `null` for empty squares.
    pieces: Vec<Option<Piece>>,
    /// Player to move.
    current_player: Color,
    /// Lifecycle state.
    state: SessionState,
    /// Whether capture chains may continue past the first jump.
    multi_jumps: bool,
}

impl SessionSnapshot {
    /// Captures the given session fields.
    pub fn new(board: &Board, current_player: Color, state: SessionState, multi_jumps: bool) -> Self {
        Self {
            board_size: board.size(),
            pieces: board.pieces().to_vec(),
            current_player,
            state,
            multi_jumps,
        }
    }

    /// Rebuilds the board this snapshot describes.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidSaveFormat`] if the piece list is not
    /// the square of a supported size or disagrees with `board_size`.
    #[instrument(skip(self), fields(board_size = self.board_size, len = self.pieces.len()))]
    pub fn to_board(&self) -> Result<Board, SessionError> {
        if !is_valid_size(self.board_size) {
            warn!("Snapshot has unsupported board size");
            return Err(SessionError::InvalidSaveFormat(format!(
                "unsupported board size {}",
                self.board_size
            )));
        }

        let mut board = Board::from_pieces(self.pieces.clone())
            .map_err(|e| SessionError::InvalidSaveFormat(e.to_string()))?;

        if board.size() != self.board_size {
            warn!(actual = board.size(), "Snapshot size mismatch");
            return Err(SessionError::InvalidSaveFormat(format!(
                "board size {} does not match {} pieces",
                self.board_size,
                self.pieces.len()
            )));
        }

        board.set_multi_jump(self.multi_jumps);
        Ok(board)
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> Result<String, SessionError> {
        serde_json::to_string_pretty(self).map_err(|e| SessionError::Persistence(e.to_string()))
    }

    /// Parses a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidSaveFormat`] for malformed JSON or a
    /// piece list that does not form a board.
    #[instrument(skip(json), fields(len = json.len()))]
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let snapshot: Self = serde_json::from_str(json).map_err(|e| {
            warn!(error = %e, "Failed to parse snapshot");
            SessionError::InvalidSaveFormat(e.to_string())
        })?;
        snapshot.to_board()?;
        debug!(board_size = snapshot.board_size, "Snapshot parsed");
        Ok(snapshot)
    }

    /// Writes the snapshot to a file.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json).map_err(|e| {
            SessionError::Persistence(format!(
                "Failed to write {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        info!("Session saved");
        Ok(())
    }

    /// Reads a snapshot from a file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            SessionError::Persistence(format!(
                "Failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::checkers::Position;

    #[test]
    fn test_snapshot_json_round_trip() {
        let mut board = Board::new();
        board
            .place(Position::new(4, 1), Some(Piece::king(Color::White)))
            .unwrap();
        let snapshot = SessionSnapshot::new(&board, Color::White, SessionState::Playing, false);

        let parsed = SessionSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(parsed, snapshot);

        let restored = parsed.to_board().unwrap();
        assert_eq!(restored.pieces(), board.pieces());
        assert!(!restored.multi_jump());
    }

    #[test]
    fn test_non_square_piece_list_is_rejected() {
        let json = serde_json::json!({
            "board_size": 8,
            "pieces": vec![serde_json::Value::Null; 60],
            "current_player": "Black",
            "state": "Playing",
            "multi_jumps": true,
        })
        .to_string();
        let err = SessionSnapshot::from_json(&json).unwrap_err();
        assert!(matches!(err, SessionError::InvalidSaveFormat(_)));
    }

    #[test]
    fn test_size_mismatch_is_rejected() {
        let json = serde_json::json!({
            "board_size": 10,
            "pieces": vec![serde_json::Value::Null; 64],
            "current_player": "White",
            "state": "NotStarted",
            "multi_jumps": true,
        })
        .to_string();
        assert!(matches!(
            SessionSnapshot::from_json(&json),
            Err(SessionError::InvalidSaveFormat(_))
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            SessionSnapshot::from_json("not json"),
            Err(SessionError::InvalidSaveFormat(_))
        ));
    }

    #[test]
    fn test_state_helpers() {
        assert_eq!(SessionState::won_by(Color::White), SessionState::WhiteWon);
        assert_eq!(SessionState::BlackWon.winner(), Some(Color::Black));
        assert!(SessionState::Drawn.is_over());
        assert_eq!(SessionState::Drawn.winner(), None);
        assert!(!SessionState::Playing.is_over());
    }
}
