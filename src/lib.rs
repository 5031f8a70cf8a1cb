//! Strictly Checkers library - a checkers rules engine
//!
//! The engine owns board state, generates legal moves including multi-jump
//! capture chains, resolves captures and promotions, and runs a game session
//! that enforces turn order and reports what happens to subscribers.
//!
//! # Architecture
//!
//! - **Board**: cell storage, move generation and move application
//! - **Rules**: jump-chain search, win and blocked-position checks
//! - **Session**: turn order, lifecycle, events, save/load
//! - **Leaderboard**: win counters kept across games
//!
//! # Example
//!
//! ```
//! use strictly_checkers::{Color, GameSession, Position};
//!
//! let mut session = GameSession::new();
//! let moves = session.possible_moves(Position::new(5, 2))?;
//! assert!(moves.contains(&Position::new(4, 3)));
//!
//! session.make_move(Position::new(5, 2), Position::new(4, 3))?;
//! assert_eq!(session.current_player(), Color::White);
//! # Ok::<(), strictly_checkers::SessionError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod games;
mod leaderboard;
pub mod terminal;

// Crate-level exports - Configuration
pub use config::{CheckersConfig, ConfigError};

// Crate-level exports - Leaderboard
pub use leaderboard::{
    FileLeaderboard, LeaderboardError, MemoryLeaderboard, NoLeaderboard, WinCounts, WinRecorder,
};

// Crate-level exports - Game types (checkers)
pub use games::checkers::{
    Board, BoardError, Color, EventHandler, GameSession, MAX_BOARD_SIZE, MIN_BOARD_SIZE,
    MoveOutcome, Piece, PieceKind, Position, SessionError, SessionEvent, SessionSnapshot,
    SessionState, SubscriptionId, Subscribers, allowed_directions, is_promotion_eligible,
    is_valid_size,
};

// Crate-level exports - Rules
pub use games::checkers::rules;
