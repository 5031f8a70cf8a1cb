//! Checkers: board engine, rules and game session.

mod board;
mod error;
mod events;
mod position;
pub mod rules;
mod session;
mod snapshot;
mod types;

pub use board::{Board, MAX_BOARD_SIZE, MIN_BOARD_SIZE, MoveOutcome, is_valid_size};
pub use error::{BoardError, SessionError};
pub use events::{EventHandler, SessionEvent, SubscriptionId, Subscribers};
pub use position::Position;
pub use session::GameSession;
pub use snapshot::{SessionSnapshot, SessionState};
pub use types::{Color, Piece, PieceKind, allowed_directions, is_promotion_eligible};
