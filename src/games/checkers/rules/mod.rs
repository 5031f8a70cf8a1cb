//! Game rules for checkers.
//!
//! Pure functions over a [`Board`](super::Board): capture chains, elimination
//! and blocked positions. The board calls into them for move generation and
//! the session uses them to decide how a turn ends.

pub mod draw;
pub mod jumps;
pub mod win;

pub use draw::has_legal_move;
pub use jumps::{JumpPath, captured_squares, find_jump_paths, select_capture_path};
pub use win::{check_for_win, eliminated_color};
