//! Checkers board: cell storage, move generation and move application.

use super::error::BoardError;
use super::position::Position;
use super::rules;
use super::types::{Color, Piece, allowed_directions, is_promotion_eligible};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

/// Rows each side fills in the starting layout.
const HOME_ROWS: usize = 3;

/// Smallest board that fits both sides' home rows.
pub const MIN_BOARD_SIZE: usize = 6;

/// Largest supported board.
pub const MAX_BOARD_SIZE: usize = 16;

/// Returns true for the board sizes the engine supports.
pub fn is_valid_size(size: usize) -> bool {
    size % 2 == 0 && (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size)
}

/// What a committed move did to the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// The piece now standing on the destination.
    pub piece: Piece,
    /// Squares whose pieces were removed, in capture order.
    pub captured: Vec<Position>,
    /// True if the move turned a man into a king.
    pub promoted: bool,
}

/// Square checkers board.
///
/// Cells are stored row-major. The board also carries the multi-jump rule,
/// since jump-chain continuation is part of move generation.
///
/// Deserialization goes through [`Board::from_pieces`], so a decoded board
/// always has `size * size` cells of a supported size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardFields")]
pub struct Board {
    size: usize,
    cells: Vec<Option<Piece>>,
    multi_jump: bool,
}

/// Unchecked wire form of [`Board`].
#[derive(Deserialize)]
struct BoardFields {
    size: usize,
    cells: Vec<Option<Piece>>,
    multi_jump: bool,
}

impl TryFrom<BoardFields> for Board {
    type Error = BoardError;

    fn try_from(fields: BoardFields) -> Result<Self, Self::Error> {
        let mut board = Self::from_pieces(fields.cells)?;
        if board.size != fields.size {
            return Err(BoardError::InvalidBoardSize(fields.size));
        }
        board.multi_jump = fields.multi_jump;
        Ok(board)
    }
}

impl Board {
    /// Standard board size.
    pub const DEFAULT_SIZE: usize = 8;

    /// Creates a standard 8×8 board in the starting layout.
    pub fn new() -> Self {
        let mut board = Self {
            size: Self::DEFAULT_SIZE,
            cells: vec![None; Self::DEFAULT_SIZE * Self::DEFAULT_SIZE],
            multi_jump: true,
        };
        board.initialize();
        board
    }

    /// Creates a board of the given size in the starting layout.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidBoardSize`] unless `size` is even and
    /// within [`MIN_BOARD_SIZE`]..=[`MAX_BOARD_SIZE`].
    #[instrument]
    pub fn with_size(size: usize) -> Result<Self, BoardError> {
        let mut board = Self::empty(size)?;
        board.initialize();
        Ok(board)
    }

    /// Creates a board of the given size with no pieces.
    #[instrument]
    pub fn empty(size: usize) -> Result<Self, BoardError> {
        if !is_valid_size(size) {
            warn!(size, "Rejected board size");
            return Err(BoardError::InvalidBoardSize(size));
        }
        Ok(Self {
            size,
            cells: vec![None; size * size],
            multi_jump: true,
        })
    }

    /// Restores a board from a flat row-major list of cells.
    ///
    /// The side length is the square root of the list length. Multi-jump is
    /// enabled; the session copies its own setting in afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidBoardSize`] if the length is not the
    /// square of a supported size.
    #[instrument(skip(pieces), fields(len = pieces.len()))]
    pub fn from_pieces(pieces: Vec<Option<Piece>>) -> Result<Self, BoardError> {
        let size = pieces.len().isqrt();
        if size * size != pieces.len() || !is_valid_size(size) {
            warn!(len = pieces.len(), "Piece list does not form a board");
            return Err(BoardError::InvalidBoardSize(size));
        }
        debug!(size, "Board restored from piece list");
        Ok(Self {
            size,
            cells: pieces,
            multi_jump: true,
        })
    }

    /// Resets every cell to the starting layout.
    ///
    /// White men fill the dark squares of rows `0..3`, Black men those of
    /// the last three rows.
    #[instrument(skip(self), fields(size = self.size))]
    pub fn initialize(&mut self) {
        let size = self.size;
        for (index, cell) in self.cells.iter_mut().enumerate() {
            let position = Position::from_index(index, size);
            *cell = if !position.is_dark() {
                None
            } else if position.row < HOME_ROWS {
                Some(Piece::man(Color::White))
            } else if position.row + HOME_ROWS >= size {
                Some(Piece::man(Color::Black))
            } else {
                None
            };
        }
        debug!("Board initialized");
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns whether capture chains may continue past the first jump.
    pub fn multi_jump(&self) -> bool {
        self.multi_jump
    }

    /// Enables or disables capture chain continuation.
    pub fn set_multi_jump(&mut self, enabled: bool) {
        self.multi_jump = enabled;
    }

    /// All cells in row-major order.
    pub fn pieces(&self) -> &[Option<Piece>] {
        &self.cells
    }

    /// Returns the piece at `position`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidPosition`] for off-board positions.
    pub fn piece(&self, position: Position) -> Result<Option<Piece>, BoardError> {
        self.check_position(position)?;
        Ok(self.cell(position))
    }

    /// Puts a piece on a square, or clears it with `None`.
    ///
    /// This is a setup tool: it bypasses move rules entirely.
    pub fn place(&mut self, position: Position, piece: Option<Piece>) -> Result<(), BoardError> {
        self.check_position(position)?;
        let index = position.to_index(self.size);
        self.cells[index] = piece;
        Ok(())
    }

    /// Number of pieces of the given color.
    pub fn count(&self, color: Color) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|piece| piece.color == color)
            .count()
    }

    /// Squares holding a piece of the given color, row-major.
    pub fn occupied_by(&self, color: Color) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_some_and(|piece| piece.color == color))
            .map(|(index, _)| Position::from_index(index, self.size))
            .collect()
    }

    /// Returns the squares the piece at `position` can move to.
    ///
    /// Includes simple diagonal steps and, when an opposing piece is
    /// diagonally adjacent in a direction the piece moves, every landing
    /// square of every capture chain from `position`. An empty square has no
    /// moves.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidPosition`] for off-board positions.
    #[instrument(skip(self))]
    pub fn possible_moves(&self, position: Position) -> Result<BTreeSet<Position>, BoardError> {
        self.check_position(position)?;

        let mut moves = BTreeSet::new();
        let Some(piece) = self.cell(position) else {
            return Ok(moves);
        };

        for &direction in allowed_directions(piece) {
            for side in [1, -1] {
                let Some(neighbor) = position.offset(direction, side) else {
                    continue;
                };
                if !neighbor.is_within(self.size) {
                    continue;
                }

                match self.cell(neighbor) {
                    None => {
                        moves.insert(neighbor);
                    }
                    Some(other) if other.color != piece.color => {
                        for path in rules::find_jump_paths(self, position, piece) {
                            moves.extend(path);
                        }
                    }
                    Some(_) => {}
                }
            }
        }

        debug!(move_count = moves.len(), "Possible moves computed");
        Ok(moves)
    }

    /// Moves the piece at `from` to `to`.
    ///
    /// A single diagonal step just relocates the piece. Any other legal
    /// destination is a capture: the longest capture chain ending on `to` is
    /// replayed, its jumped pieces are removed, and the piece is promoted if
    /// any landing along the chain is on its promotion row.
    ///
    /// # Errors
    ///
    /// - [`BoardError::InvalidPosition`] if either endpoint is off-board.
    /// - [`BoardError::IllegalMove`] if `to` is not a possible move of the
    ///   piece at `from`.
    ///
    /// On error the board is left untouched.
    #[instrument(skip(self))]
    pub fn move_piece(&mut self, from: Position, to: Position) -> Result<MoveOutcome, BoardError> {
        self.check_position(from)?;
        self.check_position(to)?;

        let illegal = BoardError::IllegalMove { from, to };
        let piece = self.cell(from).ok_or(illegal.clone())?;
        if !self.possible_moves(from)?.contains(&to) {
            debug!("Destination not among possible moves");
            return Err(illegal);
        }

        self.apply_move(from, to, piece)
    }

    /// Commits a move whose destination is already known to be among
    /// `possible_moves(from)`, and `piece` is the piece standing on `from`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::IllegalMove`] if a capture destination has no
    /// capture chain; the board is then untouched.
    pub(crate) fn apply_move(
        &mut self,
        from: Position,
        to: Position,
        piece: Piece,
    ) -> Result<MoveOutcome, BoardError> {
        let (captured, promote) = if from.is_adjacent_diagonal(to) {
            (Vec::new(), is_promotion_eligible(piece, to, self.size))
        } else {
            let path = rules::select_capture_path(self, from, to)
                .ok_or(BoardError::IllegalMove { from, to })?;
            let promote = path
                .iter()
                .skip(1)
                .any(|landing| is_promotion_eligible(piece, *landing, self.size));
            (rules::captured_squares(&path), promote)
        };

        for square in &captured {
            self.cells[square.to_index(self.size)] = None;
        }

        let piece = if promote { piece.promoted() } else { piece };
        self.cells[from.to_index(self.size)] = None;
        self.cells[to.to_index(self.size)] = Some(piece);

        info!(
            %from,
            %to,
            captures = captured.len(),
            promoted = promote,
            "Piece moved"
        );

        Ok(MoveOutcome {
            piece,
            captured,
            promoted: promote,
        })
    }

    /// Checks if one side has no pieces left.
    pub fn check_for_win(&self) -> bool {
        rules::check_for_win(self)
    }

    /// Formats the board as text, row 0 at the top.
    ///
    /// `b`/`w` are men, `B`/`W` kings, `.` empty dark squares and a blank
    /// marks light squares.
    pub fn display(&self) -> String {
        let mut result = String::from("   ");
        for column in 0..self.size {
            result.push_str(&format!("{:>2}", column));
        }
        result.push('\n');

        for row in 0..self.size {
            result.push_str(&format!("{:>2} ", row));
            for column in 0..self.size {
                let position = Position::new(row, column);
                let symbol = match self.cell(position) {
                    Some(piece) => piece.symbol(),
                    None if position.is_dark() => '.',
                    None => ' ',
                };
                result.push(' ');
                result.push(symbol);
            }
            result.push('\n');
        }
        result
    }

    /// Piece on a square; `None` for empty or off-board squares.
    pub(crate) fn cell(&self, position: Position) -> Option<Piece> {
        if position.is_within(self.size) {
            self.cells[position.to_index(self.size)]
        } else {
            None
        }
    }

    /// True if the square holds a piece of `color`.
    pub(crate) fn is_occupied_by(&self, position: Position, color: Color) -> bool {
        self.cell(position).is_some_and(|piece| piece.color == color)
    }

    fn check_position(&self, position: Position) -> Result<(), BoardError> {
        if position.is_within(self.size) {
            Ok(())
        } else {
            Err(BoardError::InvalidPosition(position))
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
