//! Game session: turn order, lifecycle and notifications around a board.

use super::board::{Board, MoveOutcome};
use super::error::{BoardError, SessionError};
use super::events::{SessionEvent, Subscribers, SubscriptionId};
use super::position::Position;
use super::rules;
use super::snapshot::{SessionSnapshot, SessionState};
use super::types::{Color, Piece};
use crate::leaderboard::{NoLeaderboard, WinRecorder};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// One game of checkers between two players at the same board.
///
/// The session owns its board and is the only way to change it during
/// play. Every public operation validates fully before it mutates, so a
/// rejected call leaves board, turn and state exactly as they were.
pub struct GameSession {
    board: Board,
    current_player: Color,
    state: SessionState,
    multi_jumps: bool,
    subscribers: Subscribers,
    leaderboard: Box<dyn WinRecorder>,
}

impl GameSession {
    /// Creates a session on a standard board that keeps no leaderboard.
    pub fn new() -> Self {
        Self::with_leaderboard(Box::new(NoLeaderboard))
    }

    /// Creates a session on a standard board reporting wins to `leaderboard`.
    #[instrument(skip(leaderboard))]
    pub fn with_leaderboard(leaderboard: Box<dyn WinRecorder>) -> Self {
        info!("Creating new game session");
        Self {
            board: Board::new(),
            current_player: Color::Black,
            state: SessionState::NotStarted,
            multi_jumps: true,
            subscribers: Subscribers::new(),
            leaderboard,
        }
    }

    /// Creates a session on a board of the given size.
    ///
    /// # Errors
    ///
    /// Returns the board's size error for unsupported sizes.
    #[instrument(skip(leaderboard))]
    pub fn with_board_size(
        size: usize,
        leaderboard: Box<dyn WinRecorder>,
    ) -> Result<Self, SessionError> {
        let board = Board::with_size(size)?;
        let mut session = Self::with_leaderboard(leaderboard);
        session.board = board;
        Ok(session)
    }

    // ─────────────────────────────────────────────────────────────
    //  Read access
    // ─────────────────────────────────────────────────────────────

    /// The board as it stands.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Color to move.
    pub fn current_player(&self) -> Color {
        self.current_player
    }

    /// Lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether capture chains may continue past the first jump.
    pub fn multi_jumps(&self) -> bool {
        self.multi_jumps
    }

    /// Winner of a finished game.
    pub fn winner(&self) -> Option<Color> {
        self.state.winner()
    }

    /// Piece on a square.
    pub fn piece(&self, position: Position) -> Result<Option<Piece>, SessionError> {
        Ok(self.board.piece(position)?)
    }

    // ─────────────────────────────────────────────────────────────
    //  Subscriptions
    // ─────────────────────────────────────────────────────────────

    /// Registers an event handler; handlers run in subscription order.
    pub fn subscribe(
        &mut self,
        handler: impl FnMut(&SessionEvent) + Send + 'static,
    ) -> SubscriptionId {
        let id = self.subscribers.add(Box::new(handler));
        debug!(subscribers = self.subscribers.len(), "Handler subscribed");
        id
    }

    /// Removes a handler. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    // ─────────────────────────────────────────────────────────────
    //  Lifecycle
    // ─────────────────────────────────────────────────────────────

    /// Changes the multi-jump rule.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SettingsLocked`] once the game has started.
    #[instrument(skip(self), fields(state = %self.state))]
    pub fn set_multi_jumps(&mut self, enabled: bool) -> Result<(), SessionError> {
        if self.state != SessionState::NotStarted {
            warn!("Rule change rejected after start");
            return Err(SessionError::SettingsLocked);
        }
        self.multi_jumps = enabled;
        self.board.set_multi_jump(enabled);
        debug!(multi_jumps = enabled, "Multi-jump rule updated");
        Ok(())
    }

    /// Starts over with a fresh board, Black to move.
    ///
    /// The board keeps its size and the multi-jump rule carries over to the
    /// new game.
    #[instrument(skip(self), fields(size = self.board.size()))]
    pub fn restart(&mut self) {
        self.board.initialize();
        self.board.set_multi_jump(self.multi_jumps);
        self.current_player = Color::Black;
        self.state = SessionState::NotStarted;
        info!("Session restarted");
        self.subscribers.notify(SessionEvent::Restarted);
    }

    /// Moves a not-yet-started session into play.
    ///
    /// Both move queries and moves start the game; callers run this only
    /// after their own validation has passed.
    fn ensure_started(&mut self) {
        if self.state == SessionState::NotStarted {
            self.state = SessionState::Playing;
            self.board.set_multi_jump(self.multi_jumps);
            info!("Game started");
            self.subscribers.notify(SessionEvent::Started);
        }
    }

    fn ensure_not_over(&self) -> Result<(), SessionError> {
        if self.state.is_over() {
            debug!(state = %self.state, "Game already over");
            return Err(SessionError::GameOver);
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Play
    // ─────────────────────────────────────────────────────────────

    /// Legal destinations for the current player's piece at `position`.
    ///
    /// The first query of a game starts it.
    ///
    /// # Errors
    ///
    /// - [`SessionError::GameOver`] after the game ended.
    /// - [`SessionError::Board`] for off-board positions.
    /// - [`SessionError::TurnViolation`] if the square does not hold a piece
    ///   of the player to move.
    #[instrument(skip(self), fields(player = %self.current_player))]
    pub fn possible_moves(&mut self, position: Position) -> Result<BTreeSet<Position>, SessionError> {
        self.ensure_not_over()?;

        let found = self.board.piece(position)?.map(|piece| piece.color);
        if found != Some(self.current_player) {
            debug!(?found, "Move query for a piece not on move");
            return Err(SessionError::TurnViolation {
                expected: self.current_player,
                found,
            });
        }

        let moves = self.board.possible_moves(position)?;
        self.ensure_started();
        Ok(moves)
    }

    /// Moves the current player's piece from `from` to `to`.
    ///
    /// After the move the game ends if the opponent has no pieces left (the
    /// mover wins) or no legal move (a draw); otherwise the turn passes.
    ///
    /// # Errors
    ///
    /// - [`SessionError::GameOver`] after the game ended.
    /// - [`SessionError::NoPieceAtSource`] if `from` is empty.
    /// - [`SessionError::TurnViolation`] if the piece belongs to the opponent.
    /// - [`SessionError::Board`] for off-board squares or illegal
    ///   destinations.
    #[instrument(skip(self), fields(player = %self.current_player))]
    pub fn make_move(&mut self, from: Position, to: Position) -> Result<MoveOutcome, SessionError> {
        self.ensure_not_over()?;

        let piece = self
            .board
            .piece(from)?
            .ok_or(SessionError::NoPieceAtSource(from))?;

        if piece.color != self.current_player {
            warn!(piece_color = %piece.color, "Player tried to move out of turn");
            return Err(SessionError::TurnViolation {
                expected: self.current_player,
                found: Some(piece.color),
            });
        }

        // Destination is checked here so a rejected move never starts the game
        self.board.piece(to)?;
        if !self.board.possible_moves(from)?.contains(&to) {
            debug!("Destination rejected");
            return Err(BoardError::IllegalMove { from, to }.into());
        }

        self.ensure_started();
        let outcome = self.board.apply_move(from, to, piece)?;
        self.subscribers.notify(SessionEvent::MoveMade { from, to });

        if let Some(loser) = rules::eliminated_color(&self.board) {
            debug!(%loser, "Last piece captured");
            self.finish(Some(loser.opponent()));
        } else if !rules::has_legal_move(&self.board, self.current_player.opponent()) {
            info!(blocked = %self.current_player.opponent(), "No legal moves left");
            self.finish(None);
        } else {
            self.current_player = self.current_player.opponent();
            debug!(next = %self.current_player, "Turn passed");
            self.subscribers
                .notify(SessionEvent::PlayerChanged(self.current_player));
        }

        Ok(outcome)
    }

    fn finish(&mut self, winner: Option<Color>) {
        self.state = match winner {
            Some(color) => SessionState::won_by(color),
            None => SessionState::Drawn,
        };
        info!(state = %self.state, "Game over");

        if let Some(color) = winner
            && let Err(e) = self.leaderboard.record_win(color)
        {
            warn!(error = %e, "Failed to record win");
        }

        self.subscribers.notify(SessionEvent::GameOver { winner });
    }

    // ─────────────────────────────────────────────────────────────
    //  Persistence
    // ─────────────────────────────────────────────────────────────

    /// Captures the full session state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(
            &self.board,
            self.current_player,
            self.state,
            self.multi_jumps,
        )
    }

    /// Replaces the session state with a snapshot.
    ///
    /// Subscribers see `Restarted`, `PlayerChanged` and `Started`, in that
    /// order, so they can redraw from scratch.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidSaveFormat`] if the snapshot does not
    /// describe a valid board; the session is then left as it was.
    #[instrument(skip(self, snapshot))]
    pub fn restore(&mut self, snapshot: &SessionSnapshot) -> Result<(), SessionError> {
        let board = snapshot.to_board()?;

        self.board = board;
        self.current_player = *snapshot.current_player();
        self.state = *snapshot.state();
        self.multi_jumps = *snapshot.multi_jumps();
        info!(
            state = %self.state,
            player = %self.current_player,
            "Session restored"
        );

        self.subscribers.notify(SessionEvent::Restarted);
        self.subscribers
            .notify(SessionEvent::PlayerChanged(self.current_player));
        self.subscribers.notify(SessionEvent::Started);
        Ok(())
    }

    /// Saves the session as JSON.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        self.snapshot().save(path)
    }

    /// Loads a session saved with [`GameSession::save_to_path`].
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let snapshot = SessionSnapshot::load(path)?;
        self.restore(&snapshot)
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("current_player", &self.current_player)
            .field("state", &self.state)
            .field("multi_jumps", &self.multi_jumps)
            .field("subscribers", &self.subscribers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorded(session: &mut GameSession) -> Arc<Mutex<Vec<SessionEvent>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        session.subscribe(move |event| sink.lock().unwrap().push(*event));
        log
    }

    #[test]
    fn test_new_session_is_not_started() {
        let session = GameSession::new();
        assert_eq!(session.state(), SessionState::NotStarted);
        assert_eq!(session.current_player(), Color::Black);
        assert!(session.multi_jumps());
    }

    #[test]
    fn test_query_starts_game() {
        let mut session = GameSession::new();
        let log = recorded(&mut session);
        let moves = session.possible_moves(Position::new(5, 0)).unwrap();
        assert_eq!(moves.len(), 1);
        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(*log.lock().unwrap(), vec![SessionEvent::Started]);
    }

    #[test]
    fn test_rejected_query_does_not_start_game() {
        let mut session = GameSession::new();
        let err = session.possible_moves(Position::new(2, 1)).unwrap_err();
        assert_eq!(
            err,
            SessionError::TurnViolation {
                expected: Color::Black,
                found: Some(Color::White)
            }
        );
        assert_eq!(session.state(), SessionState::NotStarted);
    }

    #[test]
    fn test_multi_jumps_locked_after_start() {
        let mut session = GameSession::new();
        session.set_multi_jumps(false).unwrap();
        assert!(!session.board().multi_jump());

        session
            .make_move(Position::new(5, 0), Position::new(4, 1))
            .unwrap();
        assert_eq!(session.set_multi_jumps(true), Err(SessionError::SettingsLocked));
        assert!(!session.multi_jumps());
    }

    #[test]
    fn test_restart_keeps_rule_and_resets_board() {
        let mut session = GameSession::new();
        session.set_multi_jumps(false).unwrap();
        session
            .make_move(Position::new(5, 0), Position::new(4, 1))
            .unwrap();
        let log = recorded(&mut session);

        session.restart();
        assert_eq!(session.state(), SessionState::NotStarted);
        assert_eq!(session.current_player(), Color::Black);
        assert_eq!(session.board(), &{
            let mut board = Board::new();
            board.set_multi_jump(false);
            board
        });
        assert_eq!(*log.lock().unwrap(), vec![SessionEvent::Restarted]);
    }

    #[test]
    fn test_restart_keeps_loaded_board_size() {
        let mut small = Board::with_size(6).unwrap();
        small.place(Position::new(3, 0), None).unwrap();
        let snapshot = SessionSnapshot::new(&small, Color::White, SessionState::Playing, true);

        let mut session = GameSession::new();
        session.restore(&snapshot).unwrap();
        session.restart();

        assert_eq!(session.board(), &Board::with_size(6).unwrap());
        assert_eq!(session.current_player(), Color::Black);
    }
}
