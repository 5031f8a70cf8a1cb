//! Tests for game sessions: turn order, lifecycle, events and leaderboard.

use std::sync::{Arc, Mutex};

use strictly_checkers::{
    Board, BoardError, Color, FileLeaderboard, GameSession, LeaderboardError, MemoryLeaderboard,
    Piece, Position, SessionError, SessionEvent, SessionSnapshot, SessionState, WinRecorder,
};

fn pos(row: usize, column: usize) -> Position {
    Position::new(row, column)
}

fn record_events(session: &mut GameSession) -> Arc<Mutex<Vec<SessionEvent>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    session.subscribe(move |event| sink.lock().unwrap().push(*event));
    log
}

/// Puts the session into play on a board holding only `pieces`.
fn resume_with(session: &mut GameSession, pieces: &[(usize, usize, Piece)], player: Color) {
    let mut board = Board::empty(8).unwrap();
    for &(row, column, piece) in pieces {
        board.place(pos(row, column), Some(piece)).unwrap();
    }
    let snapshot = SessionSnapshot::new(&board, player, SessionState::Playing, true);
    session.restore(&snapshot).unwrap();
}

/// Black man at (5,0) can take White's last piece at (4,1).
fn one_capture_from_win() -> [(usize, usize, Piece); 2] {
    [
        (5, 0, Piece::man(Color::Black)),
        (4, 1, Piece::man(Color::White)),
    ]
}

#[test]
fn test_opening_exchange_alternates_turns() {
    let mut session = GameSession::new();
    let events = record_events(&mut session);

    let moves = session.possible_moves(pos(5, 0)).unwrap();
    assert_eq!(moves.into_iter().collect::<Vec<_>>(), vec![pos(4, 1)]);

    session.make_move(pos(5, 0), pos(4, 1)).unwrap();
    assert_eq!(session.current_player(), Color::White);
    assert_eq!(session.state(), SessionState::Playing);

    let err = session.make_move(pos(4, 1), pos(3, 2)).unwrap_err();
    assert_eq!(
        err,
        SessionError::TurnViolation {
            expected: Color::White,
            found: Some(Color::Black)
        }
    );

    session.make_move(pos(2, 1), pos(3, 2)).unwrap();
    assert_eq!(session.current_player(), Color::Black);

    assert_eq!(
        *events.lock().unwrap(),
        vec![
            SessionEvent::Started,
            SessionEvent::MoveMade {
                from: pos(5, 0),
                to: pos(4, 1)
            },
            SessionEvent::PlayerChanged(Color::White),
            SessionEvent::MoveMade {
                from: pos(2, 1),
                to: pos(3, 2)
            },
            SessionEvent::PlayerChanged(Color::Black),
        ]
    );
}

#[test]
fn test_rejected_moves_change_nothing() {
    let mut session = GameSession::new();
    let events = record_events(&mut session);
    let before = session.snapshot();

    assert_eq!(
        session.make_move(pos(4, 1), pos(3, 2)),
        Err(SessionError::NoPieceAtSource(pos(4, 1)))
    );
    assert_eq!(
        session.make_move(pos(5, 0), pos(3, 0)),
        Err(SessionError::Board(BoardError::IllegalMove {
            from: pos(5, 0),
            to: pos(3, 0)
        }))
    );
    assert_eq!(
        session.make_move(pos(5, 0), pos(9, 1)),
        Err(SessionError::Board(BoardError::InvalidPosition(pos(9, 1))))
    );
    assert_eq!(
        session.possible_moves(pos(4, 1)),
        Err(SessionError::TurnViolation {
            expected: Color::Black,
            found: None
        })
    );

    assert_eq!(session.snapshot(), before);
    assert_eq!(session.state(), SessionState::NotStarted);
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_capture_passes_turn_to_white() {
    let mut session = GameSession::new();
    resume_with(
        &mut session,
        &[
            (5, 0, Piece::man(Color::Black)),
            (4, 1, Piece::man(Color::White)),
            (1, 4, Piece::man(Color::White)),
        ],
        Color::Black,
    );

    session.make_move(pos(5, 0), pos(3, 2)).unwrap();

    assert_eq!(session.piece(pos(5, 0)).unwrap(), None);
    assert_eq!(session.piece(pos(4, 1)).unwrap(), None);
    assert_eq!(
        session.piece(pos(3, 2)).unwrap(),
        Some(Piece::man(Color::Black))
    );
    assert_eq!(session.current_player(), Color::White);
    assert_eq!(session.state(), SessionState::Playing);
}

#[test]
fn test_capturing_last_piece_wins_for_mover() {
    let mut session = GameSession::with_leaderboard(Box::new(MemoryLeaderboard::new()));
    resume_with(&mut session, &one_capture_from_win(), Color::Black);
    let events = record_events(&mut session);

    let outcome = session.make_move(pos(5, 0), pos(3, 2)).unwrap();
    assert_eq!(outcome.captured, vec![pos(4, 1)]);

    assert_eq!(session.state(), SessionState::BlackWon);
    assert_eq!(session.winner(), Some(Color::Black));
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            SessionEvent::MoveMade {
                from: pos(5, 0),
                to: pos(3, 2)
            },
            SessionEvent::GameOver {
                winner: Some(Color::Black)
            },
        ]
    );

    assert_eq!(
        session.make_move(pos(3, 2), pos(2, 1)),
        Err(SessionError::GameOver)
    );
    assert_eq!(session.possible_moves(pos(3, 2)), Err(SessionError::GameOver));
}

#[test]
fn test_blocked_opponent_draws() {
    let mut session = GameSession::new();
    resume_with(
        &mut session,
        &[
            (5, 2, Piece::man(Color::Black)),
            (7, 6, Piece::man(Color::Black)),
            (6, 7, Piece::man(Color::White)),
        ],
        Color::Black,
    );
    let events = record_events(&mut session);

    session.make_move(pos(5, 2), pos(4, 3)).unwrap();

    assert_eq!(session.state(), SessionState::Drawn);
    assert_eq!(session.winner(), None);
    assert_eq!(
        events.lock().unwrap().last(),
        Some(&SessionEvent::GameOver { winner: None })
    );
}

#[test]
fn test_win_is_written_to_leaderboard_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wins.json");

    for _ in 0..2 {
        let leaderboard = FileLeaderboard::new(&path);
        let mut session = GameSession::with_leaderboard(Box::new(leaderboard));
        resume_with(&mut session, &one_capture_from_win(), Color::Black);
        session.make_move(pos(5, 0), pos(3, 2)).unwrap();
    }

    let counts = FileLeaderboard::new(&path).load().unwrap();
    assert_eq!(counts.wins(Color::Black), 2);
    assert_eq!(counts.wins(Color::White), 0);
}

#[test]
fn test_win_against_full_counter_still_ends_game() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wins.json");
    std::fs::write(&path, r#"{"black_wins":4294967295,"white_wins":0}"#).unwrap();

    let mut session = GameSession::with_leaderboard(Box::new(FileLeaderboard::new(&path)));
    resume_with(&mut session, &one_capture_from_win(), Color::Black);
    let events = record_events(&mut session);

    session.make_move(pos(5, 0), pos(3, 2)).unwrap();

    assert_eq!(session.state(), SessionState::BlackWon);
    assert_eq!(
        events.lock().unwrap().last(),
        Some(&SessionEvent::GameOver {
            winner: Some(Color::Black)
        })
    );
    let counts = FileLeaderboard::new(&path).load().unwrap();
    assert_eq!(counts.wins(Color::Black), u32::MAX);
}

#[test]
fn test_draw_is_not_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wins.json");

    let mut session = GameSession::with_leaderboard(Box::new(FileLeaderboard::new(&path)));
    resume_with(
        &mut session,
        &[
            (5, 2, Piece::man(Color::Black)),
            (7, 6, Piece::man(Color::Black)),
            (6, 7, Piece::man(Color::White)),
        ],
        Color::Black,
    );
    session.make_move(pos(5, 2), pos(4, 3)).unwrap();

    assert_eq!(session.state(), SessionState::Drawn);
    assert!(!path.exists());
}

struct BrokenLeaderboard;

impl WinRecorder for BrokenLeaderboard {
    fn record_win(&mut self, _winner: Color) -> Result<(), LeaderboardError> {
        Err(LeaderboardError::new("disk full"))
    }
}

#[test]
fn test_leaderboard_failure_keeps_the_win() {
    let mut session = GameSession::with_leaderboard(Box::new(BrokenLeaderboard));
    resume_with(&mut session, &one_capture_from_win(), Color::Black);

    let outcome = session.make_move(pos(5, 0), pos(3, 2));
    assert!(outcome.is_ok());
    assert_eq!(session.state(), SessionState::BlackWon);
    assert_eq!(session.board().count(Color::White), 0);
}

#[test]
fn test_restart_after_game_over() {
    let mut session = GameSession::new();
    resume_with(&mut session, &one_capture_from_win(), Color::Black);
    session.make_move(pos(5, 0), pos(3, 2)).unwrap();

    session.restart();
    assert_eq!(session.state(), SessionState::NotStarted);
    assert_eq!(session.current_player(), Color::Black);
    assert_eq!(session.board().count(Color::White), 12);
    assert!(session.make_move(pos(5, 0), pos(4, 1)).is_ok());
}

#[test]
fn test_unsubscribed_handler_stops_receiving() {
    let mut session = GameSession::new();
    let kept = record_events(&mut session);
    let dropped = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&dropped);
    let id = session.subscribe(move |_| *counter.lock().unwrap() += 1);

    session.make_move(pos(5, 0), pos(4, 1)).unwrap();
    assert!(session.unsubscribe(id));
    assert!(!session.unsubscribe(id));
    session.make_move(pos(2, 1), pos(3, 2)).unwrap();

    assert_eq!(*dropped.lock().unwrap(), 3);
    assert_eq!(kept.lock().unwrap().len(), 5);
}

#[test]
fn test_save_and_load_resume_the_game() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.json");

    let mut session = GameSession::new();
    session.set_multi_jumps(false).unwrap();
    session.make_move(pos(5, 2), pos(4, 3)).unwrap();
    session.save_to_path(&path).unwrap();

    let mut resumed = GameSession::new();
    let events = record_events(&mut resumed);
    resumed.load_from_path(&path).unwrap();

    assert_eq!(resumed.snapshot(), session.snapshot());
    assert_eq!(resumed.current_player(), Color::White);
    assert_eq!(resumed.state(), SessionState::Playing);
    assert!(!resumed.multi_jumps());
    assert!(!resumed.board().multi_jump());
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            SessionEvent::Restarted,
            SessionEvent::PlayerChanged(Color::White),
            SessionEvent::Started,
        ]
    );

    resumed.make_move(pos(2, 1), pos(3, 2)).unwrap();
    assert_eq!(resumed.current_player(), Color::Black);
}

#[test]
fn test_bad_save_files_leave_session_alone() {
    let dir = tempfile::tempdir().unwrap();
    let garbage = dir.path().join("garbage.json");
    std::fs::write(&garbage, "{ not json").unwrap();

    let mut session = GameSession::new();
    session.make_move(pos(5, 2), pos(4, 3)).unwrap();
    let before = session.snapshot();

    assert!(matches!(
        session.load_from_path(&garbage),
        Err(SessionError::InvalidSaveFormat(_))
    ));
    assert!(matches!(
        session.load_from_path(dir.path().join("missing.json")),
        Err(SessionError::Persistence(_))
    ));
    assert_eq!(session.snapshot(), before);
}

#[test]
fn test_larger_board_session() {
    let mut session = GameSession::with_board_size(10, Box::new(MemoryLeaderboard::new())).unwrap();
    assert_eq!(session.board().size(), 10);
    assert_eq!(session.board().count(Color::Black), 15);

    session.make_move(pos(7, 0), pos(6, 1)).unwrap();
    assert_eq!(session.current_player(), Color::White);

    session.restart();
    assert_eq!(session.board().size(), 10);

    assert!(matches!(
        GameSession::with_board_size(9, Box::new(MemoryLeaderboard::new())),
        Err(SessionError::Board(BoardError::InvalidBoardSize(9)))
    ));
}
