//! Session runtime tests

use std::time::Duration;

use columns::core::{BoardEvent, Phase};
use columns::runtime::{Session, SessionConfig, SessionEvent};
use columns::types::GameAction;

fn manual_config(seed: u32) -> SessionConfig {
    let mut config = SessionConfig::default();
    config.board.show_animation = false;
    config.auto_tick = false;
    config.seed = Some(seed);
    config
}

#[tokio::test]
async fn test_manual_session_applies_commands_in_order() {
    let mut handle = Session::spawn(manual_config(11)).unwrap();

    handle.send(GameAction::Start).await.unwrap();
    handle.send(GameAction::MoveDown).await.unwrap();
    handle.send(GameAction::MoveLeft).await.unwrap();

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.phase, Phase::Playing);
    let active = snap.active.unwrap();
    assert_eq!((active.row, active.column), (11, 2));
    assert_eq!(snap.next.unwrap().row, 13);

    assert_eq!(
        handle.next_event().await,
        Some(SessionEvent::Board(BoardEvent::Spawned))
    );
    assert_eq!(handle.next_event().await, Some(SessionEvent::PieceMoved));
    assert_eq!(handle.next_event().await, Some(SessionEvent::PieceMoved));
    assert_eq!(handle.try_next_event(), None);
}

#[tokio::test]
async fn test_stop_and_shutdown_return_the_board() {
    let mut handle = Session::spawn(manual_config(4)).unwrap();

    handle.send(GameAction::Start).await.unwrap();
    handle.set_show_animation(true).await.unwrap();
    handle.send(GameAction::Stop).await.unwrap();

    let snap = handle.snapshot().await.unwrap();
    assert!(!snap.playable());
    assert!(snap.active.is_none());

    let mut saw_stop = false;
    while let Some(event) = handle.try_next_event() {
        if event == SessionEvent::Board(BoardEvent::Stopped) {
            saw_stop = true;
        }
    }
    assert!(saw_stop);

    let board = handle.shutdown().await.unwrap();
    assert_eq!(board.phase(), Phase::Stopped);
    assert!(board.show_animation());
}

#[tokio::test]
async fn test_moves_before_start_are_ignored() {
    let mut handle = Session::spawn(manual_config(4)).unwrap();

    handle.send(GameAction::MoveLeft).await.unwrap();
    handle.send(GameAction::Rotate).await.unwrap();
    handle.send(GameAction::MoveDown).await.unwrap();

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.phase, Phase::NotStarted);
    assert!(snap.active.is_none());
    assert_eq!(handle.try_next_event(), None);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_cells_view_is_shared_with_the_session() {
    let handle = Session::spawn(manual_config(21)).unwrap();
    let cells = handle.cells();
    assert!(cells.is_empty());

    handle.send(GameAction::Start).await.unwrap();
    for _ in 0..13 {
        handle.send(GameAction::MoveDown).await.unwrap();
    }
    let snap = handle.snapshot().await.unwrap();

    assert_eq!(cells.len(), snap.cells.len());
    assert!(snap.cells.len() == 3 || snap.score == 3);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_auto_tick_moves_piece_down() {
    let mut config = manual_config(7);
    config.auto_tick = true;
    let handle = Session::spawn(config).unwrap();

    handle.send(GameAction::Start).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.active.unwrap().row, 11);

    tokio::time::sleep(Duration::from_millis(1000)).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.active.unwrap().row, 10);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_no_ticks_before_start() {
    let mut config = manual_config(7);
    config.auto_tick = true;
    let handle = Session::spawn(config).unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.phase, Phase::NotStarted);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_pause_holds_the_piece_until_resume() {
    let mut config = manual_config(7);
    config.auto_tick = true;
    let mut handle = Session::spawn(config).unwrap();

    handle.send(GameAction::Start).await.unwrap();
    handle.send(GameAction::Pause).await.unwrap();
    handle.send(GameAction::MoveDown).await.unwrap();
    handle.send(GameAction::MoveLeft).await.unwrap();

    tokio::time::sleep(Duration::from_millis(3500)).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.phase, Phase::Playing);
    let active = snap.active.unwrap();
    assert_eq!((active.row, active.column), (12, 3));

    handle.send(GameAction::Resume).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.active.unwrap().row, 11);

    let mut changes = Vec::new();
    while let Some(event) = handle.try_next_event() {
        if let SessionEvent::PauseChanged { paused } = event {
            changes.push(paused);
        }
    }
    assert_eq!(changes, vec![true, false]);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_pause_is_ignored_outside_play() {
    let mut handle = Session::spawn(manual_config(3)).unwrap();

    handle.send(GameAction::Pause).await.unwrap();
    handle.send(GameAction::Start).await.unwrap();
    handle.send(GameAction::MoveDown).await.unwrap();

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.active.unwrap().row, 11);
    while let Some(event) = handle.try_next_event() {
        assert!(!matches!(event, SessionEvent::PauseChanged { .. }));
    }

    handle.shutdown().await.unwrap();
}
