//! Board module - turn sequencing for a falling-column game
//!
//! The board owns the cell storage, the active and next pieces, and the score.
//! It validates movement, locks pieces that can no longer descend, runs the
//! clear/fall loop until the grid is stable, and spawns the next piece.
//!
//! Coordinates: row 0 is the floor, rows grow upward. New pieces spawn with
//! their anchor at `(rows - 1, columns / 2)`; the waiting piece sits one row
//! higher.
//!
//! [`Board::move_down`] is async: with animation enabled a clear pass pulses
//! the matched cells and waits `pulse_delay` between toggles. It borrows the
//! board mutably, so no other command can run until it completes. Renderers
//! read cells concurrently through [`Board::cells`].

use std::sync::Arc;

use log::{debug, info, trace};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::config::{BoardConfig, ConfigError};
use crate::notify::{BoardEvent, BoardObserver, Observers};
use crate::piece::FallingPiece;
use crate::rng::SimpleRng;
use crate::snapshot::BoardSnapshot;
use crate::storage::{CellStorage, CellsView, MatchSet};
use crate::types::{Color, Coordinate, CLEAR_PULSES};

/// Coarse game state visible to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    Playing,
    GameOver,
    Stopped,
}

/// Complete board state
#[derive(Debug)]
pub struct Board {
    config: BoardConfig,
    storage: CellStorage,
    active: Option<FallingPiece>,
    next: Option<FallingPiece>,
    score: u32,
    phase: Phase,
    rng: SimpleRng,
    observers: Observers,
}

impl Board {
    /// Create a board seeded from the clock
    pub fn new(config: BoardConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, SimpleRng::from_clock())
    }

    /// Create a board whose piece colors are reproducible
    pub fn with_seed(config: BoardConfig, seed: u32) -> Result<Self, ConfigError> {
        Self::with_rng(config, SimpleRng::new(seed))
    }

    fn with_rng(config: BoardConfig, rng: SimpleRng) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            storage: CellStorage::new(),
            active: None,
            next: None,
            score: 0,
            phase: Phase::NotStarted,
            rng,
            observers: Observers::default(),
        })
    }

    pub fn rows(&self) -> i32 {
        self.config.rows
    }

    pub fn columns(&self) -> i32 {
        self.config.columns
    }

    pub fn colors(&self) -> u8 {
        self.config.colors
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn show_animation(&self) -> bool {
        self.config.show_animation
    }

    pub fn set_show_animation(&mut self, show: bool) {
        self.config.show_animation = show;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_piece(&self) -> Option<FallingPiece> {
        self.active
    }

    pub fn next_piece(&self) -> Option<FallingPiece> {
        self.next
    }

    pub fn storage(&self) -> &CellStorage {
        &self.storage
    }

    /// Shared read handle on the settled cells
    pub fn cells(&self) -> CellsView {
        self.storage.view()
    }

    /// Register a redraw observer
    pub fn subscribe(&mut self, observer: Arc<dyn BoardObserver>) {
        self.observers.push(observer);
    }

    /// Register a channel observer and return its receiving end
    pub fn subscribe_channel(&mut self) -> mpsc::UnboundedReceiver<BoardEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.push(Arc::new(tx));
        rx
    }

    /// Anchor of a freshly promoted piece
    pub fn spawn_coordinate(&self) -> Coordinate {
        Coordinate::new(self.config.rows - 1, self.config.columns / 2)
    }

    /// Anchor of the waiting piece, one row above the spawn coordinate
    pub fn next_spawn_coordinate(&self) -> Coordinate {
        self.spawn_coordinate().above()
    }

    fn random_piece(&mut self, at: Coordinate) -> FallingPiece {
        FallingPiece::random(at.row, at.column, self.config.colors, &mut self.rng)
    }

    /// Reset score and cells and spawn the first two pieces
    pub fn start_game(&mut self) {
        self.score = 0;
        self.storage.clear();
        let active = self.random_piece(self.spawn_coordinate());
        let next = self.random_piece(self.next_spawn_coordinate());
        self.active = Some(active);
        self.next = Some(next);
        self.phase = Phase::Playing;
        info!(
            "game started on {}x{} board with {} colors",
            self.config.rows, self.config.columns, self.config.colors
        );
        self.observers.emit(BoardEvent::Spawned);
    }

    /// Drop both pieces; moves become no-ops until the next start
    pub fn stop_game(&mut self) {
        self.active = None;
        self.next = None;
        self.phase = Phase::Stopped;
        info!("game stopped with score {}", self.score);
        self.observers.emit(BoardEvent::Stopped);
    }

    /// Whether the active piece's anchor is inside the grid and on an empty cell.
    ///
    /// Only the anchor is checked against storage: columns are always settled
    /// contiguously, so the two cells above an empty anchor are empty too.
    pub fn validate_move(&self) -> bool {
        match &self.active {
            Some(piece) => {
                piece.row >= 0
                    && piece.column >= 0
                    && piece.column < self.config.columns
                    && !self.storage.contains(piece.row, piece.column)
            }
            None => false,
        }
    }

    fn try_shift(&mut self, delta: i32) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        piece.shift_column(delta);

        if self.validate_move() {
            return true;
        }

        if let Some(piece) = self.active.as_mut() {
            piece.shift_column(-delta);
            trace!("shift by {} rejected at column {}", delta, piece.column);
        }
        false
    }

    /// Shift the active piece one column left; returns whether it moved
    pub fn move_left(&mut self) -> bool {
        self.try_shift(-1)
    }

    /// Shift the active piece one column right; returns whether it moved
    pub fn move_right(&mut self) -> bool {
        self.try_shift(1)
    }

    /// Cycle the active piece's colors
    pub fn rotate_item(&mut self) {
        if let Some(piece) = self.active.as_mut() {
            piece.rotate();
        }
    }

    /// Move the active piece down one row.
    ///
    /// When the piece cannot descend it is locked, matches are cleared until
    /// the grid is stable, and the next piece is promoted. Returns `false`
    /// only on game over (a blocked piece whose anchor is at or above
    /// `rows - 2`); with no active piece this is a no-op returning `true`.
    pub async fn move_down(&mut self) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return true;
        };
        piece.descend();

        if self.validate_move() {
            return true;
        }

        let Some(piece) = self.active.as_mut() else {
            return true;
        };
        piece.ascend();
        let piece = *piece;

        if piece.row >= self.config.rows - 2 {
            self.game_over();
            return false;
        }

        self.lock_piece(piece);
        self.resolve_matches().await;
        self.promote_next();
        true
    }

    fn game_over(&mut self) {
        self.active = None;
        self.next = None;
        self.phase = Phase::GameOver;
        info!("game over with score {}", self.score);
        self.observers.emit(BoardEvent::GameOver);
    }

    fn lock_piece(&mut self, piece: FallingPiece) {
        self.storage.insert_piece(&piece);
        self.active = None;
        debug!("locked piece at row {} column {}", piece.row, piece.column);
        self.observers.emit(BoardEvent::PieceLocked);
    }

    fn promote_next(&mut self) {
        let spawn = self.spawn_coordinate();
        let mut promoted = match self.next.take() {
            Some(piece) => piece,
            None => self.random_piece(spawn),
        };
        promoted.row = spawn.row;
        promoted.column = spawn.column;

        let next = self.random_piece(self.next_spawn_coordinate());
        self.active = Some(promoted);
        self.next = Some(next);
        self.observers.emit(BoardEvent::Spawned);
    }

    /// Find matches and credit them to the score; `None` when the grid is stable
    fn begin_clear(&mut self) -> Option<MatchSet> {
        let matches = self.storage.find_matches();
        if matches.is_empty() {
            return None;
        }
        self.score = self.score.saturating_add(matches.len() as u32);
        debug!("matched {} cells, score {}", matches.len(), self.score);
        self.observers.emit(BoardEvent::Matched {
            cells: matches.len(),
        });
        Some(matches)
    }

    fn finish_clear(&mut self, matches: &MatchSet) {
        self.storage.remove(matches);
        self.observers.emit(BoardEvent::Cleared {
            cells: matches.len(),
        });
        let moves = self.storage.settle_gravity();
        debug!("settled {} cell moves", moves);
        self.observers.emit(BoardEvent::Settled);
    }

    /// One clear pass without pulses: find, score, remove, settle.
    ///
    /// Returns the number of cells removed (0 when nothing matched).
    pub fn clear_step(&mut self) -> usize {
        match self.begin_clear() {
            Some(matches) => {
                self.finish_clear(&matches);
                matches.len()
            }
            None => 0,
        }
    }

    /// Repeat clear passes until no match remains; returns the total removed
    pub async fn resolve_matches(&mut self) -> usize {
        let mut total = 0usize;
        while let Some(matches) = self.begin_clear() {
            if self.config.show_animation {
                self.pulse(&matches).await;
            }
            self.finish_clear(&matches);
            total += matches.len();
        }
        total
    }

    async fn pulse(&self, matches: &MatchSet) {
        for step in 0..CLEAR_PULSES {
            self.storage.set_transparent(matches);
            self.observers
                .emit(BoardEvent::ClearPulse { step, hidden: true });
            self.pause().await;

            self.storage.restore_color(matches);
            self.observers
                .emit(BoardEvent::ClearPulse { step, hidden: false });
            self.pause().await;
        }
    }

    async fn pause(&self) {
        if !self.config.pulse_delay.is_zero() {
            tokio::time::sleep(self.config.pulse_delay).await;
        }
    }

    /// Seed a settled cell; rejects out-of-grid or occupied coordinates
    pub fn place_cell(&mut self, coordinate: Coordinate, color: Color) -> bool {
        let inside = (0..self.config.rows).contains(&coordinate.row)
            && (0..self.config.columns).contains(&coordinate.column);
        inside && self.storage.insert(coordinate, color)
    }

    /// Fill the lowest `rows` rows with random colors (puzzle setup)
    pub fn fill_random(&mut self, rows: i32) {
        for row in 0..rows.min(self.config.rows) {
            for column in 0..self.config.columns {
                let color = self.rng.next_color(self.config.colors);
                self.storage.insert(Coordinate::new(row, column), color);
            }
        }
    }

    /// Overwrite `out` with the current state, reusing its buffers
    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        out.clear();
        out.rows = self.config.rows;
        out.columns = self.config.columns;
        out.colors = self.config.colors;
        out.score = self.score;
        out.phase = self.phase;
        out.active = self.active.map(Into::into);
        out.next = self.next.map(Into::into);
        out.fill_cells(&self.storage.view());
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut s = BoardSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn quiet_board() -> Board {
        let config = BoardConfig {
            show_animation: false,
            ..BoardConfig::default()
        };
        Board::with_seed(config, 12345).unwrap()
    }

    #[test]
    fn test_new_board_is_idle() {
        let board = quiet_board();
        assert_eq!(board.phase(), Phase::NotStarted);
        assert!(board.active_piece().is_none());
        assert!(board.next_piece().is_none());
    }

    #[test]
    fn test_moves_without_piece_are_noops() {
        let mut board = quiet_board();
        assert!(!board.move_left());
        assert!(!board.move_right());
        board.rotate_item();
        assert!(!board.validate_move());
    }

    #[tokio::test]
    async fn test_move_down_without_piece_keeps_playing() {
        let mut board = quiet_board();
        assert!(board.move_down().await);
        assert!(board.storage().is_empty());
    }

    #[test]
    fn test_place_cell_rejects_outside_grid() {
        let mut board = quiet_board();
        assert!(!board.place_cell(Coordinate::new(-1, 0), Color::Red));
        assert!(!board.place_cell(Coordinate::new(0, 6), Color::Red));
        assert!(!board.place_cell(Coordinate::new(13, 0), Color::Red));
        assert!(board.place_cell(Coordinate::new(12, 5), Color::Red));
        assert!(!board.place_cell(Coordinate::new(12, 5), Color::Blue));
    }

    #[test]
    fn test_fill_random_respects_palette() {
        let config = BoardConfig {
            colors: 3,
            show_animation: false,
            ..BoardConfig::default()
        };
        let mut board = Board::with_seed(config, 4).unwrap();
        board.fill_random(2);
        assert_eq!(board.storage().len(), 12);
        let snap = board.snapshot();
        assert!(snap.cells.iter().all(|c| c.color.index() < 3));
    }

    #[test]
    fn test_snapshot_orders_cells_by_column() {
        let mut board = quiet_board();
        board.place_cell(Coordinate::new(1, 0), Color::Red);
        board.place_cell(Coordinate::new(0, 2), Color::Blue);
        board.place_cell(Coordinate::new(0, 0), Color::Green);

        let snap = board.snapshot();
        let order: Vec<(i32, i32)> = snap.cells.iter().map(|c| (c.column, c.row)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (2, 0)]);
        assert_eq!(snap.phase, Phase::NotStarted);
    }

    #[test]
    fn test_snapshot_into_drops_stale_state() {
        let mut board = quiet_board();
        board.start_game();
        board.place_cell(Coordinate::new(0, 0), Color::Red);
        let mut snap = board.snapshot();
        assert!(snap.active.is_some());

        board.stop_game();
        board.start_game();
        board.stop_game();
        board.snapshot_into(&mut snap);
        assert!(snap.cells.is_empty());
        assert!(snap.active.is_none());
        assert!(snap.next.is_none());
        assert_eq!(snap.phase, Phase::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_animated_clear_emits_eight_pulse_events() {
        let config = BoardConfig {
            show_animation: true,
            pulse_delay: Duration::from_millis(100),
            ..BoardConfig::default()
        };
        let mut board = Board::with_seed(config, 1).unwrap();
        for column in 0..3 {
            board.place_cell(Coordinate::new(0, column), Color::Yellow);
        }
        let mut rx = board.subscribe_channel();

        let started = tokio::time::Instant::now();
        assert_eq!(board.resolve_matches().await, 3);
        assert!(started.elapsed() >= Duration::from_millis(800));

        let mut pulses = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, BoardEvent::ClearPulse { .. }) {
                pulses += 1;
            }
        }
        assert_eq!(pulses, 2 * CLEAR_PULSES as usize);
        assert!(board.storage().is_empty());
        assert_eq!(board.score(), 3);
    }
}
