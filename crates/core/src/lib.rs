//! Core game logic module - the rules of a falling-column match-three game
//!
//! This crate contains the board-state machine and nothing else: no rendering,
//! no input mapping, no timers beyond the optional clear pulse delay.
//!
//! - **Deterministic**: `Board::with_seed` reproduces the same piece colors
//! - **Testable**: every rule is a plain method on [`Board`] or [`CellStorage`]
//! - **Renderer-agnostic**: changes are published as [`BoardEvent`]s and the
//!   cell map can be read concurrently through a [`CellsView`]
//!
//! # Module Structure
//!
//! - [`storage`]: sparse coordinate-keyed cells, match detection, gravity
//! - [`piece`]: the three-cell falling piece and its color rotation
//! - [`board`]: movement validation, lock-in, clear/fall loop, spawning
//! - [`notify`]: redraw notifications
//! - [`config`]: dimensions, animation flag, range validation
//! - [`rng`]: seeded color draws
//! - [`snapshot`]: render-ready copies of the board
//!
//! # Game Rules
//!
//! - A piece is three stacked cells; rotating cycles its colors in place
//! - A piece that cannot descend is locked; if its anchor is at or above
//!   `rows - 2` the game is over instead
//! - Any cell whose two neighbours on one axis (vertical, horizontal, either
//!   diagonal) share its color forms a triple; all triples are cleared at once
//! - Each cleared cell scores one point
//! - Cells then fall until nothing moves, and matching repeats until stable
//!
//! # Example
//!
//! ```
//! use columns_core::{Board, BoardConfig};
//! use columns_core::types::{Color, Coordinate};
//!
//! let config = BoardConfig { show_animation: false, ..BoardConfig::default() };
//! let mut board = Board::with_seed(config, 12345).unwrap();
//! board.start_game();
//!
//! for column in 0..3 {
//!     board.place_cell(Coordinate::new(0, column), Color::Red);
//! }
//! assert_eq!(board.clear_step(), 3);
//! assert_eq!(board.score(), 3);
//! ```

pub mod board;
pub mod config;
pub mod notify;
pub mod piece;
pub mod rng;
pub mod snapshot;
pub mod storage;

pub use columns_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Phase};
pub use config::{BoardConfig, ConfigError};
pub use notify::{BoardEvent, BoardObserver};
pub use piece::FallingPiece;
pub use rng::SimpleRng;
pub use snapshot::{BoardSnapshot, CellSnapshot, PieceSnapshot};
pub use storage::{CellStorage, CellsView, MatchSet};
