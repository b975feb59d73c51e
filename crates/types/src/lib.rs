//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no game logic, making them usable in any
//! context (core rules, session runtime, external renderers).
//!
//! # Board Dimensions
//!
//! | Constant | Min | Max | Default |
//! |----------|-----|-----|---------|
//! | rows | 7 | 100 | 13 |
//! | columns | 3 | 100 | 6 |
//! | colors | 2 | 10 | 5 |
//!
//! Rows grow upward (row 0 is the floor), columns grow rightward.
//!
//! # Coordinate Keys
//!
//! Storage addresses a cell by a single integer key `column * KEY_STRIDE + row`.
//! `KEY_STRIDE` is larger than any row, so `key ± 1` is the cell above/below and
//! `key ± KEY_STRIDE` is the cell to the right/left.
//!
//! # Examples
//!
//! ```
//! use columns_types::{CellKey, Color, Coordinate, GameAction, KEY_STRIDE};
//!
//! let c = Coordinate::new(2, 3);
//! let key = c.key();
//! assert_eq!(key, CellKey(3 * KEY_STRIDE + 2));
//! assert_eq!(key.coordinate(), c);
//! assert_eq!(key.offset(1).coordinate(), Coordinate::new(3, 3));
//!
//! assert_eq!(Color::from_index(0), Some(Color::Red));
//! assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
//! ```

use serde::{Deserialize, Serialize};

/// Smallest allowed number of rows
pub const MIN_ROWS: i32 = 7;

/// Largest allowed number of rows
pub const MAX_ROWS: i32 = 100;

/// Default number of rows (13)
pub const DEFAULT_ROWS: i32 = 13;

/// Smallest allowed number of columns
pub const MIN_COLUMNS: i32 = 3;

/// Largest allowed number of columns
pub const MAX_COLUMNS: i32 = 100;

/// Default number of columns (6)
pub const DEFAULT_COLUMNS: i32 = 6;

/// Smallest allowed palette size
pub const MIN_COLORS: u8 = 2;

/// Largest allowed palette size (the whole of [`Color::ALL`])
pub const MAX_COLORS: u8 = 10;

/// Default palette size (5)
pub const DEFAULT_COLORS: u8 = 5;

/// Column multiplier of the coordinate key encoding.
///
/// Must stay strictly greater than [`MAX_ROWS`] plus the spawn headroom.
pub const KEY_STRIDE: i32 = 10_000;

/// Number of hide/restore toggles played when clearing with animation
pub const CLEAR_PULSES: u8 = 4;

/// Default delay between pulse toggles in milliseconds
pub const PULSE_DELAY_MS: u64 = 100;

/// Number of cells a falling piece occupies
pub const PIECE_LEN: usize = 3;

/// Cell palette
///
/// A board uses the first `colors` entries of [`Color::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Orange,
    Cyan,
    Pink,
    Brown,
    Gray,
}

impl Color {
    /// Palette in index order
    pub const ALL: [Color; MAX_COLORS as usize] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Purple,
        Color::Orange,
        Color::Cyan,
        Color::Pink,
        Color::Brown,
        Color::Gray,
    ];

    /// Look up a palette entry by index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Position of this color in [`Color::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Parse a color from its lowercase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use columns_types::Color;
    ///
    /// assert_eq!(Color::from_str("Blue"), Some(Color::Blue));
    /// assert_eq!(Color::from_str("mauve"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        Self::ALL.iter().copied().find(|c| c.as_str() == lower)
    }

    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Purple => "purple",
            Color::Orange => "orange",
            Color::Cyan => "cyan",
            Color::Pink => "pink",
            Color::Brown => "brown",
            Color::Gray => "gray",
        }
    }
}

/// Grid position; row 0 is the floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: i32,
    pub column: i32,
}

impl Coordinate {
    pub fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Encode as a storage key
    pub fn key(self) -> CellKey {
        CellKey(self.column * KEY_STRIDE + self.row)
    }

    /// Same column, one row up
    pub fn above(self) -> Self {
        Self::new(self.row + 1, self.column)
    }
}

/// Encoded coordinate: `column * KEY_STRIDE + row`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(pub i32);

impl CellKey {
    pub fn row(self) -> i32 {
        self.0.rem_euclid(KEY_STRIDE)
    }

    pub fn column(self) -> i32 {
        self.0.div_euclid(KEY_STRIDE)
    }

    pub fn coordinate(self) -> Coordinate {
        Coordinate::new(self.row(), self.column())
    }

    /// Key shifted by a raw delta (`±1` rows, `±KEY_STRIDE` columns)
    #[inline(always)]
    pub fn offset(self, delta: i32) -> Self {
        CellKey(self.0 + delta)
    }
}

impl From<Coordinate> for CellKey {
    fn from(value: Coordinate) -> Self {
        value.key()
    }
}

/// A settled cell in storage
///
/// `hidden` is only set while a clear pulse shows the cell as transparent;
/// the cell still occupies its coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub color: Color,
    pub hidden: bool,
}

impl Cell {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            hidden: false,
        }
    }
}

/// Commands accepted by a board session
///
/// These map one-to-one onto board operations; input devices and timers
/// translate their own events into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Shift the falling piece one column left
    MoveLeft,
    /// Shift the falling piece one column right
    MoveRight,
    /// Cycle the falling piece's colors
    Rotate,
    /// Descend one row, locking and clearing when blocked
    MoveDown,
    /// Reset the board and spawn the first pieces
    Start,
    /// Drop both pieces and stop accepting moves
    Stop,
    /// Suspend ticks and moves, keeping the board as it is
    Pause,
    /// Continue a paused game
    Resume,
}

impl GameAction {
    /// Parse action from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use columns_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveRight"), Some(GameAction::MoveRight));
    /// assert_eq!(GameAction::from_str("ROTATE"), Some(GameAction::Rotate));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "rotate" => Some(GameAction::Rotate),
            "movedown" => Some(GameAction::MoveDown),
            "start" => Some(GameAction::Start),
            "stop" => Some(GameAction::Stop),
            "pause" => Some(GameAction::Pause),
            "resume" => Some(GameAction::Resume),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::Rotate => "rotate",
            GameAction::MoveDown => "moveDown",
            GameAction::Start => "start",
            GameAction::Stop => "stop",
            GameAction::Pause => "pause",
            GameAction::Resume => "resume",
        }
    }
}
