//! Snapshot module - render-ready copies of the board state

use serde::Serialize;

use crate::board::Phase;
use crate::piece::FallingPiece;
use crate::storage::CellsView;
use crate::types::{CellKey, Color};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellSnapshot {
    pub row: i32,
    pub column: i32,
    pub color: Color,
    pub hidden: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PieceSnapshot {
    pub row: i32,
    pub column: i32,
    pub bottom: Color,
    pub middle: Color,
    pub top: Color,
}

impl From<FallingPiece> for PieceSnapshot {
    fn from(value: FallingPiece) -> Self {
        Self {
            row: value.row,
            column: value.column,
            bottom: value.bottom(),
            middle: value.middle(),
            top: value.top(),
        }
    }
}

/// Render-ready copy of a board
///
/// Cells are ordered column by column, bottom to top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub rows: i32,
    pub columns: i32,
    pub colors: u8,
    pub score: u32,
    pub phase: Phase,
    pub cells: Vec<CellSnapshot>,
    pub active: Option<PieceSnapshot>,
    pub next: Option<PieceSnapshot>,
}

impl BoardSnapshot {
    /// Reset every field, keeping the cell buffer's allocation
    pub fn clear(&mut self) {
        self.rows = 0;
        self.columns = 0;
        self.colors = 0;
        self.score = 0;
        self.phase = Phase::NotStarted;
        self.cells.clear();
        self.active = None;
        self.next = None;
    }

    pub fn playable(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn cell_at(&self, row: i32, column: i32) -> Option<&CellSnapshot> {
        self.cells
            .iter()
            .find(|c| c.row == row && c.column == column)
    }

    /// Replace `cells` with the current contents of `view`, reusing the allocation
    pub(crate) fn fill_cells(&mut self, view: &CellsView) {
        self.cells.clear();
        view.with_cells(|map| {
            let mut keys: Vec<CellKey> = map.keys().copied().collect();
            keys.sort_unstable();
            for key in keys {
                if let Some(cell) = map.get(&key) {
                    self.cells.push(CellSnapshot {
                        row: key.row(),
                        column: key.column(),
                        color: cell.color,
                        hidden: cell.hidden,
                    });
                }
            }
        });
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            rows: 0,
            columns: 0,
            colors: 0,
            score: 0,
            phase: Phase::NotStarted,
            cells: Vec::new(),
            active: None,
            next: None,
        }
    }
}
