//! Cell storage - sparse map of settled cells
//!
//! Cells are keyed by [`CellKey`] (`column * KEY_STRIDE + row`), which turns
//! every directional neighbor lookup into a constant offset:
//!
//! | Axis | Offset |
//! |------|--------|
//! | vertical | `±1` |
//! | horizontal | `±KEY_STRIDE` |
//! | diagonal | `±(KEY_STRIDE + 1)` |
//! | anti-diagonal | `±(KEY_STRIDE - 1)` |
//!
//! The map sits behind an `Arc<RwLock<..>>` so a renderer can read it through a
//! [`CellsView`] while the board writes. Only the owning board mutates it.
//! None of the operations here fail: missing coordinates are ignored and
//! occupied coordinates are never overwritten.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::piece::FallingPiece;
use crate::types::{Cell, CellKey, Color, Coordinate, KEY_STRIDE};

/// Neighbor offsets checked by [`CellStorage::find_matches`]
pub const MATCH_AXES: [i32; 4] = [1, KEY_STRIDE, KEY_STRIDE + 1, KEY_STRIDE - 1];

type CellMap = HashMap<CellKey, Cell>;

/// Cells selected for removal, with the color each had when matched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    cells: BTreeMap<CellKey, Color>,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: CellKey, color: Color) {
        self.cells.entry(key).or_insert(color);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        self.cells.contains_key(&coordinate.key())
    }

    pub fn color_at(&self, coordinate: Coordinate) -> Option<Color> {
        self.cells.get(&coordinate.key()).copied()
    }

    /// Matched coordinates in key order (column-major, bottom to top)
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.cells.keys().map(|k| k.coordinate())
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellKey, Color)> + '_ {
        self.cells.iter().map(|(k, c)| (*k, *c))
    }
}

impl FromIterator<(Coordinate, Color)> for MatchSet {
    fn from_iter<I: IntoIterator<Item = (Coordinate, Color)>>(iter: I) -> Self {
        let mut set = MatchSet::new();
        for (coordinate, color) in iter {
            set.insert(coordinate.key(), color);
        }
        set
    }
}

/// Read-only handle on a board's cells, safe to hold on another thread
#[derive(Debug, Clone)]
pub struct CellsView {
    cells: Arc<RwLock<CellMap>>,
}

impl CellsView {
    fn read(&self) -> RwLockReadGuard<'_, CellMap> {
        self.cells.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, coordinate: Coordinate) -> Option<Cell> {
        self.read().get(&coordinate.key()).copied()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy of the current cells, ordered by row then column
    pub fn snapshot(&self) -> BTreeMap<Coordinate, Cell> {
        self.read()
            .iter()
            .map(|(k, c)| (k.coordinate(), *c))
            .collect()
    }

    /// Run `f` against the map under a single read lock
    pub fn with_cells<R>(&self, f: impl FnOnce(&HashMap<CellKey, Cell>) -> R) -> R {
        f(&self.read())
    }
}

/// Sparse settled-cell storage
#[derive(Debug, Default)]
pub struct CellStorage {
    cells: Arc<RwLock<CellMap>>,
}

impl CellStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, CellMap> {
        self.cells.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CellMap> {
        self.cells.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Shared read handle for renderers
    pub fn view(&self) -> CellsView {
        CellsView {
            cells: Arc::clone(&self.cells),
        }
    }

    pub fn contains(&self, row: i32, column: i32) -> bool {
        self.read().contains_key(&Coordinate::new(row, column).key())
    }

    pub fn get(&self, coordinate: Coordinate) -> Option<Cell> {
        self.read().get(&coordinate.key()).copied()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    /// Add a cell if the coordinate is empty.
    ///
    /// Returns false (and leaves the existing cell untouched) when occupied.
    pub fn insert(&self, coordinate: Coordinate, color: Color) -> bool {
        let mut cells = self.write();
        match cells.entry(coordinate.key()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(Cell::new(color));
                true
            }
        }
    }

    /// Commit all three cells of a piece, each with add-if-absent semantics
    pub fn insert_piece(&self, piece: &FallingPiece) {
        let mut cells = self.write();
        for (coordinate, color) in piece.cells() {
            cells.entry(coordinate.key()).or_insert(Cell::new(color));
        }
    }

    /// Delete every listed cell that exists
    pub fn remove(&self, matches: &MatchSet) {
        let mut cells = self.write();
        for (key, _) in matches.iter() {
            cells.remove(&key);
        }
    }

    /// Collect every cell that is the center of a same-colored triple on any axis.
    ///
    /// The result is the union of all triples: a run of four or more is fully
    /// covered because each inner cell centers its own triple, and a cell shared
    /// by two runs appears once.
    pub fn find_matches(&self) -> MatchSet {
        let cells = self.read();
        let mut found = MatchSet::new();

        for (&key, cell) in cells.iter() {
            let color = cell.color;
            for delta in MATCH_AXES {
                let forward = key.offset(delta);
                let backward = key.offset(-delta);
                let same = |k: &CellKey| cells.get(k).map(|c| c.color) == Some(color);
                if same(&forward) && same(&backward) {
                    found.insert(key, color);
                    found.insert(forward, color);
                    found.insert(backward, color);
                }
            }
        }

        found
    }

    /// Let cells fall into empty space below them until nothing moves.
    ///
    /// Each pass first collects every cell above the floor whose lower
    /// neighbor is empty, then moves all of them down one row. Returns the
    /// total number of single-row moves.
    pub fn settle_gravity(&self) -> usize {
        let mut cells = self.write();
        let mut moves = 0usize;
        let mut falling: Vec<CellKey> = Vec::new();

        loop {
            falling.clear();
            falling.extend(
                cells
                    .keys()
                    .copied()
                    .filter(|k| k.row() > 0 && !cells.contains_key(&k.offset(-1))),
            );
            if falling.is_empty() {
                break;
            }
            falling.sort_unstable();

            for &key in &falling {
                if let Some(cell) = cells.remove(&key) {
                    cells.entry(key.offset(-1)).or_insert(cell);
                    moves += 1;
                }
            }
        }

        moves
    }

    /// Hide matched cells that still hold their matched color
    pub fn set_transparent(&self, matches: &MatchSet) {
        let mut cells = self.write();
        for (key, color) in matches.iter() {
            if let Some(cell) = cells.get_mut(&key) {
                if cell.color == color {
                    cell.hidden = true;
                }
            }
        }
    }

    /// Undo [`set_transparent`](Self::set_transparent)
    pub fn restore_color(&self, matches: &MatchSet) {
        let mut cells = self.write();
        for (key, color) in matches.iter() {
            if let Some(cell) = cells.get_mut(&key) {
                if cell.color == color {
                    cell.hidden = false;
                }
            }
        }
    }
}
