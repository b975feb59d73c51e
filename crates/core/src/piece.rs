//! Falling piece - three stacked cells under player control
//!
//! The anchor is the bottom cell; the middle and top cells sit one and two
//! rows above it. Movement mutates the anchor directly and the board decides
//! whether the result is legal.

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::rng::SimpleRng;
use crate::types::{Color, Coordinate, PIECE_LEN};

/// Active or upcoming falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FallingPiece {
    pub row: i32,
    pub column: i32,
    /// Bottom, middle, top
    pub colors: [Color; PIECE_LEN],
}

impl FallingPiece {
    pub fn new(row: i32, column: i32, colors: [Color; PIECE_LEN]) -> Self {
        Self {
            row,
            column,
            colors,
        }
    }

    /// Create a piece with random colors drawn from the first `colors` palette entries
    pub fn random(row: i32, column: i32, colors: u8, rng: &mut SimpleRng) -> Self {
        Self::new(row, column, rng.next_piece_colors(colors))
    }

    pub fn anchor(&self) -> Coordinate {
        Coordinate::new(self.row, self.column)
    }

    pub fn bottom(&self) -> Color {
        self.colors[0]
    }

    pub fn middle(&self) -> Color {
        self.colors[1]
    }

    pub fn top(&self) -> Color {
        self.colors[2]
    }

    /// Cycle colors: the old bottom becomes the top, the middle drops to the
    /// bottom and the old top takes the middle.
    pub fn rotate(&mut self) {
        let [bottom, middle, top] = self.colors;
        self.colors = [middle, top, bottom];
    }

    pub fn shift_column(&mut self, delta: i32) {
        self.column += delta;
    }

    pub fn descend(&mut self) {
        self.row -= 1;
    }

    pub fn ascend(&mut self) {
        self.row += 1;
    }

    /// Occupied coordinates with their colors, bottom to top
    pub fn cells(&self) -> ArrayVec<(Coordinate, Color), PIECE_LEN> {
        let mut out = ArrayVec::new();
        let mut at = self.anchor();
        for &color in &self.colors {
            out.push((at, color));
            at = at.above();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece() -> FallingPiece {
        FallingPiece::new(5, 2, [Color::Red, Color::Green, Color::Blue])
    }

    #[test]
    fn test_rotate_lifts_bottom_to_top() {
        let mut p = piece();
        p.rotate();
        assert_eq!(p.bottom(), Color::Green);
        assert_eq!(p.middle(), Color::Blue);
        assert_eq!(p.top(), Color::Red);
        assert_eq!(p.anchor(), Coordinate::new(5, 2));
    }

    #[test]
    fn test_rotate_has_order_three() {
        let mut p = piece();
        let original = p;
        p.rotate();
        assert_ne!(p, original);
        p.rotate();
        assert_ne!(p, original);
        p.rotate();
        assert_eq!(p, original);
    }

    #[test]
    fn test_cells_stack_upward_from_anchor() {
        let cells = piece().cells();
        assert_eq!(
            cells.as_slice(),
            &[
                (Coordinate::new(5, 2), Color::Red),
                (Coordinate::new(6, 2), Color::Green),
                (Coordinate::new(7, 2), Color::Blue),
            ]
        );
    }

    #[test]
    fn test_movement_is_unchecked() {
        let mut p = piece();
        p.shift_column(-3);
        p.descend();
        assert_eq!(p.anchor(), Coordinate::new(4, -1));
        p.ascend();
        p.shift_column(3);
        assert_eq!(p.anchor(), Coordinate::new(5, 2));
    }
}
