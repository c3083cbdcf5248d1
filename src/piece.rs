//! Active falling piece logic
//!
//! A piece is a kind, an anchor on the grid and a rotation index. Every
//! movement produces a new candidate value; the controller decides whether the
//! field accepts it.

use serde::{Deserialize, Serialize};

use crate::tetromino::{Color, PATTERN_ORIGIN, TetrominoType};

/// Anchor row used when a piece enters the field
pub const SPAWN_ROW: i32 = 2;

/// A placed instance of a tetromino
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// The type of tetromino
    pub kind: TetrominoType,
    /// Anchor column; the pattern origin sits on it
    pub col: i32,
    /// Anchor row, 0 is the top visible row and rows grow downward
    pub row: i32,
    /// Rotation index, always kept below the kind's rotation count
    pub rotation: usize,
}

impl Piece {
    pub fn new(kind: TetrominoType, col: i32, row: i32) -> Self {
        Self {
            kind,
            col,
            row,
            rotation: 0,
        }
    }

    /// Create a piece at the spawn anchor of a field `field_width` columns wide
    ///
    /// [`Field::new`](crate::Field::new) keeps widths within `i32`. For wider
    /// values the column is capped so the pattern offsets cannot overflow.
    pub fn spawn(kind: TetrominoType, field_width: usize) -> Self {
        let col = i32::try_from(field_width / 2)
            .unwrap_or(i32::MAX)
            .min(i32::MAX / 2);
        Self::new(kind, col, SPAWN_ROW)
    }

    /// Absolute (col, row) of all 4 blocks
    pub fn cells(&self) -> [(i32, i32); 4] {
        let mut cells = [(0, 0); 4];
        let (origin_col, origin_row) = PATTERN_ORIGIN;
        for (slot, (col, row)) in cells
            .iter_mut()
            .zip(self.kind.pattern(self.rotation).filled())
        {
            *slot = (
                self.col + col as i32 - origin_col,
                self.row + row as i32 - origin_row,
            );
        }
        cells
    }

    /// The same piece with its anchor translated
    #[must_use]
    pub fn shifted(&self, d_col: i32, d_row: i32) -> Self {
        Self {
            col: self.col + d_col,
            row: self.row + d_row,
            ..*self
        }
    }

    /// The same piece turned one rotation step; the anchor does not move
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            rotation: (self.rotation + 1) % self.kind.rotation_count(),
            ..*self
        }
    }

    pub fn color(&self) -> Color {
        self.kind.color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_position() {
        let piece = Piece::spawn(TetrominoType::T, 10);
        assert_eq!(piece.col, 5);
        assert_eq!(piece.row, SPAWN_ROW);
        assert_eq!(piece.rotation, 0);
    }

    #[test]
    fn test_spawn_on_oversized_width_keeps_cells_in_range() {
        let piece = Piece::spawn(TetrominoType::I, usize::MAX);
        assert_eq!(piece.col, i32::MAX / 2);
        let rotated = piece.rotated();
        assert!(rotated.cells().iter().all(|&(col, _)| col > 0));
    }

    #[test]
    fn test_spawned_o_covers_top_rows() {
        let mut cells = Piece::spawn(TetrominoType::O, 10).cells();
        cells.sort();
        assert_eq!(cells, [(4, 0), (4, 1), (5, 0), (5, 1)]);
    }

    #[test]
    fn test_spawned_i_straddles_top() {
        let cells = Piece::spawn(TetrominoType::I, 10).cells();
        assert_eq!(cells, [(5, -1), (5, 0), (5, 1), (5, 2)]);
    }

    #[test]
    fn test_shift_moves_every_cell() {
        let piece = Piece::spawn(TetrominoType::S, 10);
        let moved = piece.shifted(-2, 3);
        for (before, after) in piece.cells().iter().zip(moved.cells()) {
            assert_eq!((before.0 - 2, before.1 + 3), after);
        }
        assert_eq!(moved.rotation, piece.rotation);
    }

    #[test]
    fn test_rotation_wraps_around() {
        for kind in TetrominoType::ALL {
            let start = Piece::spawn(kind, 10);
            let mut piece = start;
            for _ in 0..kind.rotation_count() {
                piece = piece.rotated();
            }
            assert_eq!(piece, start);
            assert_eq!(piece.cells(), start.cells());
        }
    }

    #[test]
    fn test_rotation_keeps_anchor() {
        let piece = Piece::new(TetrominoType::J, 4, 7).rotated();
        assert_eq!((piece.col, piece.row), (4, 7));
        assert_eq!(piece.rotation, 1);
    }
}
