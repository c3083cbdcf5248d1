//! Playing field and collision detection

use serde::{Deserialize, Serialize};

use crate::GameError;
use crate::piece::Piece;
use crate::tetromino::Color;

/// A cell on the field - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// Fixed-size grid of settled cells
///
/// Row 0 is the top visible row and rows grow downward. Coordinates above the
/// top (negative rows) are not stored: a piece may hang there while falling,
/// but nothing settles there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    width: usize,
    height: usize,
    /// Grid stored as [row][col]
    cells: Vec<Vec<Cell>>,
}

impl Field {
    /// Create an empty field
    ///
    /// Both dimensions must be non-zero and fit in an `i32`, since piece
    /// coordinates are signed.
    pub fn new(width: usize, height: usize) -> Result<Self, GameError> {
        let fits = |n: usize| n > 0 && i32::try_from(n).is_ok();
        if !fits(width) || !fits(height) {
            return Err(GameError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![vec![Cell::Empty; width]; height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, col: i32, row: i32) -> Option<(usize, usize)> {
        let col = usize::try_from(col).ok()?;
        let row = usize::try_from(row).ok()?;
        (col < self.width && row < self.height).then_some((col, row))
    }

    /// Get the cell at (col, row)
    /// Returns None if out of bounds
    pub fn get(&self, col: i32, row: i32) -> Option<Cell> {
        self.index(col, row).map(|(col, row)| self.cells[row][col])
    }

    /// Set the cell at (col, row)
    /// Returns false if out of bounds
    pub fn set(&mut self, col: i32, row: i32, cell: Cell) -> bool {
        match self.index(col, row) {
            Some((col, row)) => {
                self.cells[row][col] = cell;
                true
            }
            None => false,
        }
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Whether the piece may occupy its cells
    ///
    /// Columns must always be on the field and rows must be above the floor.
    /// Cells above the top edge are accepted without an overlap check, which is
    /// what lets a piece enter the field partially hidden.
    pub fn is_valid_placement(&self, piece: &Piece) -> bool {
        piece.cells().iter().all(|&(col, row)| {
            if col < 0 || col as usize >= self.width || row >= self.height as i32 {
                return false;
            }
            row < 0 || self.cells[row as usize][col as usize].is_empty()
        })
    }

    /// Write the piece into the grid
    ///
    /// Cells above the top edge are discarded. Returns how many were lost.
    pub fn lock(&mut self, piece: &Piece) -> usize {
        let color = piece.color();
        let mut dropped = 0;
        for (col, row) in piece.cells() {
            if row < 0 {
                dropped += 1;
                continue;
            }
            self.set(col, row, Cell::Filled(color));
        }
        dropped
    }

    /// Remove every full row and return how many were removed
    ///
    /// Surviving rows keep their order and settle at the bottom; the same
    /// number of empty rows is inserted at the top.
    pub fn clear_full_lines(&mut self) -> usize {
        let mut write_row = self.height;

        for read_row in (0..self.height).rev() {
            if self.is_line_full(read_row) {
                continue;
            }
            write_row -= 1;
            if write_row != read_row {
                self.cells.swap(write_row, read_row);
            }
        }

        // Rows above the write pointer hold cleared or stale data
        for row in &mut self.cells[..write_row] {
            row.fill(Cell::Empty);
        }

        write_row
    }

    /// Check if a line is completely filled
    fn is_line_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(Cell::is_filled)
    }

    /// Check if the field is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(Cell::is_empty))
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(Cell::Empty);
        }
    }
}
