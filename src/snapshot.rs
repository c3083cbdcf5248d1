//! Serializable view of a game for renderers and agents

use serde::{Deserialize, Serialize};

use crate::field::Cell;
use crate::piece::Piece;
use crate::tetromino::{Color, TetrominoType};

/// The falling piece as a caller sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceView {
    pub kind: TetrominoType,
    /// Absolute (col, row) cells; rows above the field are negative
    pub cells: [(i32, i32); 4],
    pub color: Color,
}

impl From<&Piece> for PieceView {
    fn from(piece: &Piece) -> Self {
        Self {
            kind: piece.kind,
            cells: piece.cells(),
            color: piece.color(),
        }
    }
}

/// Everything observable about a game at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub width: usize,
    pub height: usize,
    /// Settled cells, top row first
    pub cells: Vec<Vec<Cell>>,
    /// None between a lock and the next spawn, and after game over
    pub current: Option<PieceView>,
    pub next: TetrominoType,
    pub score: u64,
    pub lines: u32,
    pub game_over: bool,
}
