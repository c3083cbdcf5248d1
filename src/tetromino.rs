//! Tetromino definitions and shapes
//!
//! The seven tetrominoes with their rotation states, each drawn on a 5x5
//! pattern. Advancing the rotation index always turns the piece one step in
//! the same direction.

use serde::{Deserialize, Serialize};

/// Side length of every rotation pattern
pub const PATTERN_SIZE: usize = 5;

/// Local cell that sits on the piece anchor, as (col, row) inside the pattern
pub const PATTERN_ORIGIN: (i32, i32) = (2, 4);

/// An RGB color tag carried by settled cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// One rotation state: row bitmasks, the leftmost column is the high bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern([u8; PATTERN_SIZE]);

impl Pattern {
    /// Whether the local cell at (col, row) is filled
    pub const fn is_filled(&self, col: usize, row: usize) -> bool {
        if col >= PATTERN_SIZE || row >= PATTERN_SIZE {
            return false;
        }
        self.0[row] & (0b10000 >> col) != 0
    }

    /// Filled local cells as (col, row), top to bottom, left to right
    pub fn filled(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..PATTERN_SIZE).flat_map(move |row| {
            (0..PATTERN_SIZE)
                .filter(move |&col| self.is_filled(col, row))
                .map(move |col| (col, row))
        })
    }
}

const I_STATES: [Pattern; 2] = [
    Pattern([0b00000, 0b00100, 0b00100, 0b00100, 0b00100]),
    Pattern([0b00000, 0b00000, 0b00000, 0b11110, 0b00000]),
];

const J_STATES: [Pattern; 4] = [
    Pattern([0b00000, 0b00000, 0b01000, 0b01110, 0b00000]),
    Pattern([0b00000, 0b00110, 0b00100, 0b00100, 0b00000]),
    Pattern([0b00000, 0b00000, 0b01110, 0b00010, 0b00000]),
    Pattern([0b00000, 0b00100, 0b00100, 0b01100, 0b00000]),
];

const L_STATES: [Pattern; 4] = [
    Pattern([0b00000, 0b00000, 0b00010, 0b01110, 0b00000]),
    Pattern([0b00000, 0b00100, 0b00100, 0b00110, 0b00000]),
    Pattern([0b00000, 0b00000, 0b01110, 0b01000, 0b00000]),
    Pattern([0b00000, 0b01100, 0b00100, 0b00100, 0b00000]),
];

const O_STATES: [Pattern; 1] = [Pattern([0b00000, 0b00000, 0b01100, 0b01100, 0b00000])];

const S_STATES: [Pattern; 2] = [
    Pattern([0b00000, 0b00000, 0b00110, 0b01100, 0b00000]),
    Pattern([0b00000, 0b00100, 0b00110, 0b00010, 0b00000]),
];

const T_STATES: [Pattern; 4] = [
    Pattern([0b00000, 0b00000, 0b00100, 0b01110, 0b00000]),
    Pattern([0b00000, 0b00100, 0b00110, 0b00100, 0b00000]),
    Pattern([0b00000, 0b00000, 0b01110, 0b00100, 0b00000]),
    Pattern([0b00000, 0b00100, 0b01100, 0b00100, 0b00000]),
];

const Z_STATES: [Pattern; 2] = [
    Pattern([0b00000, 0b00000, 0b01100, 0b00110, 0b00000]),
    Pattern([0b00000, 0b00100, 0b01100, 0b01000, 0b00000]),
];

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TetrominoType {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl TetrominoType {
    /// All kinds, in catalog order
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::J,
        TetrominoType::L,
        TetrominoType::O,
        TetrominoType::S,
        TetrominoType::T,
        TetrominoType::Z,
    ];

    /// Get the color tag for this tetromino
    pub const fn color(self) -> Color {
        match self {
            TetrominoType::I => Color::rgb(0, 255, 255),
            TetrominoType::J => Color::rgb(0, 0, 255),
            TetrominoType::L => Color::rgb(255, 165, 0),
            TetrominoType::O => Color::rgb(255, 255, 0),
            TetrominoType::S => Color::rgb(0, 255, 0),
            TetrominoType::T => Color::rgb(128, 0, 128),
            TetrominoType::Z => Color::rgb(255, 0, 0),
        }
    }

    /// Rotation states in turning order
    pub const fn rotations(self) -> &'static [Pattern] {
        match self {
            TetrominoType::I => &I_STATES,
            TetrominoType::J => &J_STATES,
            TetrominoType::L => &L_STATES,
            TetrominoType::O => &O_STATES,
            TetrominoType::S => &S_STATES,
            TetrominoType::T => &T_STATES,
            TetrominoType::Z => &Z_STATES,
        }
    }

    pub const fn rotation_count(self) -> usize {
        self.rotations().len()
    }

    /// Pattern for a rotation index, taken modulo the number of states
    pub const fn pattern(self, rotation: usize) -> &'static Pattern {
        let states = self.rotations();
        &states[rotation % states.len()]
    }

    pub const fn name(self) -> &'static str {
        match self {
            TetrominoType::I => "I",
            TetrominoType::J => "J",
            TetrominoType::L => "L",
            TetrominoType::O => "O",
            TetrominoType::S => "S",
            TetrominoType::T => "T",
            TetrominoType::Z => "Z",
        }
    }
}
