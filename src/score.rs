//! Score tracking

use serde::{Deserialize, Serialize};

/// Points awarded per line removed in a single lock
pub const POINTS_PER_LINE: u64 = 100;

/// Running totals for one game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Total lines cleared
    pub lines: u32,
    /// Pieces written into the field
    pub pieces: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one lock event that removed `lines` rows
    /// Returns the points it earned
    pub fn add_lock(&mut self, lines: usize) -> u64 {
        let earned = lines as u64 * POINTS_PER_LINE;
        self.points += earned;
        self.lines += lines as u32;
        self.pieces += 1;
        earned
    }
}
