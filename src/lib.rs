//! Falling-block puzzle engine
//!
//! The engine owns the playing field, the falling piece and the score, and
//! nothing else: it draws nothing, reads no input and keeps no clock. A caller
//! drives it with discrete commands ([`Game::shift_left`], [`Game::rotate`],
//! [`Game::hard_drop`], [`Game::tick`], ...) and reads the state back after
//! each one. Keyboard adapters and scripted agents drive it the same way,
//! usually through [`Game::apply`].
//!
//! # Example
//!
//! ```
//! use tetris_core::{Action, Game, Sequence, TetrominoType};
//!
//! let mut game = Game::with_source(10, 20, Sequence::new(&[TetrominoType::O])).unwrap();
//! game.apply(Action::Left);
//! game.apply(Action::Drop);
//!
//! assert_eq!(game.score(), 0);
//! assert!(!game.is_game_over());
//! ```
//!
//! All state lives in one [`Game`] value. Nothing inside is synchronized, so a
//! multi-threaded host wraps the whole game in a mutex and holds it for the
//! duration of each command.

pub mod field;
pub mod game;
pub mod piece;
pub mod randomizer;
pub mod score;
pub mod snapshot;
pub mod tetromino;

pub use field::{Cell, Field};
pub use game::{Action, Game, ParseActionError, Phase};
pub use piece::{Piece, SPAWN_ROW};
pub use randomizer::{PieceSource, Randomizer, Sequence};
pub use score::{POINTS_PER_LINE, Score};
pub use snapshot::{PieceView, Snapshot};
pub use tetromino::{Color, Pattern, TetrominoType};

/// Reasons a game cannot be constructed
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GameError {
    #[display("field dimensions must be positive and fit in i32, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
}
