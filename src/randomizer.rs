//! Piece generation
//!
//! The controller pulls kinds from a [`PieceSource`]. [`Randomizer`] draws
//! each kind uniformly and independently from a seedable generator, so equal
//! seeds deal equal games. [`Sequence`] deals a fixed cycle for scripted play.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::tetromino::TetrominoType;

/// Supplies the kind of every piece entering the field
pub trait PieceSource {
    fn next_kind(&mut self) -> TetrominoType;
}

impl<F> PieceSource for F
where
    F: FnMut() -> TetrominoType,
{
    fn next_kind(&mut self) -> TetrominoType {
        self()
    }
}

/// Uniform random piece generator
#[derive(Debug, Clone)]
pub struct Randomizer {
    rng: ChaCha8Rng,
}

impl Default for Randomizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Randomizer {
    /// Create a randomizer seeded from the OS entropy source
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Create a reproducible randomizer
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl PieceSource for Randomizer {
    fn next_kind(&mut self) -> TetrominoType {
        TetrominoType::ALL[self.rng.gen_range(0..TetrominoType::ALL.len())]
    }
}

/// Deals a fixed list of kinds, starting over when it runs out
#[derive(Debug, Clone)]
pub struct Sequence {
    kinds: Vec<TetrominoType>,
    position: usize,
}

impl Sequence {
    /// # Panics
    ///
    /// Panics if `kinds` is empty.
    pub fn new(kinds: &[TetrominoType]) -> Self {
        assert!(!kinds.is_empty(), "a piece sequence needs at least one kind");
        Self {
            kinds: kinds.to_vec(),
            position: 0,
        }
    }
}

impl PieceSource for Sequence {
    fn next_kind(&mut self) -> TetrominoType {
        let kind = self.kinds[self.position];
        self.position = (self.position + 1) % self.kinds.len();
        kind
    }
}
