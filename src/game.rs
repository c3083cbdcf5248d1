//! Core game state and logic

use std::fmt;
use std::str::FromStr;

use crate::GameError;
use crate::field::Field;
use crate::piece::Piece;
use crate::randomizer::{PieceSource, Randomizer};
use crate::score::Score;
use crate::snapshot::{PieceView, Snapshot};
use crate::tetromino::TetrominoType;

/// Where the controller is in the piece lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// A piece is on the field and accepts commands
    Falling,
    /// The last piece locked; the next command brings in the queued piece
    Spawning,
    /// A spawn was blocked. Terminal until [`Game::reset`]
    GameOver,
}

/// Commands a human adapter or an agent can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    /// Soft drop by one row, same as a gravity tick
    Down,
    Rotate,
    /// Hard drop
    Drop,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Left,
        Action::Right,
        Action::Down,
        Action::Rotate,
        Action::Drop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Down => "down",
            Action::Rotate => "rotate",
            Action::Drop => "drop",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown action `{name}`")]
pub struct ParseActionError {
    pub name: String,
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Action::ALL
            .into_iter()
            .find(|action| action.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ParseActionError {
                name: name.to_owned(),
            })
    }
}

/// The game controller
///
/// Every command runs to completion and either commits a transformed piece or
/// leaves the state untouched. Rejected shifts and rotations are silent
/// no-ops; a rejected downward move locks the piece instead. Once the game is
/// over, every command is a no-op.
pub struct Game {
    field: Field,
    /// None while spawning and after game over
    current_piece: Option<Piece>,
    next_piece: TetrominoType,
    source: Box<dyn PieceSource + Send>,
    score: Score,
    phase: Phase,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("field", &self.field)
            .field("current_piece", &self.current_piece)
            .field("next_piece", &self.next_piece)
            .field("score", &self.score)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Create a game dealing uniformly random pieces from OS entropy
    pub fn new(width: usize, height: usize) -> Result<Self, GameError> {
        Self::with_source(width, height, Randomizer::new())
    }

    /// Create a game whose piece order is fixed by `seed`
    pub fn with_seed(width: usize, height: usize, seed: u64) -> Result<Self, GameError> {
        Self::with_source(width, height, Randomizer::with_seed(seed))
    }

    /// Create a game pulling pieces from any source
    pub fn with_source<S>(width: usize, height: usize, source: S) -> Result<Self, GameError>
    where
        S: PieceSource + Send + 'static,
    {
        let field = Field::new(width, height)?;
        let mut source: Box<dyn PieceSource + Send> = Box::new(source);
        let next_piece = source.next_kind();
        let mut game = Self {
            field,
            current_piece: None,
            next_piece,
            source,
            score: Score::new(),
            phase: Phase::Spawning,
        };
        game.spawn();
        Ok(game)
    }

    /// Abandon the current game and start over on an empty field
    pub fn reset(&mut self) {
        self.field.clear();
        self.score = Score::new();
        self.current_piece = None;
        self.next_piece = self.source.next_kind();
        self.phase = Phase::Spawning;
        tracing::info!("game reset");
        self.spawn();
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn current_piece(&self) -> Option<&Piece> {
        self.current_piece.as_ref()
    }

    pub fn next_piece(&self) -> TetrominoType {
        self.next_piece
    }

    pub fn score(&self) -> u64 {
        self.score.points
    }

    pub fn lines_cleared(&self) -> u32 {
        self.score.lines
    }

    pub fn pieces_locked(&self) -> u32 {
        self.score.pieces
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Where the current piece would come to rest after a hard drop
    pub fn ghost_piece(&self) -> Option<Piece> {
        self.current_piece.map(|piece| self.landing(piece))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.field.width(),
            height: self.field.height(),
            cells: self.field.rows().map(|row| row.to_vec()).collect(),
            current: self.current_piece.as_ref().map(PieceView::from),
            next: self.next_piece,
            score: self.score.points,
            lines: self.score.lines,
            game_over: self.is_game_over(),
        }
    }

    /// Process an action
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Left => self.shift_left(),
            Action::Right => self.shift_right(),
            Action::Down => self.soft_drop(),
            Action::Rotate => self.rotate(),
            Action::Drop => self.hard_drop(),
        }
    }

    pub fn shift_left(&mut self) {
        self.shift(-1);
    }

    pub fn shift_right(&mut self) {
        self.shift(1);
    }

    /// Move down one row, or lock the piece if it cannot move
    pub fn soft_drop(&mut self) {
        let Some(piece) = self.active_piece() else {
            return;
        };
        let moved = piece.shifted(0, 1);
        if self.field.is_valid_placement(&moved) {
            self.current_piece = Some(moved);
        } else {
            self.lock_piece(piece);
        }
    }

    /// Drop as far as possible and lock immediately
    pub fn hard_drop(&mut self) {
        let Some(piece) = self.active_piece() else {
            return;
        };
        let landed = self.landing(piece);
        self.lock_piece(landed);
    }

    /// Turn one step; stays put when the turned piece does not fit
    pub fn rotate(&mut self) {
        let Some(piece) = self.active_piece() else {
            return;
        };
        let rotated = piece.rotated();
        if self.field.is_valid_placement(&rotated) {
            self.current_piece = Some(rotated);
        }
    }

    /// Gravity step. The caller owns the cadence
    pub fn tick(&mut self) {
        self.soft_drop();
    }

    fn shift(&mut self, d_col: i32) {
        let Some(piece) = self.active_piece() else {
            return;
        };
        let moved = piece.shifted(d_col, 0);
        if self.field.is_valid_placement(&moved) {
            self.current_piece = Some(moved);
        }
    }

    /// The piece a command should act on, spawning the queued one if needed
    fn active_piece(&mut self) -> Option<Piece> {
        if self.phase == Phase::Spawning {
            self.spawn();
        }
        match self.phase {
            Phase::Falling => self.current_piece,
            Phase::Spawning | Phase::GameOver => None,
        }
    }

    fn landing(&self, mut piece: Piece) -> Piece {
        loop {
            let moved = piece.shifted(0, 1);
            if !self.field.is_valid_placement(&moved) {
                return piece;
            }
            piece = moved;
        }
    }

    /// Bring the queued piece onto the field and draw a new one
    fn spawn(&mut self) {
        let piece = Piece::spawn(self.next_piece, self.field.width());
        self.next_piece = self.source.next_kind();

        if !self.field.is_valid_placement(&piece) {
            tracing::info!(
                kind = piece.kind.name(),
                score = self.score.points,
                lines = self.score.lines,
                "spawn blocked, game over"
            );
            self.current_piece = None;
            self.phase = Phase::GameOver;
            return;
        }

        tracing::debug!(kind = piece.kind.name(), "spawned piece");
        self.current_piece = Some(piece);
        self.phase = Phase::Falling;
    }

    /// Lock the piece, clear lines, score them and wait for the next spawn
    fn lock_piece(&mut self, piece: Piece) {
        let hidden = self.field.lock(&piece);
        let lines = self.field.clear_full_lines();
        let earned = self.score.add_lock(lines);

        tracing::debug!(
            kind = piece.kind.name(),
            col = piece.col,
            row = piece.row,
            hidden,
            lines,
            earned,
            "locked piece"
        );

        self.current_piece = None;
        self.phase = Phase::Spawning;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Cell;
    use crate::randomizer::Sequence;
    use crate::tetromino::Color;

    fn game_of(width: usize, height: usize, kinds: &[TetrominoType]) -> Game {
        Game::with_source(width, height, Sequence::new(kinds)).unwrap()
    }

    fn sorted_cells(piece: &Piece) -> Vec<(i32, i32)> {
        let mut cells = piece.cells().to_vec();
        cells.sort();
        cells
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            Game::new(0, 20),
            Err(GameError::InvalidDimensions { width: 0, height: 20 })
        ));
        assert!(Game::with_seed(10, 0, 1).is_err());
        assert!(Game::with_seed(i32::MAX as usize + 1, 20, 1).is_err());
    }

    #[test]
    fn test_new_game_has_valid_piece() {
        let game = Game::with_seed(10, 20, 3).unwrap();
        assert_eq!(game.phase(), Phase::Falling);
        let piece = game.current_piece().unwrap();
        assert!(game.field().is_valid_placement(piece));
        assert_eq!(piece.rotation, 0);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_next_piece_is_queued() {
        let game = game_of(10, 20, &[TetrominoType::T, TetrominoType::Z]);
        assert_eq!(game.current_piece().unwrap().kind, TetrominoType::T);
        assert_eq!(game.next_piece(), TetrominoType::Z);
    }

    #[test]
    fn test_shift_moves_piece() {
        let mut game = game_of(10, 20, &[TetrominoType::O]);
        let col = game.current_piece().unwrap().col;
        game.shift_left();
        assert_eq!(game.current_piece().unwrap().col, col - 1);
        game.shift_right();
        game.shift_right();
        assert_eq!(game.current_piece().unwrap().col, col + 1);
    }

    #[test]
    fn test_horizontal_i_stops_at_walls() {
        let mut game = game_of(10, 20, &[TetrominoType::I]);
        game.rotate();
        for _ in 0..10 {
            game.shift_left();
        }
        let left = *game.current_piece().unwrap();
        assert_eq!(sorted_cells(&left)[0].0, 0);
        game.shift_left();
        assert_eq!(*game.current_piece().unwrap(), left);

        for _ in 0..10 {
            game.shift_right();
        }
        let right = *game.current_piece().unwrap();
        assert_eq!(sorted_cells(&right)[3].0, 9);
        game.shift_right();
        assert_eq!(*game.current_piece().unwrap(), right);
        assert_eq!(game.phase(), Phase::Falling);
    }

    #[test]
    fn test_rotate_full_cycle_restores_piece() {
        for kind in TetrominoType::ALL {
            let mut game = game_of(10, 20, &[kind]);
            game.soft_drop();
            game.soft_drop();
            let start = *game.current_piece().unwrap();
            for _ in 0..kind.rotation_count() {
                game.rotate();
            }
            let end = game.current_piece().unwrap();
            assert_eq!(end.rotation, start.rotation);
            assert_eq!(end.cells(), start.cells());
        }
    }

    #[test]
    fn test_blocked_rotation_is_noop() {
        // Vertical I in column 0 of a 1-wide gap: turning flat would leave the field
        let mut game = game_of(10, 20, &[TetrominoType::I]);
        for _ in 0..10 {
            game.shift_left();
        }
        let before = *game.current_piece().unwrap();
        assert_eq!(sorted_cells(&before)[0].0, 0);
        game.rotate();
        assert_eq!(*game.current_piece().unwrap(), before);
        assert_eq!(game.score(), 0);
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_hard_drop_o_on_empty_field() {
        let mut game = game_of(10, 20, &[TetrominoType::O]);
        game.hard_drop();

        let color = Cell::Filled(TetrominoType::O.color());
        for (col, row) in [(4, 18), (5, 18), (4, 19), (5, 19)] {
            assert_eq!(game.field().get(col, row), Some(color));
        }
        assert_eq!(game.score(), 0);
        assert!(!game.is_game_over());
        assert_eq!(game.phase(), Phase::Spawning);
        assert!(game.current_piece().is_none());
    }

    #[test]
    fn test_command_after_lock_spawns_first() {
        let mut game = game_of(10, 20, &[TetrominoType::O, TetrominoType::T]);
        game.hard_drop();
        assert_eq!(game.next_piece(), TetrominoType::T);

        game.tick();
        let piece = game.current_piece().unwrap();
        assert_eq!(piece.kind, TetrominoType::T);
        // Spawned then moved one row
        assert_eq!(piece.row, crate::SPAWN_ROW + 1);
        assert_eq!(game.next_piece(), TetrominoType::O);
    }

    #[test]
    fn test_soft_drop_locks_on_floor() {
        let mut game = game_of(10, 6, &[TetrominoType::O]);
        // Rows 0-1 to rows 4-5 takes four moves
        for _ in 0..4 {
            game.soft_drop();
            assert_eq!(game.phase(), Phase::Falling);
        }
        game.soft_drop();
        assert_eq!(game.phase(), Phase::Spawning);
        assert_eq!(game.pieces_locked(), 1);
        assert!(game.field().get(4, 5).unwrap().is_filled());
    }

    #[test]
    fn test_hard_drop_on_resting_piece_still_locks() {
        let mut game = game_of(10, 2, &[TetrominoType::O]);
        // O spawns on rows 0-1, already touching the floor
        assert!(game.ghost_piece() == game.current_piece().copied());
        game.hard_drop();
        assert_eq!(game.pieces_locked(), 1);
        assert!(game.field().get(4, 1).unwrap().is_filled());
    }

    #[test]
    fn test_double_clear_scores_in_one_event() {
        let mut game = game_of(4, 6, &[TetrominoType::O]);
        game.shift_left();
        game.hard_drop();
        assert_eq!(game.score(), 0);

        // Next command spawns the second O, then shifts it
        game.shift_right();
        let piece = game.current_piece().unwrap();
        assert_eq!(sorted_cells(piece)[0].0, 2);
        game.hard_drop();

        assert_eq!(game.score(), 200);
        assert_eq!(game.lines_cleared(), 2);
        assert!(game.field().is_empty());
    }

    #[test]
    fn test_top_out() {
        let mut game = game_of(4, 4, &[TetrominoType::O]);
        // Stack O pieces in the middle until the spawn area is blocked
        for _ in 0..10 {
            game.hard_drop();
        }
        assert!(game.is_game_over());
        assert!(game.current_piece().is_none());

        let before = game.snapshot();
        for action in Action::ALL {
            game.apply(action);
        }
        game.tick();
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_spawn_blocked_at_construction() {
        // O needs two columns
        let game = game_of(1, 20, &[TetrominoType::O]);
        assert!(game.is_game_over());
    }

    #[test]
    fn test_reset() {
        let mut game = game_of(4, 4, &[TetrominoType::O]);
        for _ in 0..10 {
            game.hard_drop();
        }
        assert!(game.is_game_over());

        game.reset();
        assert!(!game.is_game_over());
        assert!(game.field().is_empty());
        assert_eq!(game.score(), 0);
        assert_eq!(game.pieces_locked(), 0);
        assert!(game.current_piece().is_some());
    }

    #[test]
    fn test_reset_draws_fresh_current_and_next() {
        use TetrominoType::{I, O, T};
        let mut game = game_of(10, 20, &[I, O, T]);
        assert_eq!(game.current_piece().unwrap().kind, I);
        assert_eq!(game.next_piece(), O);

        game.reset();
        assert_eq!(game.current_piece().unwrap().kind, T);
        assert_eq!(game.next_piece(), I);
        assert_eq!(game.phase(), Phase::Falling);
    }

    #[test]
    fn test_seeded_games_match() {
        let mut a = Game::with_seed(10, 20, 99).unwrap();
        let mut b = Game::with_seed(10, 20, 99).unwrap();
        for i in 0..200 {
            let action = Action::ALL[i % Action::ALL.len()];
            a.apply(action);
            b.apply(action);
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_lock_above_top_loses_hidden_cells() {
        let mut game = game_of(3, 3, &[TetrominoType::I]);
        // A vertical I spans rows -1..=2 at spawn on a 3-row field
        game.hard_drop();
        assert_eq!(game.pieces_locked(), 1);
        for row in 0..3 {
            assert!(game.field().get(1, row).unwrap().is_filled());
        }
        // The next I cannot enter
        game.tick();
        assert!(game.is_game_over());
    }

    #[test]
    fn test_snapshot_reports_piece() {
        let game = game_of(10, 20, &[TetrominoType::L]);
        let snapshot = game.snapshot();
        let current = snapshot.current.unwrap();
        assert_eq!(current.kind, TetrominoType::L);
        assert_eq!(current.color, Color::rgb(255, 165, 0));
        assert_eq!(snapshot.cells.len(), 20);
        assert!(!snapshot.game_over);
    }

    #[test]
    fn test_parse_action() {
        assert_eq!("left".parse::<Action>().unwrap(), Action::Left);
        assert_eq!(" Drop \n".parse::<Action>().unwrap(), Action::Drop);
        let err = "jump".parse::<Action>().unwrap_err();
        assert_eq!(err.to_string(), "unknown action `jump`");
        for action in Action::ALL {
            assert_eq!(action.to_string().parse::<Action>().unwrap(), action);
        }
    }
}
