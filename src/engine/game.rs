use rand::Rng;

use super::state::{Board, Move, Score};

/// Full state of one game: board, running score, best score and the game-over flag.
///
/// `GameState` is a plain value. Operations consume it and return the next
/// state, so callers decide where it lives and when to persist anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub score: Score,
    pub high_score: Score,
    pub game_over: bool,
}

impl GameState {
    /// Start a fresh game with two spawned tiles.
    ///
    /// ```
    /// use play_2048::engine::GameState;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let g = GameState::new(512, &mut rng);
    /// assert_eq!(g.board.count_empty(), 14);
    /// assert_eq!((g.score, g.high_score, g.game_over), (0, 512, false));
    /// ```
    pub fn new<R: Rng + ?Sized>(high_score: Score, rng: &mut R) -> Self {
        GameState { board: Board::EMPTY, score: 0, high_score, game_over: false }.restart(rng)
    }

    /// Build a state around an existing board; `game_over` is derived from the board.
    pub fn from_parts(board: Board, score: Score, high_score: Score) -> Self {
        GameState { board, score, high_score, game_over: !board.can_move() }
    }

    /// Clear the board and score, keep the high score, spawn two tiles.
    pub fn restart<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        let board = Board::EMPTY.with_random_tile(rng).with_random_tile(rng);
        GameState { board, score: 0, high_score: self.high_score, game_over: false }
    }

    /// Spawn one tile into a random empty cell; no-op on a full board.
    pub fn spawn<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        GameState { board: self.board.with_random_tile(rng), ..self }
    }

    /// Apply a directional move.
    ///
    /// Ignored once the game is over. When the board changes, one tile is
    /// spawned and the high score follows the score upward. The game-over
    /// flag is recomputed afterwards.
    ///
    /// ```
    /// use play_2048::engine::{Board, GameState, Move};
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(5);
    /// let board = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// let g = GameState::from_parts(board, 0, 0).make_move(Move::Left, &mut rng);
    /// assert_eq!((g.score, g.high_score), (4, 4));
    /// assert_eq!(g.board.count_empty(), 14);
    /// ```
    pub fn make_move<R: Rng + ?Sized>(self, direction: Move, rng: &mut R) -> Self {
        if self.game_over {
            return self;
        }
        let (moved, gained) = self.board.shift(direction);
        let mut next = self;
        if moved != self.board {
            next.score += gained;
            next.board = moved.with_random_tile(rng);
            next.high_score = next.high_score.max(next.score);
        }
        next.game_over = !next.board.can_move();
        next
    }

    /// True while at least one move would change the board.
    #[inline]
    pub fn can_move(&self) -> bool {
        self.board.can_move()
    }
}
