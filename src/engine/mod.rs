//! Engine module: the 4x4 board, move/merge ops and the per-game state.
//!
//! - `Board` is the grid of tile values with useful methods.
//! - `GameState` wraps a board with score, high score and the game-over flag.
//! - Free functions in `ops` back the `Board` methods and are exported for tooling.

pub mod game;
mod ops;
pub mod state;

pub use game::GameState;
pub use state::{Board, EngineError, Move, Row, Score, Tile, SIZE};

pub use ops::{
    can_move, count_empty, flip, get_highest_tile_val, insert_random_tile, merge_row, reverse_rows,
    shift, transpose,
};
