//! play-2048: a 2048 game engine with a terminal front-end
//!
//! This crate provides:
//! - A `Board` value type with move/merge, spawn and query methods (`engine`)
//! - `GameState`, the per-game value carrying score, best score and the game-over flag
//! - High-score persistence to a plain text file (`highscore`)
//! - A `Session` tying a game to its RNG and score file (`session`)
//! - TOML configuration (`config`) and random-policy self-play (`simulate`)
//!
//! Quick start:
//! ```
//! use play_2048::engine::{GameState, Move};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic game with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut game = GameState::new(0, &mut rng);
//! for dir in [Move::Left, Move::Up, Move::Right, Move::Down] {
//!     game = game.make_move(dir, &mut rng);
//! }
//! assert!(game.high_score >= game.score);
//! ```
//!
//! Moves never touch the filesystem. `session::Session` is the layer that
//! writes the high score back when a move improves it.
//!
pub mod config;
pub mod engine;
pub mod highscore;
pub mod session;
pub mod simulate;
