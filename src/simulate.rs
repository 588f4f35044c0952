//! Random-policy self-play, used as a smoke test of the engine and for benchmarking.

use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

use crate::engine::{GameState, Move, Score, Tile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub seed: u64,
    /// Moves that changed the board.
    pub moves: u64,
    pub score: Score,
    pub highest_tile: Tile,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aggregate {
    pub games: usize,
    pub mean_score: f64,
    pub max_score: Score,
    pub mean_moves: f64,
    pub highest_tile: Tile,
}

/// Play one game choosing uniformly random directions until game over or
/// `max_moves` board-changing moves.
///
/// ```
/// use play_2048::simulate::play_random_game;
/// let a = play_random_game(7, None);
/// assert_eq!(a, play_random_game(7, None));
/// assert!(a.highest_tile >= 4);
/// ```
pub fn play_random_game(seed: u64, max_moves: Option<u64>) -> GameSummary {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = GameState::new(0, &mut rng);
    let mut moves = 0;
    while !state.game_over {
        if max_moves.is_some_and(|cap| moves >= cap) {
            break;
        }
        let direction = Move::ALL[rng.gen_range(0..Move::ALL.len())];
        let next = state.make_move(direction, &mut rng);
        if next.board != state.board {
            moves += 1;
        }
        state = next;
    }
    GameSummary { seed, moves, score: state.score, highest_tile: state.board.highest_tile() }
}

/// Play `games` games seeded `base_seed..base_seed + games`, optionally across
/// the rayon pool. Results come back in seed order; `on_done` fires once per game.
pub fn simulate<F>(games: u64, base_seed: u64, max_moves: Option<u64>, parallel: bool, on_done: F) -> Vec<GameSummary>
where
    F: Fn(&GameSummary) + Sync,
{
    let run = |i: u64| {
        let summary = play_random_game(base_seed.wrapping_add(i), max_moves);
        on_done(&summary);
        summary
    };
    if parallel {
        (0..games).into_par_iter().map(run).collect()
    } else {
        (0..games).map(run).collect()
    }
}

/// Summarise a batch of games. `None` for an empty batch.
pub fn aggregate(results: &[GameSummary]) -> Option<Aggregate> {
    if results.is_empty() {
        return None;
    }
    let n = results.len() as f64;
    Some(Aggregate {
        games: results.len(),
        mean_score: results.iter().map(|r| r.score as f64).sum::<f64>() / n,
        max_score: results.iter().map(|r| r.score).max().unwrap_or(0),
        mean_moves: results.iter().map(|r| r.moves as f64).sum::<f64>() / n,
        highest_tile: results.iter().map(|r| r.highest_tile).max().unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn random_game_reaches_game_over() {
        let s = play_random_game(1, None);
        assert!(s.moves > 0);
        assert!(s.score > 0);
        assert!(s.highest_tile.is_power_of_two());
    }

    #[test]
    fn move_cap_is_respected() {
        let s = play_random_game(3, Some(5));
        assert_eq!(s.moves, 5);
    }

    #[test]
    fn parallel_matches_sequential() {
        let seq = simulate(16, 100, Some(200), false, |_| {});
        let done = AtomicU64::new(0);
        let par = simulate(16, 100, Some(200), true, |_| {
            done.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(seq, par);
        assert_eq!(done.load(Ordering::Relaxed), 16);
        assert_eq!(par.iter().map(|s| s.seed).collect::<Vec<_>>(), (100..116).collect::<Vec<_>>());
    }

    #[test]
    fn aggregates() {
        assert!(aggregate(&[]).is_none());
        let rs = [
            GameSummary { seed: 0, moves: 10, score: 100, highest_tile: 16 },
            GameSummary { seed: 1, moves: 30, score: 300, highest_tile: 64 },
        ];
        let a = aggregate(&rs).unwrap();
        assert_eq!(a.games, 2);
        assert_eq!(a.mean_score, 200.0);
        assert_eq!(a.max_score, 300);
        assert_eq!(a.mean_moves, 20.0);
        assert_eq!(a.highest_tile, 64);
    }
}
