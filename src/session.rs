//! A playing session: one live game, its RNG and the high-score file.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::engine::{GameState, Move, Score};
use crate::highscore::{HighScoreError, HighScoreStore};

/// What a single move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveReport {
    /// False when the move arrived after game over and was dropped.
    pub accepted: bool,
    pub changed: bool,
    pub gained: Score,
    pub game_over: bool,
    pub new_high_score: bool,
    /// The improved high score could not be written; the next improvement retries.
    pub save_failed: bool,
}

pub struct Session<R: Rng> {
    state: GameState,
    store: HighScoreStore,
    rng: R,
}

impl<R: Rng> Session<R> {
    /// Load the stored high score and start a game.
    pub fn open(store: HighScoreStore, mut rng: R) -> Result<Self, HighScoreError> {
        let high_score = store.load()?;
        info!(path = %store.path().display(), high_score, "loaded high score");
        let state = GameState::new(high_score, &mut rng);
        Ok(Session { state, store, rng })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn restart(&mut self) {
        self.state = self.state.restart(&mut self.rng);
        debug!(high_score = self.state.high_score, "restarted");
    }

    /// Apply a move and write the high score to disk when it improves.
    ///
    /// The in-memory state advances even if the write fails; the failure is
    /// logged and flagged in the report.
    pub fn handle(&mut self, direction: Move) -> MoveReport {
        let before = self.state;
        if before.game_over {
            debug!(%direction, "move ignored, game over");
            return MoveReport { game_over: true, ..MoveReport::default() };
        }
        let after = before.make_move(direction, &mut self.rng);
        self.state = after;
        let mut report = MoveReport {
            accepted: true,
            changed: after.board != before.board,
            gained: after.score - before.score,
            game_over: after.game_over,
            new_high_score: after.high_score > before.high_score,
            save_failed: false,
        };
        debug!(%direction, changed = report.changed, gained = report.gained, score = after.score, "move");
        if report.new_high_score {
            match self.store.save(after.high_score) {
                Ok(()) => info!(high_score = after.high_score, "saved new high score"),
                Err(e) => {
                    warn!(error = %e, "failed to save high score");
                    report.save_failed = true;
                }
            }
        }
        if report.game_over {
            info!(score = after.score, high_score = after.high_score, "game over");
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Board;
    use rand::{rngs::StdRng, SeedableRng};
    use tempfile::tempdir;

    fn open(dir: &std::path::Path, seed: u64) -> Session<StdRng> {
        let store = HighScoreStore::new(dir.join("highscore.txt"));
        Session::open(store, StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn opens_with_stored_high_score() {
        let dir = tempdir().unwrap();
        HighScoreStore::new(dir.path().join("highscore.txt")).save(300).unwrap();
        let s = open(dir.path(), 1);
        assert_eq!(s.state().high_score, 300);
        assert_eq!(s.state().score, 0);
    }

    #[test]
    fn malformed_store_fails_open() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("highscore.txt"), "lots").unwrap();
        let store = HighScoreStore::new(dir.path().join("highscore.txt"));
        assert!(Session::open(store, StdRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn persists_improvements_and_never_lowers() {
        let dir = tempdir().unwrap();
        let store = HighScoreStore::new(dir.path().join("highscore.txt"));
        let mut s = open(dir.path(), 77);
        let mut on_disk = 0;
        for i in 0..3_000 {
            if s.state().game_over {
                s.restart();
            }
            let report = s.handle(Move::ALL[i % 4]);
            let stored = store.load().unwrap();
            assert!(stored >= on_disk);
            if report.new_high_score {
                assert_eq!(stored, s.state().high_score);
            }
            on_disk = stored;
        }
        assert!(on_disk > 0);
        assert_eq!(on_disk, s.state().high_score);
    }

    #[test]
    fn moves_after_game_over_are_dropped() {
        let dir = tempdir().unwrap();
        let mut s = open(dir.path(), 5);
        let stuck = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]).unwrap();
        s.state = GameState::from_parts(stuck, 40, 40);
        let report = s.handle(Move::Left);
        assert!(!report.accepted);
        assert!(report.game_over);
        assert_eq!(s.state().board, stuck);
        s.restart();
        assert!(!s.state().game_over);
        assert_eq!(s.state().high_score, 40);
    }

    #[test]
    fn no_change_move_reports_nothing() {
        let dir = tempdir().unwrap();
        let mut s = open(dir.path(), 9);
        let b = Board::from_rows([[2, 0, 0, 0], [4, 0, 0, 0], [0; 4], [0; 4]]).unwrap();
        s.state = GameState::from_parts(b, 0, 0);
        let report = s.handle(Move::Left);
        assert!(report.accepted);
        assert!(!report.changed);
        assert_eq!(report.gained, 0);
        assert_eq!(s.state().board, b);
        assert!(!dir.path().join("highscore.txt").exists());
    }

    #[test]
    fn failed_save_still_reports_the_move() {
        let dir = tempdir().unwrap();
        let mut s = open(dir.path(), 13);
        // A directory in place of the score file makes every write fail.
        s.store = HighScoreStore::new(dir.path());
        let b = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
        s.state = GameState::from_parts(b, 0, 0);
        let report = s.handle(Move::Left);
        assert!(report.accepted);
        assert!(report.changed);
        assert_eq!(report.gained, 4);
        assert!(report.new_high_score);
        assert!(report.save_failed);
        assert_eq!((s.state().score, s.state().high_score), (4, 4));
    }

    #[test]
    fn failed_save_on_final_move_still_reports_game_over() {
        let dir = tempdir().unwrap();
        let mut s = open(dir.path(), 4);
        s.store = HighScoreStore::new(dir.path());
        // Right merges the 2s; the spawn lands at (0, 0) and a 2 there leaves no moves.
        let start = Board::from_rows([[2, 2, 16, 32], [8, 64, 2, 4], [2, 4, 8, 2], [4, 2, 4, 8]]).unwrap();
        s.state = GameState::from_parts(start, 0, 0);
        let report = s.handle(Move::Right);
        assert!(report.accepted);
        assert!(report.save_failed);
        assert_eq!(report.game_over, s.state().board.tile(0, 0) == 2);
        assert_eq!(report.game_over, s.state().game_over);
    }
}
