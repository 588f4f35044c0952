//! Best-score persistence: one decimal integer in a text file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::engine::Score;

#[derive(thiserror::Error, Debug)]
pub enum HighScoreError {
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed high score in {}: {contents:?} (fix or delete the file)", .path.display())]
    Malformed { path: PathBuf, contents: String },
}

/// File-backed high score. A missing file reads as 0.
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        HighScoreStore { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored score. Surrounding whitespace is ignored; anything
    /// that is not a non-negative decimal integer is an error.
    pub fn load(&self) -> Result<Score, HighScoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(source) => return Err(HighScoreError::Io { path: self.path.clone(), source }),
        };
        contents
            .trim()
            .parse::<Score>()
            .map_err(|_| HighScoreError::Malformed { path: self.path.clone(), contents })
    }

    /// Overwrite the file with `score`.
    pub fn save(&self, score: Score) -> Result<(), HighScoreError> {
        let io_err = |source| HighScoreError::Io { path: self.path.clone(), source };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&self.path, score.to_string()).map_err(io_err)
    }
}
