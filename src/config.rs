use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Config {
    /// Where the best score is kept between sessions.
    #[serde(default = "defaults::high_score_file")]
    pub high_score_file: PathBuf,

    /// Fixed RNG seed. When absent the RNG is seeded from the OS.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Tracing filter, e.g. "info", "play_2048=debug".
    #[serde(default = "defaults::log")]
    pub log: String,

    #[serde(default)]
    pub simulate: Simulate,
}

/// Defaults for the `simulate` subcommand.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Simulate {
    #[serde(default = "defaults::games")]
    pub games: u64,
    #[serde(default = "defaults::max_moves")]
    pub max_moves: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            high_score_file: defaults::high_score_file(),
            seed: None,
            log: defaults::log(),
            simulate: Simulate::default(),
        }
    }
}

impl Default for Simulate {
    fn default() -> Self {
        Self { games: defaults::games(), max_moves: defaults::max_moves() }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io { path: path.to_path_buf(), source };
        let mut file = std::fs::File::open(path).map_err(io_err)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(io_err)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn high_score_file() -> PathBuf { PathBuf::from("highscore.txt") }
    pub fn log() -> String { "warn".to_string() }
    pub fn games() -> u64 { 100 }
    pub fn max_moves() -> u64 { 10_000 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn partial_sections_fill_in() {
        let cfg = Config::from_toml_str(
            r#"
            high_score_file = "/tmp/best.txt"
            seed = 42
            [simulate]
            games = 8
            "#,
        )
        .unwrap();
        assert_eq!(cfg.high_score_file, PathBuf::from("/tmp/best.txt"));
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.log, "warn");
        assert_eq!(cfg.simulate.games, 8);
        assert_eq!(cfg.simulate.max_moves, 10_000);
    }

    #[test]
    fn bad_types_are_rejected() {
        assert!(matches!(Config::from_toml_str("seed = \"soon\""), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_toml(dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
    }
}
