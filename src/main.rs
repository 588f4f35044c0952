use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use play_2048::config::Config;
use play_2048::engine::Move;
use play_2048::highscore::HighScoreStore;
use play_2048::session::Session;
use play_2048::simulate;
use rand::{rngs::StdRng, SeedableRng};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "play-2048", about = "Play 2048 in the terminal")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Tracing filter, e.g. "info", "debug" (overrides the config file)
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Interactive game reading one command per line from stdin
    Play {
        /// File holding the best score
        #[arg(long)]
        high_score_file: Option<PathBuf>,
        /// Fixed RNG seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play random-move games and report score statistics
    Simulate {
        /// Number of games
        #[arg(long)]
        games: Option<u64>,
        /// Seed of the first game; game i uses seed + i
        #[arg(long)]
        seed: Option<u64>,
        /// Stop each game after this many board-changing moves
        #[arg(long)]
        max_moves: Option<u64>,
        /// Spread games across all cores
        #[arg(long)]
        parallel: bool,
        /// Suppress the progress bar
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::from_toml(path)?,
        None => Config::default(),
    };

    let filter = args.log.clone().unwrap_or_else(|| config.log.clone());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match args.cmd.unwrap_or(Cmd::Play { high_score_file: None, seed: None }) {
        Cmd::Play { high_score_file, seed } => {
            let path = high_score_file.unwrap_or_else(|| config.high_score_file.clone());
            let rng = match seed.or(config.seed) {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_entropy(),
            };
            play(HighScoreStore::new(path), rng)
        }
        Cmd::Simulate { games, seed, max_moves, parallel, quiet } => {
            let games = games.unwrap_or(config.simulate.games);
            let seed = seed.or(config.seed).unwrap_or(0);
            let max_moves = max_moves.unwrap_or(config.simulate.max_moves);
            run_simulation(games, seed, max_moves, parallel, quiet)
        }
    }
}

const HELP: &str = "moves: w/a/s/d, h/j/k/l or up/down/left/right | n: new game | q: quit";

fn play(store: HighScoreStore, rng: StdRng) -> Result<()> {
    let mut session = Session::open(store, rng).context("failed to load high score")?;
    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    writeln!(out, "{HELP}")?;
    render(&mut out, &session)?;

    for line in stdin.lock().lines() {
        let line = line?;
        let cmd = line.trim();
        match cmd.to_ascii_lowercase().as_str() {
            "" => continue,
            "q" | "quit" => break,
            "n" | "new" => session.restart(),
            _ => match cmd.parse::<Move>() {
                Ok(direction) => {
                    let report = session.handle(direction);
                    if report.save_failed {
                        writeln!(out, "Warning: could not save the high score (see log).")?;
                    }
                    if !report.accepted && report.game_over {
                        writeln!(out, "Game over. Type n for a new game.")?;
                        continue;
                    }
                    if report.game_over {
                        render(&mut out, &session)?;
                        let state = session.state();
                        writeln!(out, "Game over! Final score: {} | Best: {}", state.score, state.high_score)?;
                        continue;
                    }
                }
                Err(_) => {
                    writeln!(out, "{HELP}")?;
                    continue;
                }
            },
        }
        render(&mut out, &session)?;
    }
    Ok(())
}

fn render<W: Write, R: rand::Rng>(out: &mut W, session: &Session<R>) -> io::Result<()> {
    let state = session.state();
    writeln!(out, "{}", state.board)?;
    writeln!(out, "Score: {} | Best: {}", state.score, state.high_score)?;
    out.flush()
}

fn run_simulation(games: u64, seed: u64, max_moves: u64, parallel: bool, quiet: bool) -> Result<()> {
    let pb = if !quiet {
        let pb = ProgressBar::new(games);
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} [{bar:40}] {pos}/{len} games | {msg}")?
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let results = simulate::simulate(games, seed, Some(max_moves), parallel, |summary| {
        if let Some(pb) = &pb {
            pb.inc(1);
            pb.set_message(format!("last score: {}", summary.score));
        }
    });
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    match simulate::aggregate(&results) {
        Some(agg) => println!(
            "Games: {} | mean score: {:.1} | max score: {} | mean moves: {:.1} | highest tile: {}",
            agg.games, agg.mean_score, agg.max_score, agg.mean_moves, agg.highest_tile
        ),
        None => println!("No games played"),
    }
    Ok(())
}
