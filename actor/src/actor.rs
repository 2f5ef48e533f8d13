//! Match runner: plays configured agents against each other

use anyhow::{anyhow, Context, Result};
use games_siege::{Board, GameRecord, Outcome, Player};
use indicatif::{ProgressBar, ProgressStyle};
use mcts::{UniformPolicyValue, Variant};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{
    atomic::{AtomicBool, AtomicU32, Ordering},
    Arc, Mutex,
};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::policy::{AgentSettings, AgentSpec, Policy};
use crate::stats::{MatchStats, MatchStatsSnapshot};

type Seats = [Box<dyn Policy>; 2];

/// Play one game to completion on the calling thread.
///
/// `first` is the index of the seat that plays Blue and moves first.
pub fn play_game(seats: &mut Seats, first: usize, board_len: usize) -> Result<(GameRecord, Outcome)> {
    let mut board = Board::new(board_len)?;
    let mut record = GameRecord::new(board_len)
        .with_players([seats[first].name().to_string(), seats[1 - first].name().to_string()]);

    let outcome = loop {
        if let Some(outcome) = board.outcome() {
            break outcome;
        }

        let seat = match board.active_player() {
            Player::Blue => first,
            Player::Green => 1 - first,
        };
        let action = seats[seat].select_action(&board).with_context(|| {
            format!(
                "{} failed to choose a move at step {}",
                seats[seat].name(),
                board.step_count()
            )
        })?;
        board
            .do_action(action)
            .with_context(|| format!("{} chose illegal action {}", seats[seat].name(), action))?;
        record.push(action);
    };

    record.set_outcome(outcome);
    Ok((record, outcome))
}

/// Append one record as a JSON line, creating the file if needed.
pub fn append_record(path: &Path, record: &GameRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let line = record.to_json()?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    writeln!(file, "{}", line)?;
    Ok(())
}

pub struct Actor {
    config: Config,
    specs: [AgentSpec; 2],
    seats: Arc<Mutex<Seats>>,
    stats: MatchStats,
    game_count: AtomicU32,
    shutdown_signal: AtomicBool,
}

impl Actor {
    pub fn new(config: Config) -> Result<Self> {
        let specs: [AgentSpec; 2] = [
            config
                .blue
                .parse()
                .with_context(|| format!("Invalid blue agent '{}'", config.blue))?,
            config
                .green
                .parse()
                .with_context(|| format!("Invalid green agent '{}'", config.green))?,
        ];

        if specs.contains(&AgentSpec::Mcts(Variant::Learned)) {
            warn!("No policy/value model is loaded; mcts-learned uses uniform priors and a neutral value");
        }

        let settings = AgentSettings {
            mcts: config.mcts_config(),
            territory_fn: config.territory_fn(),
            model: Arc::new(UniformPolicyValue::new()),
        };

        // Each agent gets its own RNG stream
        let seats: Seats = [
            specs[0].build(&settings, config.seed),
            specs[1].build(&settings, config.seed.wrapping_add(1)),
        ];

        info!(
            blue = %specs[0],
            green = %specs[1],
            board_size = config.board_size,
            num_simulations = config.num_simulations,
            c_puct = config.c_puct,
            "Match configured"
        );

        let stats = MatchStats::new(&config.data_dir, [specs[0].to_string(), specs[1].to_string()]);

        Ok(Self {
            config,
            specs,
            seats: Arc::new(Mutex::new(seats)),
            stats,
            game_count: AtomicU32::new(0),
            shutdown_signal: AtomicBool::new(false),
        })
    }

    pub async fn run(&self) -> Result<MatchStatsSnapshot> {
        info!(
            games = self.config.games,
            record = !self.config.no_record,
            stats_path = %self.stats.stats_path().display(),
            "Actor starting match"
        );

        // Progress bar only when stderr is a TTY
        let progress = if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
            let pb = ProgressBar::new(self.config.games as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} games ({eta})")?
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let games_path = self.config.games_path();

        for game in 0..self.config.games {
            if self.shutdown_signal.load(Ordering::Relaxed) {
                info!("Shutdown signal received, stopping match");
                break;
            }

            // Seats swap every game
            let first = (game % 2) as usize;
            let game_start = Instant::now();
            let (record, outcome) = match self.run_game(first).await {
                Ok(result) => result,
                Err(e) => {
                    error!("Game {} failed: {:#}", game + 1, e);
                    return Err(e);
                }
            };

            let count = self.game_count.fetch_add(1, Ordering::Relaxed) + 1;
            self.stats
                .record_game(first, record.moves.len() as u32, outcome);
            debug!(
                game = count,
                first = %self.specs[first],
                moves = record.moves.len(),
                result = %outcome,
                duration = game_start.elapsed().as_secs_f64(),
                "Game completed"
            );

            if !self.config.no_record {
                append_record(&games_path, &record)?;
                self.stats.write_stats();
            }

            if let Some(ref pb) = progress {
                pb.inc(1);
            }

            if self.config.log_interval > 0 && count % self.config.log_interval == 0 {
                let snapshot = self.stats.snapshot();
                let log = || {
                    info!(
                        games = snapshot.games_played,
                        "{} {} - {} {} ({} draws)",
                        self.specs[0],
                        snapshot.wins[0],
                        snapshot.wins[1],
                        self.specs[1],
                        snapshot.draws
                    )
                };
                // Suspend progress bar while logging to avoid visual glitches
                match progress {
                    Some(ref pb) => pb.suspend(log),
                    None => log(),
                }
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message("done");
        }

        let snapshot = self.stats.snapshot();
        info!(
            games = snapshot.games_played,
            wins_blue_agent = snapshot.wins[0],
            wins_green_agent = snapshot.wins[1],
            draws = snapshot.draws,
            first_mover_wins = snapshot.first_mover_wins,
            avg_game_length = format!("{:.1}", snapshot.avg_game_length),
            "Match finished"
        );
        Ok(snapshot)
    }

    pub fn shutdown(&self) {
        self.shutdown_signal.store(true, Ordering::Relaxed);
        info!("Shutdown signal set");
    }

    /// Play one game on a blocking worker so the runtime stays responsive.
    async fn run_game(&self, first: usize) -> Result<(GameRecord, Outcome)> {
        let seats = Arc::clone(&self.seats);
        let board_len = self.config.board_size;

        tokio::task::spawn_blocking(move || {
            let mut seats = seats
                .lock()
                .map_err(|e| anyhow!("Agent lock poisoned: {}", e))?;
            play_game(&mut seats, first, board_len)
        })
        .await
        .context("Game worker panicked")?
    }

    /// Get current game count (for testing)
    #[cfg(test)]
    pub fn game_count(&self) -> u32 {
        self.game_count.load(Ordering::Relaxed)
    }
}
