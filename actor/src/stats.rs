//! Match statistics tracking and persistence.
//!
//! Tallies results per agent (not per colour, since seats swap every game)
//! and writes a JSON snapshot next to the game log.

use games_siege::{Outcome, Player};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, warn};

/// Running tally for a two-agent match, designed for lock-free updates.
#[derive(Debug)]
pub struct MatchStats {
    /// Agent specs, in configuration order
    agents: [String; 2],
    games_played: AtomicU32,
    wins: [AtomicU32; 2],
    draws: AtomicU32,
    /// Games won by whoever moved first
    first_mover_wins: AtomicU32,
    total_moves: AtomicU64,
    start_time: Instant,
    stats_path: PathBuf,
}

/// Serializable stats for JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStatsSnapshot {
    pub agents: [String; 2],
    pub games_played: u32,
    pub wins: [u32; 2],
    pub draws: u32,
    pub first_mover_wins: u32,
    pub total_moves: u64,
    pub avg_game_length: f64,
    pub games_per_second: f64,
    pub runtime_seconds: f64,
    pub timestamp: u64,
}

impl MatchStatsSnapshot {
    /// Agent 0's score in [0, 1], counting draws as half.
    pub fn score(&self) -> f64 {
        if self.games_played == 0 {
            return 0.5;
        }
        (self.wins[0] as f64 + 0.5 * self.draws as f64) / self.games_played as f64
    }
}

impl MatchStats {
    /// Create new stats tracker writing to `<data_dir>/match_stats.json`.
    ///
    /// Nothing touches the filesystem until [`MatchStats::write_stats`].
    pub fn new(data_dir: impl AsRef<Path>, agents: [String; 2]) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            agents,
            games_played: AtomicU32::new(0),
            wins: [AtomicU32::new(0), AtomicU32::new(0)],
            draws: AtomicU32::new(0),
            first_mover_wins: AtomicU32::new(0),
            total_moves: AtomicU64::new(0),
            start_time: Instant::now(),
            stats_path: data_dir.join("match_stats.json"),
        }
    }

    /// Record a finished game.
    ///
    /// `first` is the index of the agent that played Blue.
    pub fn record_game(&self, first: usize, moves: u32, outcome: Outcome) {
        self.games_played.fetch_add(1, Ordering::Relaxed);
        self.total_moves.fetch_add(moves as u64, Ordering::Relaxed);

        match outcome.winner() {
            Some(player) => {
                let agent = match player {
                    Player::Blue => first,
                    Player::Green => 1 - first,
                };
                self.wins[agent].fetch_add(1, Ordering::Relaxed);
                if player == Player::Blue {
                    self.first_mover_wins.fetch_add(1, Ordering::Relaxed);
                }
            }
            None => {
                self.draws.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Get a snapshot of current stats.
    pub fn snapshot(&self) -> MatchStatsSnapshot {
        let games = self.games_played.load(Ordering::Relaxed);
        let total_moves = self.total_moves.load(Ordering::Relaxed);
        let runtime = self.start_time.elapsed().as_secs_f64();

        let avg_game_length = if games > 0 {
            total_moves as f64 / games as f64
        } else {
            0.0
        };

        let games_per_second = if runtime > 0.0 {
            games as f64 / runtime
        } else {
            0.0
        };

        MatchStatsSnapshot {
            agents: self.agents.clone(),
            games_played: games,
            wins: [
                self.wins[0].load(Ordering::Relaxed),
                self.wins[1].load(Ordering::Relaxed),
            ],
            draws: self.draws.load(Ordering::Relaxed),
            first_mover_wins: self.first_mover_wins.load(Ordering::Relaxed),
            total_moves,
            avg_game_length,
            games_per_second,
            runtime_seconds: runtime,
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    /// Write stats to JSON file (atomic write-then-rename).
    pub fn write_stats(&self) {
        let snapshot = self.snapshot();

        let json = match serde_json::to_string_pretty(&snapshot) {
            Ok(j) => j,
            Err(e) => {
                warn!("Failed to serialize match stats: {}", e);
                return;
            }
        };

        if let Some(parent) = self.stats_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create data directory: {}", e);
                return;
            }
        }

        let temp_path = self.stats_path.with_extension("json.tmp");
        match fs::File::create(&temp_path) {
            Ok(mut file) => {
                if let Err(e) = file.write_all(json.as_bytes()) {
                    warn!("Failed to write match stats: {}", e);
                    return;
                }
            }
            Err(e) => {
                warn!("Failed to create temp stats file: {}", e);
                return;
            }
        }

        if let Err(e) = fs::rename(&temp_path, &self.stats_path) {
            warn!("Failed to rename stats file: {}", e);
            let _ = fs::remove_file(&temp_path);
            return;
        }

        debug!("Wrote match stats to {}", self.stats_path.display());
    }

    pub fn stats_path(&self) -> &Path {
        &self.stats_path
    }
}
