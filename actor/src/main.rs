//! Actor - Siege match runner
//!
//! A command-line process that:
//! 1. Builds two agents from their spec strings (random, greedy, mcts-*)
//! 2. Plays the configured number of games, swapping who moves first
//! 3. Appends each finished game to `<data_dir>/games.jsonl`
//! 4. Keeps a running win/draw tally in `<data_dir>/match_stats.json`

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

mod actor;
mod config;
mod mcts_policy;
mod policy;
mod stats;

use crate::actor::Actor;
use crate::config::Config;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    let actor = Arc::new(Actor::new(config)?);

    // Ctrl-C stops after the game in progress
    let shutdown_actor = Arc::clone(&actor);
    let shutdown_handle = tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received, finishing current game...");
                shutdown_actor.shutdown();
            }
            Err(e) => warn!("Failed to listen for ctrl+c: {}", e),
        }
    });

    let run_result = actor.run().await;
    shutdown_handle.abort();

    match run_result {
        Ok(snapshot) => {
            info!(
                "Match complete: {} {} - {} {} ({} draws, score {:.3})",
                snapshot.agents[0],
                snapshot.wins[0],
                snapshot.wins[1],
                snapshot.agents[1],
                snapshot.draws,
                snapshot.score()
            );
            Ok(())
        }
        Err(e) => {
            error!("Actor failed: {:#}", e);
            Err(e)
        }
    }
}
