//! battlectl - inspect and resolve battle snapshots
//!
//! Reads a JSON battle snapshot and prints the requested view as JSON.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use battle_engine::combat::{
    calc_battle_result, calc_pool_cost, do_fast_forward, mask_battle, ActionCatalog, Battle,
    StaticCatalog,
};
use battle_engine::Config;
use chrono::Utc;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Battle snapshot inspection tool
#[derive(Parser, Debug)]
#[command(name = "battlectl", version, about = "Inspect and resolve battle snapshots")]
struct Args {
    /// Path to the JSON battle snapshot
    #[arg(short, long)]
    battle: PathBuf,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the current round
    Round,

    /// Show the battle as seen by one participant
    Mask {
        #[arg(long)]
        viewer: String,
    },

    /// Check whether a participant has left and compute its rewards.
    ///
    /// On exit the participant is marked as left and the snapshot file is
    /// rewritten, so a second run reports no outcome.
    Outcome {
        #[arg(long)]
        user: String,

        /// Seed for the reward roll
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Check whether the current round can be skipped
    FastForward {
        /// JSON action catalog
        #[arg(long)]
        actions: PathBuf,
    },

    /// Show the pool cost of an action for a participant
    Cost {
        /// JSON action catalog
        #[arg(long)]
        actions: PathBuf,

        #[arg(long)]
        action: String,

        #[arg(long)]
        user: String,
    },
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let raw = serde_json::to_string_pretty(value)?;
    std::fs::write(path, raw).with_context(|| format!("Failed to write {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut battle: Battle = read_json(&args.battle)?;
    let now = Utc::now();

    match args.command {
        Command::Round => {
            let round = battle.round_at(now, config.time_skew_ms)?;
            print_json(&round)?;
        }
        Command::Mask { viewer } => {
            print_json(&mask_battle(&battle, &viewer))?;
        }
        Command::Outcome { user, seed } => {
            let result = match seed {
                Some(seed) => {
                    calc_battle_result(&mut battle, &user, &mut StdRng::seed_from_u64(seed))?
                }
                None => calc_battle_result(&mut battle, &user, &mut rand::rng())?,
            };
            if result.is_some() {
                write_json(&args.battle, &battle)?;
            }
            print_json(&result)?;
        }
        Command::FastForward { actions } => {
            let catalog: StaticCatalog = read_json(&actions)?;
            let skip = do_fast_forward(&battle, &catalog, now)?;
            print_json(&serde_json::json!({ "fast_forward": skip }))?;
        }
        Command::Cost {
            actions,
            action,
            user,
        } => {
            let catalog: StaticCatalog = read_json(&actions)?;
            let action = catalog
                .find_action(&battle, &user, &action)
                .ok_or_else(|| anyhow!("Action {} not available to {}", action, user))?;
            let target = battle
                .user(&user)
                .ok_or_else(|| anyhow!("Unknown participant: {}", user))?;
            let effects = battle.active_user_effects(now, config.time_skew_ms)?;
            print_json(&calc_pool_cost(&action, &effects, target))?;
        }
    }

    Ok(())
}
