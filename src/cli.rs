//! Command-line interface for spyfall.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Spyfall - social deduction with AI, bot, and human players
#[derive(Parser, Debug)]
#[command(name = "spyfall")]
#[command(about = "Run Spyfall sessions between humans, LLM agents, and bots", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game described by a TOML config file
    Play {
        /// Path to the game config
        #[arg(short, long, default_value = "spyfall.toml")]
        config: PathBuf,

        /// Print the final outcome as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Watch an offline game between random bots
    Demo {
        /// Number of bots
        #[arg(short, long, default_value = "4")]
        players: usize,

        /// Round budget
        #[arg(short, long, default_value = "9")]
        rounds: u32,

        /// Seed for a reproducible game
        #[arg(long)]
        seed: Option<u64>,

        /// Disable mid-game accusations
        #[arg(long)]
        no_early_vote: bool,

        /// Print the final outcome as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// List the locations and roles in a pack
    Locations {
        /// TOML location pack; the classic pack when omitted
        #[arg(long)]
        pack: Option<PathBuf>,
    },
}
