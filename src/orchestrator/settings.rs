//! Session rules: how long the game runs and which options are on.

use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Default number of question rounds.
pub const DEFAULT_ROUNDS: u32 = 9;

/// Rules for one session.
///
/// Every field has a default, so a partial TOML table is enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct GameRules {
    /// Round budget for the turn loop.
    #[getter(copy)]
    rounds: u32,
    /// Whether an asker may spend their turn on an accusation.
    #[getter(copy)]
    allow_early_vote: bool,
    /// Whether bystanders react after each question and answer.
    #[getter(copy)]
    reactions: bool,
    /// Seed for reproducible games; entropy when absent.
    #[getter(copy)]
    #[setters(strip_option)]
    seed: Option<u64>,
    /// Name of the first asker; uniformly random when absent or unknown.
    #[setters(strip_option)]
    first_asker: Option<String>,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            allow_early_vote: true,
            reactions: true,
            seed: None,
            first_asker: None,
        }
    }
}

impl GameRules {
    /// Creates rules with defaults.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }
}
