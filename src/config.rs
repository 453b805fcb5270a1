//! Game configuration loaded from TOML.
//!
//! ```toml
//! rounds = 6
//! allow_early_vote = true
//!
//! [[players]]
//! name = "You"
//! kind = "human"
//!
//! [[players]]
//! name = "Ava"
//! kind = "ai"
//! llm_provider = "anthropic"
//! llm_model = "claude-3-5-haiku-latest"
//! ```

use crate::games::spyfall::{LocationPack, MIN_PLAYERS};
use crate::llm_client::{LlmConfig, LlmProvider};
use crate::orchestrator::GameRules;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Who sits in a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SeatKind {
    /// A person at the terminal.
    Human,
    /// A language-model agent.
    Ai,
    /// The offline random bot.
    Bot,
}

/// One `[[players]]` entry.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct SeatConfig {
    /// Display name.
    name: String,

    /// Controller kind.
    #[getter(copy)]
    kind: SeatKind,

    /// LLM provider (openai or anthropic); AI seats only.
    #[serde(default = "default_provider")]
    #[getter(copy)]
    llm_provider: LlmProvider,

    /// LLM model name.
    #[serde(default = "default_model")]
    llm_model: String,

    /// Maximum tokens for LLM responses.
    #[serde(default = "default_max_tokens")]
    #[getter(copy)]
    llm_max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    #[getter(copy)]
    llm_temperature: f32,
}

#[instrument]
fn default_provider() -> LlmProvider {
    LlmProvider::OpenAI
}

#[instrument]
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

#[instrument]
fn default_max_tokens() -> u32 {
    150
}

fn default_temperature() -> f32 {
    0.9
}

impl SeatConfig {
    /// Creates a seat with default LLM settings.
    #[instrument(skip(name), fields(seat = %name))]
    pub fn new(name: String, kind: SeatKind) -> Self {
        Self {
            name,
            kind,
            llm_provider: default_provider(),
            llm_model: default_model(),
            llm_max_tokens: default_max_tokens(),
            llm_temperature: default_temperature(),
        }
    }

    /// Creates LLM configuration for this seat.
    /// Requires OPENAI_API_KEY or ANTHROPIC_API_KEY environment variable.
    #[instrument(skip(self), fields(seat = %self.name, provider = %self.llm_provider, model = %self.llm_model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");
        let var = self.llm_provider.api_key_var();
        let api_key = std::env::var(var)
            .map_err(|_| ConfigError::new(format!("{} environment variable not set", var)))?;

        Ok(LlmConfig::new(
            self.llm_provider,
            api_key,
            self.llm_model.clone(),
            self.llm_max_tokens,
            self.llm_temperature,
        ))
    }
}

/// A whole game: rules, location pack, and seats.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Rules, read from the top-level table.
    #[serde(flatten)]
    rules: GameRules,

    /// Optional TOML location pack; the classic pack when absent.
    #[serde(default)]
    location_pack: Option<PathBuf>,

    /// Seats in roster order.
    players: Vec<SeatConfig>,
}

impl GameConfig {
    /// Creates a configuration from parts.
    pub fn new(rules: GameRules, location_pack: Option<PathBuf>, players: Vec<SeatConfig>) -> Self {
        Self {
            rules,
            location_pack,
            players,
        }
    }

    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        info!(
            players = config.players.len(),
            rounds = config.rules.rounds(),
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Checks the seat list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players.len() < MIN_PLAYERS {
            return Err(ConfigError::new(format!(
                "At least {} players are required, found {}",
                MIN_PLAYERS,
                self.players.len()
            )));
        }
        let humans = self
            .players
            .iter()
            .filter(|p| p.kind == SeatKind::Human)
            .count();
        if humans > 1 {
            return Err(ConfigError::new(format!(
                "Only one human seat is supported, found {}",
                humans
            )));
        }
        Ok(())
    }

    /// Loads the configured location pack.
    #[instrument(skip(self))]
    pub fn load_pack(&self) -> Result<LocationPack, ConfigError> {
        match &self.location_pack {
            Some(path) => LocationPack::from_file(path)
                .map_err(|e| ConfigError::new(format!("Failed to load location pack: {}", e))),
            None => Ok(LocationPack::classic()),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
