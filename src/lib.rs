//! Spyfall library - a social deduction game engine
//!
//! One player is secretly the spy; everyone else shares a location and holds
//! a distinct role there. Players question each other, may call accusations,
//! and finally vote, while the spy tries to name the location.
//!
//! # Architecture
//!
//! - **Games**: pure Spyfall domain (secrets, dealing, rules, invariants)
//! - **Orchestrator**: the session state machine driving turns, accusations,
//!   the final vote, and the spy's guess
//! - **Players**: the `PlayerController` trait with LLM, human, and bot seats
//! - **Events**: an injected sink carrying log lines and the outcome
//!
//! # Example
//!
//! ```no_run
//! use spyfall::{EventSink, GameRules, GameSession, LocationPack, Seat, SeatSpec, SimpleAi};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pack = LocationPack::classic();
//! let seats = ["Ava", "Ben", "Cleo", "Dev"]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, name)| {
//!         let bot = SimpleAi::new(*name, pack.location_names(), i as u64);
//!         Seat::new(SeatSpec::new(*name, false), Box::new(bot))
//!     })
//!     .collect();
//!
//! let session = GameSession::new(seats, &pack, GameRules::new(), EventSink::disabled())?;
//! let outcome = session.run().await?;
//! println!("{} win: {}", outcome.winner(), outcome.reason());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod events;
mod extract;
mod games;
mod llm_client;
mod orchestrator;
mod players;

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig, SeatConfig, SeatKind};

// Crate-level exports - Events
pub use events::{EventSink, GameEvent, GameInfo, SeatInfo};

// Crate-level exports - Field extraction
pub use extract::{extract_field, extract_optional};

// Crate-level exports - LLM client
pub use llm_client::{Completer, LlmClient, LlmConfig, LlmError, LlmProvider};

// Crate-level exports - Session
pub use orchestrator::{
    DEFAULT_ROUNDS, GameRules, GameSession, REASON_CAUGHT_BUT_GUESSED, REASON_CONVICTED_INNOCENT,
    REASON_CONVICTED_SPY, REASON_VOLUNTARY_RIGHT, REASON_VOLUNTARY_WRONG, Seat,
};

// Crate-level exports - Players
pub use players::{AgentPlayer, HumanPlayer, PlayerController, SimpleAi};

// Crate-level exports - Game types
pub use games::spyfall::{
    AccusationPlan, ActionChoice, ActionKind, Ballot, DefenseResult, EarlyEnd, JuryVote, Location,
    LocationError, LocationPack, MIN_PLAYERS, Outcome, Player, PlayerId, PlayerSecret,
    QuestionPlan, Reaction, ReactionEvent, SeatSpec, SetupError, Turn, Winner, check_names, deal,
    deal_with_spy, validate_seats,
};

// Crate-level exports - Rules and invariants
pub use games::spyfall::invariants::{
    Invariant, InvariantViolation, SecretUniqueness, TargetLegality, check as check_invariant,
};
pub use games::spyfall::rules::{
    REASON_SPY_CAUGHT, REASON_SPY_GUESSED, REASON_TOTAL_DECEPTION, TallyResult, TargetResolution,
    VoteTally, conviction_threshold, guess_matches, is_convicted, resolve_winner,
};
