mod action;
pub mod invariants;
mod locations;
pub mod rules;
mod setup;
mod types;

pub use action::{
    AccusationPlan, ActionChoice, ActionKind, Ballot, DefenseResult, JuryVote, QuestionPlan,
    Reaction, ReactionEvent,
};
pub use locations::{Location, LocationError, LocationPack};
pub use setup::{MIN_PLAYERS, SeatSpec, SetupError, check_names, deal, deal_with_spy, validate_seats};
pub(crate) use types::OutcomeContext;
pub use types::{EarlyEnd, Outcome, Player, PlayerId, PlayerSecret, Turn, Winner};
