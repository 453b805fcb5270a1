//! Game rules for Spyfall.
//!
//! Pure functions over players, names, and counts. The orchestrator
//! composes them; none of them talk to controllers.

pub mod guess;
pub mod majority;
pub mod tally;
pub mod targets;
pub mod win;

pub use guess::guess_matches;
pub use majority::{conviction_threshold, is_convicted};
pub use tally::{TallyResult, VoteTally};
pub use targets::{
    TargetResolution, find_by_name, legal_targets, normalize_name, others, resolve_question_target,
    resolve_vote_target,
};
pub use win::{REASON_SPY_CAUGHT, REASON_SPY_GUESSED, REASON_TOTAL_DECEPTION, resolve_winner};
