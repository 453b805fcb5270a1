//! Win resolution after the final vote.

use super::super::Winner;
use tracing::{info, instrument};

/// Spy named the location.
pub const REASON_SPY_GUESSED: &str = "correctly identified the location";
/// The final vote singled out the spy.
pub const REASON_SPY_CAUGHT: &str = "spy was caught";
/// Tie or wrong conviction.
pub const REASON_TOTAL_DECEPTION: &str = "total deception";

/// Decides the winner on the non-early-end path.
///
/// A correct spy guess wins regardless of the vote; otherwise the civilians
/// win only if the vote singled out the spy.
#[instrument]
pub fn resolve_winner(
    accused_name: Option<&str>,
    is_tie: bool,
    spy_name: &str,
    spy_guessed_right: bool,
) -> (Winner, &'static str) {
    let decision = if spy_guessed_right {
        (Winner::Spy, REASON_SPY_GUESSED)
    } else if !is_tie && accused_name == Some(spy_name) {
        (Winner::Civilians, REASON_SPY_CAUGHT)
    } else {
        (Winner::Spy, REASON_TOTAL_DECEPTION)
    };
    info!(winner = %decision.0, reason = decision.1, "Winner resolved");
    decision
}
