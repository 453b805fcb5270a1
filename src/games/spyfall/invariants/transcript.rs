//! Invariant: nobody questions themself or the player who just asked them.

use super::Invariant;
use crate::games::spyfall::Turn;
use tracing::{instrument, warn};

/// For every turn, the target is not the asker and, when a previous turn
/// exists, not the previous turn's asker.
pub struct TargetLegality;

impl Invariant<[Turn]> for TargetLegality {
    #[instrument(skip(turns), fields(count = turns.len()))]
    fn holds(turns: &[Turn]) -> bool {
        for (i, turn) in turns.iter().enumerate() {
            if turn.target_id() == turn.asker_id() {
                warn!(index = i, asker = %turn.asker_id(), "Player questioned themself");
                return false;
            }
            if i > 0 && turns[i - 1].asker_id() == turn.target_id() {
                warn!(index = i, target = %turn.target_id(), "Questioned the previous asker");
                return false;
            }
        }
        true
    }

    fn description() -> &'static str {
        "targets are never the asker nor the previous asker"
    }
}
