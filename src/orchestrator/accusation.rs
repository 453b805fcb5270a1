//! Mid-game accusations: defense, jury vote, and consequence.

use super::GameSession;
use crate::games::spyfall::rules::{conviction_threshold, find_by_name, is_convicted};
use crate::games::spyfall::{Ballot, EarlyEnd, PlayerId, Winner};
use anyhow::Result;
use tracing::{debug, info, instrument};

/// A convicted spy named the location anyway.
pub const REASON_CAUGHT_BUT_GUESSED: &str = "spy was caught but correctly guessed the location";
/// A convicted spy missed the location.
pub const REASON_CONVICTED_SPY: &str = "spy was convicted and failed to guess the location";
/// The jury convicted a civilian.
pub const REASON_CONVICTED_INNOCENT: &str = "civilians convicted an innocent";

impl GameSession {
    /// Resolves one accusation raised by `accuser`.
    ///
    /// Returns `Continue` for a void accusation or an acquittal, and the
    /// decided game after a conviction.
    #[instrument(skip(self))]
    pub(super) async fn run_accusation(&mut self, accuser: PlayerId) -> Result<EarlyEnd> {
        let a = accuser.index();
        let accuser_name = self.name_of(a);
        let plan = self.controllers[a]
            .accuse(&self.players, &self.transcript, &self.players[a])
            .await?;

        let accused = match find_by_name(&self.players, &plan.target_name) {
            Some(p) if p.id() != accuser => p.id(),
            _ => {
                self.events.log(format!(
                    "{} tried to accuse '{}', but no such other player is seated. The accusation is void.",
                    accuser_name, plan.target_name
                ));
                return Ok(EarlyEnd::Continue);
            }
        };
        let d = accused.index();
        let accused_name = self.name_of(d);
        self.events.log(format!(
            "{accuser_name} accuses {accused_name} of being the spy: {}",
            plan.reason
        ));

        let defense = self.controllers[d]
            .defend(&accuser_name, &plan.reason, &self.transcript, &self.players[d])
            .await?;
        self.events
            .log(format!("{accused_name} defends: {}", defense.defense));

        let yes = self
            .jury_vote(accuser, accused, &accuser_name, &accused_name, &defense.defense)
            .await?;
        let roster = self.players.len();
        self.events.log(format!(
            "Jury: {yes} of {roster} vote to convict ({} needed).",
            conviction_threshold(roster)
        ));

        if !is_convicted(yes, roster) {
            self.events
                .log(format!("{accused_name} is acquitted. Play continues."));
            return Ok(EarlyEnd::Continue);
        }

        if self.players[d].is_spy() {
            self.events
                .log(format!("{accused_name} is convicted, and was the spy!"));
            let guessed_right = self.resolve_spy_guess(true).await?;
            let end = if guessed_right {
                EarlyEnd::ended(Winner::Spy, REASON_CAUGHT_BUT_GUESSED)
            } else {
                EarlyEnd::ended(Winner::Civilians, REASON_CONVICTED_SPY)
            };
            Ok(end)
        } else {
            self.events.log(format!(
                "{accused_name} is convicted, but was innocent. {} was the spy.",
                self.spy().name()
            ));
            Ok(EarlyEnd::ended(Winner::Spy, REASON_CONVICTED_INNOCENT))
        }
    }

    /// Counts yes votes. The accuser's yes and the accused's no are fixed;
    /// every other player is polled in roster order.
    async fn jury_vote(
        &mut self,
        accuser: PlayerId,
        accused: PlayerId,
        accuser_name: &str,
        accused_name: &str,
        defense: &str,
    ) -> Result<usize> {
        // Accuser's fixed yes.
        let mut yes = 1;
        for index in 0..self.players.len() {
            if index == accuser.index() || index == accused.index() {
                continue;
            }
            let ballot = self.controllers[index]
                .vote_on_accusation(
                    accuser_name,
                    accused_name,
                    defense,
                    &self.transcript,
                    &self.players[index],
                )
                .await?;
            let juror = self.name_of(index);
            debug!(juror = %juror, vote = %ballot.vote, "Jury ballot");
            self.events
                .log(format!("  {juror} votes {}: {}", ballot.vote, ballot.reason));
            if ballot.vote == Ballot::Yes {
                yes += 1;
            }
        }
        info!(yes, roster = self.players.len(), "Jury vote counted");
        Ok(yes)
    }
}
