//! End-of-rounds vote.

use super::GameSession;
use crate::extract::extract_field;
use crate::games::spyfall::rules::{TallyResult, VoteTally, resolve_vote_target};
use anyhow::{Result, anyhow};
use tracing::{debug, info, instrument};

impl GameSession {
    /// Every player votes for someone else; returns the tally's verdict.
    ///
    /// Votes that are missing, unknown, or self-directed are replaced by a
    /// uniformly random other player, so the tally always sums to the
    /// roster size.
    #[instrument(skip(self))]
    pub(super) async fn final_vote(&mut self) -> Result<TallyResult> {
        self.events.log("Questioning is over. Time to vote.");
        let mut tally = VoteTally::new();

        for index in 0..self.players.len() {
            let voter = self.players[index].id();
            let text = self.controllers[index]
                .vote(&self.players, &self.transcript, &self.players[index])
                .await?;
            let nominated = extract_field(&text, "VOTE");
            let resolution = resolve_vote_target(&self.players, voter, &nominated, &mut self.rng)
                .ok_or_else(|| anyhow!("No one for {} to vote for", self.players[index].name()))?;
            let voter_name = self.name_of(index);
            let choice = self.name_of(resolution.id().index());
            if resolution.is_fallback() {
                debug!(voter = %voter_name, nominated = %nominated, "Vote replaced");
                self.events.log(format!(
                    "{voter_name}'s vote was unreadable; counted for {choice}."
                ));
            } else {
                self.events.log(format!("{voter_name} votes for {choice}."));
            }
            tally.record(&choice);
        }

        let standings = tally
            .sorted()
            .into_iter()
            .map(|(name, votes)| format!("{name}: {votes}"))
            .collect::<Vec<_>>()
            .join(", ");
        self.events.log(format!("Tally: {standings}"));

        let result = tally.result();
        match &result {
            TallyResult::Accused { name, votes } => self
                .events
                .log(format!("{name} is accused with {votes} votes.")),
            TallyResult::Tie => self.events.log("The vote is tied. No one is accused."),
        }
        info!(total = tally.total(), tie = result.is_tie(), "Final vote tallied");
        Ok(result)
    }
}
