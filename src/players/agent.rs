//! LLM-backed player.

use super::PlayerController;
use super::prompts::{self, Roster};
use crate::extract::{extract_field, extract_optional};
use crate::games::spyfall::{
    AccusationPlan, ActionChoice, ActionKind, Ballot, DefenseResult, JuryVote, Player,
    QuestionPlan, Reaction, ReactionEvent, Turn,
};
use crate::llm_client::Completer;
use anyhow::Result;
use tracing::{debug, info, instrument};

/// Player whose every decision is a model completion.
///
/// Replies are parsed field by field; whatever cannot be read is left empty
/// and repaired by the orchestrator's fallbacks.
pub struct AgentPlayer {
    name: String,
    completer: Box<dyn Completer>,
    locations: Vec<String>,
    roster: Roster,
}

impl AgentPlayer {
    /// Creates an agent; `locations` are the names the spy may guess from.
    pub fn new(name: impl Into<String>, completer: Box<dyn Completer>, locations: Vec<String>) -> Self {
        let name = name.into();
        info!(agent = %name, locations = locations.len(), "Creating agent player");
        Self {
            name,
            completer,
            locations,
            roster: Roster::default(),
        }
    }

    /// The agent's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    async fn prompt(&self, me: &Player, user_message: String) -> Result<String> {
        let system = prompts::system_prompt(me, &self.locations);
        let reply = self.completer.complete(&system, &user_message).await?;
        debug!(agent = %self.name, reply = %reply, "Agent replied");
        Ok(reply)
    }
}

#[async_trait::async_trait]
impl PlayerController for AgentPlayer {
    async fn seated(&mut self, players: &[Player], _me: &Player) -> Result<()> {
        self.roster = Roster::from_players(players);
        Ok(())
    }

    #[instrument(skip_all)]
    async fn choose_action(
        &mut self,
        players: &[Player],
        turns: &[Turn],
        me: &Player,
        can_accuse: bool,
    ) -> Result<ActionChoice> {
        self.roster = Roster::from_players(players);
        let reply = self
            .prompt(me, prompts::choose_action(&self.roster, turns, me, can_accuse))
            .await?;
        Ok(ActionChoice {
            action: ActionKind::parse_lenient(&extract_field(&reply, "ACTION")),
            thought: extract_optional(&reply, "THOUGHT"),
        })
    }

    #[instrument(skip_all)]
    async fn ask(&mut self, players: &[Player], me: &Player) -> Result<QuestionPlan> {
        self.roster = Roster::from_players(players);
        let reply = self.prompt(me, prompts::ask(&self.roster, me)).await?;
        Ok(QuestionPlan {
            target_name: extract_field(&reply, "TARGET"),
            question: extract_field(&reply, "QUESTION"),
            thought: extract_optional(&reply, "THOUGHT"),
        })
    }

    #[instrument(skip_all)]
    async fn answer(&mut self, asker_name: &str, question: &str, me: &Player) -> Result<String> {
        let reply = self.prompt(me, prompts::answer(asker_name, question)).await?;
        // A reply without the field is usually the bare answer.
        Ok(extract_optional(&reply, "ANSWER").unwrap_or_else(|| reply.trim().to_string()))
    }

    #[instrument(skip_all)]
    async fn accuse(
        &mut self,
        players: &[Player],
        turns: &[Turn],
        me: &Player,
    ) -> Result<AccusationPlan> {
        self.roster = Roster::from_players(players);
        let reply = self
            .prompt(me, prompts::accuse(&self.roster, turns, me))
            .await?;
        Ok(AccusationPlan {
            target_name: extract_field(&reply, "TARGET"),
            reason: extract_field(&reply, "REASON"),
            thought: extract_optional(&reply, "THOUGHT"),
        })
    }

    #[instrument(skip_all)]
    async fn defend(
        &mut self,
        accuser_name: &str,
        accusation: &str,
        turns: &[Turn],
        me: &Player,
    ) -> Result<DefenseResult> {
        let reply = self
            .prompt(
                me,
                prompts::defend(&self.roster, accuser_name, accusation, turns),
            )
            .await?;
        Ok(DefenseResult {
            defense: extract_field(&reply, "DEFENSE"),
            thought: extract_optional(&reply, "THOUGHT"),
        })
    }

    #[instrument(skip_all)]
    async fn vote_on_accusation(
        &mut self,
        accuser_name: &str,
        accused_name: &str,
        defense: &str,
        turns: &[Turn],
        me: &Player,
    ) -> Result<JuryVote> {
        let reply = self
            .prompt(
                me,
                prompts::vote_on_accusation(&self.roster, accuser_name, accused_name, defense, turns),
            )
            .await?;
        Ok(JuryVote {
            vote: Ballot::parse_lenient(&extract_field(&reply, "VOTE")),
            reason: extract_field(&reply, "REASON"),
        })
    }

    #[instrument(skip_all)]
    async fn vote(&mut self, players: &[Player], turns: &[Turn], me: &Player) -> Result<String> {
        self.roster = Roster::from_players(players);
        self.prompt(me, prompts::vote(&self.roster, turns, me)).await
    }

    #[instrument(skip_all, fields(when_caught = when_caught))]
    async fn guess_location(
        &mut self,
        turns: &[Turn],
        me: &Player,
        when_caught: bool,
    ) -> Result<Option<String>> {
        let reply = self
            .prompt(
                me,
                prompts::guess_location(&self.roster, turns, &self.locations, when_caught),
            )
            .await?;
        Ok(extract_optional(&reply, "GUESS"))
    }

    #[instrument(skip_all, fields(event = %event))]
    async fn react(
        &mut self,
        event: ReactionEvent,
        author_name: &str,
        content: &str,
        me: &Player,
    ) -> Result<Reaction> {
        let reply = self
            .prompt(me, prompts::react(&event.to_string(), author_name, content))
            .await?;
        let suspicion = extract_optional(&reply, "SUSPICION")
            .filter(|s| !s.eq_ignore_ascii_case("none"));
        Ok(Reaction {
            emoji: extract_field(&reply, "EMOJI"),
            reaction: extract_field(&reply, "REACTION"),
            suspicion,
        })
    }
}
