//! The question/answer turn loop.

use super::GameSession;
use crate::events::GameEvent;
use crate::games::spyfall::invariants::{self, TargetLegality};
use crate::games::spyfall::rules::{find_by_name, resolve_question_target};
use crate::games::spyfall::{ActionKind, EarlyEnd, PlayerId, ReactionEvent, Turn};
use anyhow::{Result, anyhow};
use futures::future::join_all;
use rand::Rng;
use tracing::{debug, info, instrument, warn};

/// Stand-in when an asker produces no question text.
const FALLBACK_QUESTION: &str = "What can you tell us about this place?";

impl GameSession {
    /// Runs up to `rounds` turns. Returns `Continue` when the budget runs
    /// out, or the result of whichever phase ended the game.
    #[instrument(skip_all, fields(rounds = self.rules.rounds()))]
    pub(super) async fn run_turns(&mut self) -> Result<EarlyEnd> {
        let mut current = self.first_asker();
        let mut last_asker: Option<PlayerId> = None;

        while self.rounds_played < self.rules.rounds() {
            self.rounds_played += 1;
            let index = current.index();
            debug!(round = self.rounds_played, asker = %current, "Round start");

            let choice = self.controllers[index]
                .choose_action(
                    &self.players,
                    &self.transcript,
                    &self.players[index],
                    self.rules.allow_early_vote(),
                )
                .await?;
            if let Some(thought) = &choice.thought {
                debug!(player = %self.players[index].name(), %thought, "Action reasoning");
            }

            match self.gate_action(current, choice.action) {
                ActionKind::Guess => return self.voluntary_guess().await,
                ActionKind::Vote => {
                    let end = self.run_accusation(current).await?;
                    if end.is_ended() {
                        return Ok(end);
                    }
                    // The accuser spent the round; initiative stays put.
                    continue;
                }
                ActionKind::Question => {}
            }

            let target = self.question_turn(current, last_asker).await?;
            last_asker = Some(current);
            current = target;
        }

        info!(rounds = self.rounds_played, turns = self.transcript.len(), "Round budget exhausted");
        Ok(EarlyEnd::Continue)
    }

    /// Picks the opening asker: the configured name if it resolves,
    /// otherwise a uniformly random player.
    fn first_asker(&mut self) -> PlayerId {
        if let Some(name) = self.rules.first_asker() {
            if let Some(player) = find_by_name(&self.players, name) {
                return player.id();
            }
            warn!(name = %name, "Configured first asker is not seated");
        }
        let index = self.rng.gen_range(0..self.players.len());
        self.players[index].id()
    }

    /// Downgrades actions the asker may not take to a question.
    fn gate_action(&self, asker: PlayerId, requested: ActionKind) -> ActionKind {
        let player = &self.players[asker.index()];
        let allowed = match requested {
            ActionKind::Question => true,
            ActionKind::Guess => player.is_spy(),
            ActionKind::Vote => self.rules.allow_early_vote(),
        };
        if allowed {
            requested
        } else {
            debug!(player = %player.name(), %requested, "Action downgraded to question");
            ActionKind::Question
        }
    }

    /// Plays one question and answer. Returns who answered.
    #[instrument(skip(self))]
    async fn question_turn(&mut self, asker: PlayerId, last_asker: Option<PlayerId>) -> Result<PlayerId> {
        let a = asker.index();
        let plan = self.controllers[a].ask(&self.players, &self.players[a]).await?;

        let resolution = resolve_question_target(
            &self.players,
            asker,
            last_asker,
            &plan.target_name,
            &mut self.rng,
        )
        .ok_or_else(|| anyhow!("No one for {} to question", self.players[a].name()))?;
        let target = resolution.id();
        let t = target.index();
        let asker_name = self.name_of(a);
        let target_name = self.name_of(t);

        if resolution.is_fallback() {
            self.events.log(format!(
                "{} could not ask '{}'; asking {} instead.",
                asker_name, plan.target_name, target_name
            ));
        }

        let question = if plan.question.trim().is_empty() {
            warn!(asker = %asker_name, "Empty question replaced");
            FALLBACK_QUESTION.to_string()
        } else {
            plan.question.trim().to_string()
        };
        self.events
            .log(format!("{asker_name} asks {target_name}: {question}"));
        self.gather_reactions(ReactionEvent::Question, asker, &question, [asker, target])
            .await;

        let answer = self.controllers[t]
            .answer(&asker_name, &question, &self.players[t])
            .await?;
        let answer = answer.trim().to_string();
        self.events.log(format!("{target_name}: {answer}"));

        self.transcript
            .push(Turn::new(asker, target, question, answer.clone()));
        debug_assert!(
            self.players.len() <= 2
                || invariants::check::<[Turn], TargetLegality>(&self.transcript).is_ok(),
            "transcript broke target legality"
        );

        self.gather_reactions(ReactionEvent::Answer, target, &answer, [asker, target])
            .await;
        Ok(target)
    }

    /// Collects reactions from everyone outside `exclude`, concurrently.
    /// Results are logged in roster order; failures are skipped.
    #[instrument(skip(self, content))]
    async fn gather_reactions(
        &mut self,
        event: ReactionEvent,
        author: PlayerId,
        content: &str,
        exclude: [PlayerId; 2],
    ) {
        if !self.rules.reactions() {
            return;
        }
        let author_name = self.name_of(author.index());
        let players = &self.players;
        let pending = self
            .controllers
            .iter_mut()
            .enumerate()
            .filter(|(index, _)| !exclude.iter().any(|id| id.index() == *index))
            .map(|(index, controller)| {
                let me = &players[index];
                let author_name = author_name.as_str();
                async move { (index, controller.react(event, author_name, content, me).await) }
            });
        let results = join_all(pending).await;

        for (index, result) in results {
            let name = self.name_of(index);
            match result {
                Ok(reaction) if reaction.emoji.is_empty() && reaction.reaction.is_empty() => {}
                Ok(reaction) => {
                    self.events.log(format!(
                        "  {} {} {}",
                        name, reaction.emoji, reaction.reaction
                    ));
                    self.events.emit(GameEvent::Reaction {
                        player: name,
                        reaction,
                    });
                }
                Err(e) => warn!(player = %name, error = %e, "Reaction failed"),
            }
        }
    }
}
