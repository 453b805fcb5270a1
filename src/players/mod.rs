//! Player controller trait and implementations.

mod agent;
mod human;
mod prompts;
mod simple_ai;

pub use agent::AgentPlayer;
pub use human::HumanPlayer;
pub use simple_ai::SimpleAi;

use crate::games::spyfall::{
    AccusationPlan, ActionChoice, DefenseResult, JuryVote, Player, QuestionPlan, Reaction,
    ReactionEvent, Turn,
};
use anyhow::Result;

/// Decision-maker behind one seat.
///
/// The orchestrator only ever holds `Box<dyn PlayerController>`; it never
/// asks what kind of controller it is talking to. Replies are advisory:
/// illegal targets and actions are repaired by the caller. An `Err` means
/// the controller itself failed (transport, closed input) and aborts the
/// session.
#[async_trait::async_trait]
pub trait PlayerController: Send {
    /// Called once after dealing, before the first turn.
    async fn seated(&mut self, _players: &[Player], _me: &Player) -> Result<()> {
        Ok(())
    }

    /// Picks this turn's action.
    async fn choose_action(
        &mut self,
        players: &[Player],
        turns: &[Turn],
        me: &Player,
        can_accuse: bool,
    ) -> Result<ActionChoice>;

    /// Nominates a target and a question.
    async fn ask(&mut self, players: &[Player], me: &Player) -> Result<QuestionPlan>;

    /// Answers a question.
    async fn answer(&mut self, asker_name: &str, question: &str, me: &Player) -> Result<String>;

    /// Names who to accuse and why.
    async fn accuse(
        &mut self,
        players: &[Player],
        turns: &[Turn],
        me: &Player,
    ) -> Result<AccusationPlan>;

    /// Defends against an accusation.
    async fn defend(
        &mut self,
        accuser_name: &str,
        accusation: &str,
        turns: &[Turn],
        me: &Player,
    ) -> Result<DefenseResult>;

    /// Votes as a juror on an accusation.
    async fn vote_on_accusation(
        &mut self,
        accuser_name: &str,
        accused_name: &str,
        defense: &str,
        turns: &[Turn],
        me: &Player,
    ) -> Result<JuryVote>;

    /// Casts the final vote; free text expected to carry a `VOTE:` line.
    async fn vote(&mut self, players: &[Player], turns: &[Turn], me: &Player) -> Result<String>;

    /// Guesses the location, or `None` if no usable guess.
    async fn guess_location(
        &mut self,
        turns: &[Turn],
        me: &Player,
        when_caught: bool,
    ) -> Result<Option<String>>;

    /// Reacts to something said at the table.
    async fn react(
        &mut self,
        event: ReactionEvent,
        author_name: &str,
        content: &str,
        me: &Player,
    ) -> Result<Reaction>;
}
