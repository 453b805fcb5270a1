//! Human player fed by lines of text input.

use super::PlayerController;
use crate::games::spyfall::{
    AccusationPlan, ActionChoice, ActionKind, Ballot, DefenseResult, JuryVote, Player,
    PlayerSecret, QuestionPlan, Reaction, ReactionEvent, Turn,
};
use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

/// Human player: prompts go out on one channel, typed lines come back on
/// another. The binary wires these to the terminal.
pub struct HumanPlayer {
    name: String,
    input_rx: mpsc::UnboundedReceiver<String>,
    prompt_tx: mpsc::UnboundedSender<String>,
}

impl HumanPlayer {
    /// Creates a new human player.
    pub fn new(
        name: impl Into<String>,
        input_rx: mpsc::UnboundedReceiver<String>,
        prompt_tx: mpsc::UnboundedSender<String>,
    ) -> Self {
        Self {
            name: name.into(),
            input_rx,
            prompt_tx,
        }
    }

    fn show(&self, text: impl Into<String>) {
        if self.prompt_tx.send(text.into()).is_err() {
            debug!(player = %self.name, "Prompt receiver dropped");
        }
    }

    async fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.show(format!("[{}] {}", self.name, prompt));
        let line = self
            .input_rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("Input channel closed"))?;
        Ok(line.trim().to_string())
    }
}

#[async_trait::async_trait]
impl PlayerController for HumanPlayer {
    async fn seated(&mut self, players: &[Player], me: &Player) -> Result<()> {
        let names: Vec<&str> = players.iter().map(|p| p.name().as_str()).collect();
        let secret = match me.secret() {
            PlayerSecret::Spy => "You are the SPY. Work out the location!".to_string(),
            PlayerSecret::Civilian { location, role } => {
                format!("Location: {location}. Your role: {role}.")
            }
        };
        self.show(format!(
            "[{}] Players: {}. {}",
            self.name,
            names.join(", "),
            secret
        ));
        Ok(())
    }

    #[instrument(skip_all)]
    async fn choose_action(
        &mut self,
        _players: &[Player],
        _turns: &[Turn],
        me: &Player,
        can_accuse: bool,
    ) -> Result<ActionChoice> {
        let mut options = vec!["question"];
        if me.is_spy() {
            options.push("guess");
        }
        if can_accuse {
            options.push("vote");
        }
        let line = self
            .read_line(&format!("Your turn. Action [{}]:", options.join("/")))
            .await?;
        Ok(ActionChoice::new(ActionKind::parse_lenient(&line)))
    }

    #[instrument(skip_all)]
    async fn ask(&mut self, players: &[Player], me: &Player) -> Result<QuestionPlan> {
        let others: Vec<&str> = players
            .iter()
            .filter(|p| p.id() != me.id())
            .map(|p| p.name().as_str())
            .collect();
        let target_name = self
            .read_line(&format!("Who do you ask? ({})", others.join(", ")))
            .await?;
        let question = self.read_line("Your question:").await?;
        Ok(QuestionPlan {
            target_name,
            question,
            thought: None,
        })
    }

    #[instrument(skip_all)]
    async fn answer(&mut self, asker_name: &str, question: &str, _me: &Player) -> Result<String> {
        self.read_line(&format!("{asker_name} asks: \"{question}\" Your answer:"))
            .await
    }

    #[instrument(skip_all)]
    async fn accuse(
        &mut self,
        _players: &[Player],
        _turns: &[Turn],
        _me: &Player,
    ) -> Result<AccusationPlan> {
        let target_name = self.read_line("Who do you accuse?").await?;
        let reason = self.read_line("Why?").await?;
        Ok(AccusationPlan {
            target_name,
            reason,
            thought: None,
        })
    }

    #[instrument(skip_all)]
    async fn defend(
        &mut self,
        accuser_name: &str,
        accusation: &str,
        _turns: &[Turn],
        _me: &Player,
    ) -> Result<DefenseResult> {
        let defense = self
            .read_line(&format!(
                "{accuser_name} accuses you: \"{accusation}\" Your defense:"
            ))
            .await?;
        Ok(DefenseResult {
            defense,
            thought: None,
        })
    }

    #[instrument(skip_all)]
    async fn vote_on_accusation(
        &mut self,
        accuser_name: &str,
        accused_name: &str,
        defense: &str,
        _turns: &[Turn],
        _me: &Player,
    ) -> Result<JuryVote> {
        let vote = self
            .read_line(&format!(
                "{accuser_name} accuses {accused_name}, who says: \"{defense}\" Convict? [yes/no]:"
            ))
            .await?;
        Ok(JuryVote {
            vote: Ballot::parse_lenient(&vote),
            reason: String::new(),
        })
    }

    #[instrument(skip_all)]
    async fn vote(&mut self, _players: &[Player], _turns: &[Turn], _me: &Player) -> Result<String> {
        let name = self.read_line("Final vote. Who is the spy?").await?;
        Ok(format!("VOTE: {name}"))
    }

    #[instrument(skip_all)]
    async fn guess_location(
        &mut self,
        _turns: &[Turn],
        _me: &Player,
        when_caught: bool,
    ) -> Result<Option<String>> {
        let prompt = if when_caught {
            "You were caught! Guess the location:"
        } else {
            "Guess the location:"
        };
        let guess = self.read_line(prompt).await?;
        Ok(if guess.is_empty() { None } else { Some(guess) })
    }

    async fn react(
        &mut self,
        _event: ReactionEvent,
        _author_name: &str,
        _content: &str,
        _me: &Player,
    ) -> Result<Reaction> {
        // Humans react out loud, not through the engine.
        Ok(Reaction::default())
    }
}
