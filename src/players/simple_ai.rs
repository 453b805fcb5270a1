//! Offline bot that plays at random (no model calls).

use super::PlayerController;
use crate::games::spyfall::{
    AccusationPlan, ActionChoice, ActionKind, Ballot, DefenseResult, JuryVote, Player,
    QuestionPlan, Reaction, ReactionEvent, Turn,
};
use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

const QUESTIONS: &[&str] = &[
    "What did you wear to get here today?",
    "How long do people usually stay here?",
    "What's the noisiest thing around you right now?",
    "Would you bring your kids here?",
    "What do you do when it gets busy?",
];

const ANSWERS: &[&str] = &[
    "Depends on the day, honestly.",
    "Nothing special, same as always.",
    "More often than you'd think.",
    "I try not to think about it.",
    "Ask me again after lunch.",
];

const EMOJIS: &[&str] = &["🤔", "😏", "👀", "😂", "🙄"];

/// Random bot for demos and tests.
pub struct SimpleAi {
    name: String,
    rng: StdRng,
    locations: Vec<String>,
    guess_chance: f64,
    accuse_chance: f64,
}

impl SimpleAi {
    /// Creates a bot; `locations` are the names it may guess from as spy.
    pub fn new(name: impl Into<String>, locations: Vec<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
            locations,
            guess_chance: 0.0,
            accuse_chance: 0.0,
        }
    }

    /// Chance per turn that the bot, as spy, guesses early.
    pub fn with_guess_chance(mut self, chance: f64) -> Self {
        self.guess_chance = chance.clamp(0.0, 1.0);
        self
    }

    /// Chance per turn that the bot calls an accusation when allowed.
    pub fn with_accuse_chance(mut self, chance: f64) -> Self {
        self.accuse_chance = chance.clamp(0.0, 1.0);
        self
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn random_other(&mut self, players: &[Player], me: &Player) -> String {
        let others: Vec<&Player> = players.iter().filter(|p| p.id() != me.id()).collect();
        others
            .choose(&mut self.rng)
            .map(|p| p.name().clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl PlayerController for SimpleAi {
    async fn choose_action(
        &mut self,
        _players: &[Player],
        _turns: &[Turn],
        me: &Player,
        can_accuse: bool,
    ) -> Result<ActionChoice> {
        let action = if me.is_spy() && self.rng.gen_bool(self.guess_chance) {
            ActionKind::Guess
        } else if can_accuse && self.rng.gen_bool(self.accuse_chance) {
            ActionKind::Vote
        } else {
            ActionKind::Question
        };
        debug!(bot = %self.name, %action, "Bot chose action");
        Ok(ActionChoice::new(action))
    }

    async fn ask(&mut self, players: &[Player], me: &Player) -> Result<QuestionPlan> {
        Ok(QuestionPlan {
            target_name: self.random_other(players, me),
            question: self.pick(QUESTIONS).to_string(),
            thought: None,
        })
    }

    async fn answer(&mut self, _asker_name: &str, _question: &str, _me: &Player) -> Result<String> {
        Ok(self.pick(ANSWERS).to_string())
    }

    async fn accuse(
        &mut self,
        players: &[Player],
        _turns: &[Turn],
        me: &Player,
    ) -> Result<AccusationPlan> {
        Ok(AccusationPlan {
            target_name: self.random_other(players, me),
            reason: "Your answers don't add up.".to_string(),
            thought: None,
        })
    }

    async fn defend(
        &mut self,
        _accuser_name: &str,
        _accusation: &str,
        _turns: &[Turn],
        _me: &Player,
    ) -> Result<DefenseResult> {
        Ok(DefenseResult {
            defense: "I've been straight with everyone.".to_string(),
            thought: None,
        })
    }

    async fn vote_on_accusation(
        &mut self,
        _accuser_name: &str,
        _accused_name: &str,
        _defense: &str,
        _turns: &[Turn],
        _me: &Player,
    ) -> Result<JuryVote> {
        let vote = if self.rng.gen_bool(0.5) {
            Ballot::Yes
        } else {
            Ballot::No
        };
        Ok(JuryVote {
            vote,
            reason: "Gut feeling.".to_string(),
        })
    }

    async fn vote(&mut self, players: &[Player], _turns: &[Turn], me: &Player) -> Result<String> {
        Ok(format!("VOTE: {}", self.random_other(players, me)))
    }

    async fn guess_location(
        &mut self,
        _turns: &[Turn],
        _me: &Player,
        _when_caught: bool,
    ) -> Result<Option<String>> {
        Ok(self.locations.choose(&mut self.rng).cloned())
    }

    async fn react(
        &mut self,
        _event: ReactionEvent,
        _author_name: &str,
        _content: &str,
        _me: &Player,
    ) -> Result<Reaction> {
        Ok(Reaction {
            emoji: self.pick(EMOJIS).to_string(),
            reaction: String::new(),
            suspicion: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::spyfall::{PlayerId, PlayerSecret};

    fn players() -> Vec<Player> {
        ["Ann", "Bob", "Cat"]
            .iter()
            .enumerate()
            .map(|(i, n)| Player::new(PlayerId::from(i), *n, false, PlayerSecret::Spy))
            .collect()
    }

    #[tokio::test]
    async fn test_never_targets_self() {
        let players = players();
        let mut bot = SimpleAi::new("Ann", Vec::new(), 1);
        for _ in 0..30 {
            let plan = bot.ask(&players, &players[0]).await.unwrap();
            assert_ne!(plan.target_name, "Ann");
            assert!(!plan.question.is_empty());
        }
    }

    #[tokio::test]
    async fn test_default_action_is_question() {
        let players = players();
        let mut bot = SimpleAi::new("Ann", Vec::new(), 1);
        for _ in 0..10 {
            let choice = bot
                .choose_action(&players, &[], &players[0], true)
                .await
                .unwrap();
            assert_eq!(choice.action, ActionKind::Question);
        }
    }

    #[tokio::test]
    async fn test_certain_guess() {
        let players = players();
        let mut bot = SimpleAi::new("Ann", vec!["Bank".to_string()], 1).with_guess_chance(1.0);
        let choice = bot
            .choose_action(&players, &[], &players[0], false)
            .await
            .unwrap();
        assert_eq!(choice.action, ActionKind::Guess);
        assert_eq!(
            bot.guess_location(&[], &players[0], false).await.unwrap(),
            Some("Bank".to_string())
        );
    }

    #[tokio::test]
    async fn test_vote_carries_field() {
        let players = players();
        let mut bot = SimpleAi::new("Ann", Vec::new(), 7);
        let text = bot.vote(&players, &[], &players[0]).await.unwrap();
        assert!(text.starts_with("VOTE: "));
        assert_ne!(crate::extract::extract_field(&text, "VOTE"), "Ann");
    }
}
