//! First-class action types for Spyfall.
//!
//! Controllers answer the orchestrator with these structured values. They
//! express intent only; legality is decided by the rules, never here.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// What a player wants to do with their turn.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActionKind {
    /// Ask another player a question.
    #[default]
    Question,
    /// Guess the location (spy only).
    Guess,
    /// Call a vote against someone, i.e. accuse them.
    Vote,
}

impl ActionKind {
    /// Parses free text leniently; anything unrecognized is a question.
    #[instrument]
    pub fn parse_lenient(text: &str) -> Self {
        let word = text
            .trim()
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        match word.as_str() {
            "guess" | "guess location" => ActionKind::Guess,
            "vote" | "accuse" | "accusation" => ActionKind::Vote,
            _ => ActionKind::Question,
        }
    }
}

/// Reply to `choose_action`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionChoice {
    /// Requested action; advisory.
    pub action: ActionKind,
    /// Private reasoning, for logs only.
    pub thought: Option<String>,
}

impl ActionChoice {
    /// Creates a choice without reasoning.
    pub fn new(action: ActionKind) -> Self {
        Self {
            action,
            thought: None,
        }
    }
}

/// Reply to `ask`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPlan {
    /// Nominated target name; may be empty or illegal.
    pub target_name: String,
    /// Question text.
    pub question: String,
    /// Private reasoning, for logs only.
    pub thought: Option<String>,
}

/// Reply to `accuse`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccusationPlan {
    /// Accused player's name; may not resolve.
    pub target_name: String,
    /// Public reason stated to the table.
    pub reason: String,
    /// Private reasoning, for logs only.
    pub thought: Option<String>,
}

/// Reply to `defend`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenseResult {
    /// Public defense.
    pub defense: String,
    /// Private reasoning, for logs only.
    pub thought: Option<String>,
}

/// A yes/no ballot in an accusation vote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ballot {
    /// Convict.
    #[display("yes")]
    Yes,
    /// Acquit.
    #[default]
    #[display("no")]
    No,
}

impl Ballot {
    /// Parses free text; only an explicit yes convicts.
    #[instrument]
    pub fn parse_lenient(text: &str) -> Self {
        let word = text
            .trim()
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if word == "yes" || word == "y" {
            Ballot::Yes
        } else {
            Ballot::No
        }
    }
}

/// Reply to `vote_on_accusation`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JuryVote {
    /// The ballot.
    pub vote: Ballot,
    /// Public reason.
    pub reason: String,
}

/// What a bystander is reacting to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReactionEvent {
    /// A question was asked.
    Question,
    /// A question was answered.
    Answer,
}

/// A bystander's flavor reaction. Never affects game state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// Single emoji.
    pub emoji: String,
    /// Short remark.
    pub reaction: String,
    /// Who the reactor currently suspects, if anyone.
    pub suspicion: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse_lenient() {
        assert_eq!(ActionKind::parse_lenient("GUESS"), ActionKind::Guess);
        assert_eq!(ActionKind::parse_lenient(" vote."), ActionKind::Vote);
        assert_eq!(ActionKind::parse_lenient("accuse"), ActionKind::Vote);
        assert_eq!(ActionKind::parse_lenient("question"), ActionKind::Question);
        assert_eq!(ActionKind::parse_lenient(""), ActionKind::Question);
        assert_eq!(ActionKind::parse_lenient("dance"), ActionKind::Question);
    }

    #[test]
    fn test_ballot_parse_lenient() {
        assert_eq!(Ballot::parse_lenient("Yes"), Ballot::Yes);
        assert_eq!(Ballot::parse_lenient("**YES**"), Ballot::Yes);
        assert_eq!(Ballot::parse_lenient("no"), Ballot::No);
        assert_eq!(Ballot::parse_lenient("maybe"), Ballot::No);
        assert_eq!(Ballot::parse_lenient(""), Ballot::No);
    }
}
