//! Core domain types for Spyfall.

use derive_getters::Getters;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Stable identifier of a player: their seat index in the roster.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Serialize, Deserialize,
)]
#[display("#{_0}")]
pub struct PlayerId(usize);

impl PlayerId {
    /// Returns the seat index backing this id.
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a player secretly knows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerSecret {
    /// The spy does not know the location.
    Spy,
    /// A civilian knows the location and holds one of its roles.
    Civilian {
        /// Shared location name.
        location: String,
        /// This civilian's role at the location.
        role: String,
    },
}

impl PlayerSecret {
    /// Returns true for the spy.
    pub fn is_spy(&self) -> bool {
        matches!(self, PlayerSecret::Spy)
    }

    /// Location known to the holder, if any.
    pub fn location(&self) -> Option<&str> {
        match self {
            PlayerSecret::Spy => None,
            PlayerSecret::Civilian { location, .. } => Some(location),
        }
    }

    /// Role held by the holder, if any.
    pub fn role(&self) -> Option<&str> {
        match self {
            PlayerSecret::Spy => None,
            PlayerSecret::Civilian { role, .. } => Some(role),
        }
    }
}

/// A seated player. Immutable once dealt.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Player {
    /// Roster index.
    #[getter(copy)]
    id: PlayerId,
    /// Display name, unique within the session once normalized for matching.
    name: String,
    /// Whether a person (rather than a model or bot) controls this seat.
    #[getter(copy)]
    is_human: bool,
    /// Spy or civilian knowledge.
    secret: PlayerSecret,
}

impl Player {
    /// Creates a player.
    pub fn new(id: PlayerId, name: impl Into<String>, is_human: bool, secret: PlayerSecret) -> Self {
        Self {
            id,
            name: name.into(),
            is_human,
            secret,
        }
    }

    /// Returns true if this player is the spy.
    pub fn is_spy(&self) -> bool {
        self.secret.is_spy()
    }
}

/// One question/answer exchange in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Turn {
    /// Who asked.
    #[getter(copy)]
    asker_id: PlayerId,
    /// Who was asked.
    #[getter(copy)]
    target_id: PlayerId,
    /// Question text.
    question: String,
    /// Answer text.
    answer: String,
}

impl Turn {
    /// Creates a transcript entry.
    pub fn new(
        asker_id: PlayerId,
        target_id: PlayerId,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            asker_id,
            target_id,
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Winning side.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Winner {
    /// The spy escaped or guessed the location.
    Spy,
    /// The civilians unmasked the spy.
    Civilians,
}

/// Signal produced by any phase that can short-circuit the turn loop.
///
/// Serializes as `{ "ended": false }` or
/// `{ "ended": true, "winner": .., "reason": .. }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "EarlyEndRecord", try_from = "EarlyEndRecord")]
pub enum EarlyEnd {
    /// Play goes on.
    Continue,
    /// The game is decided.
    Ended {
        /// Winning side.
        winner: Winner,
        /// Human-readable explanation.
        reason: String,
    },
}

impl EarlyEnd {
    /// Builds an ended result.
    pub fn ended(winner: Winner, reason: impl Into<String>) -> Self {
        EarlyEnd::Ended {
            winner,
            reason: reason.into(),
        }
    }

    /// Returns true if the game is decided.
    pub fn is_ended(&self) -> bool {
        matches!(self, EarlyEnd::Ended { .. })
    }
}

/// Wire shape of [`EarlyEnd`], keyed by a boolean `ended` flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EarlyEndRecord {
    ended: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    winner: Option<Winner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl From<EarlyEnd> for EarlyEndRecord {
    fn from(end: EarlyEnd) -> Self {
        match end {
            EarlyEnd::Continue => Self {
                ended: false,
                winner: None,
                reason: None,
            },
            EarlyEnd::Ended { winner, reason } => Self {
                ended: true,
                winner: Some(winner),
                reason: Some(reason),
            },
        }
    }
}

impl TryFrom<EarlyEndRecord> for EarlyEnd {
    type Error = String;

    fn try_from(record: EarlyEndRecord) -> Result<Self, Self::Error> {
        match (record.ended, record.winner, record.reason) {
            (false, _, _) => Ok(EarlyEnd::Continue),
            (true, Some(winner), Some(reason)) => Ok(EarlyEnd::Ended { winner, reason }),
            (true, _, _) => Err("an ended result needs a winner and a reason".to_string()),
        }
    }
}

/// Final payload of a session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Outcome {
    /// Winning side.
    #[getter(copy)]
    winner: Winner,
    /// Why that side won.
    reason: String,
    /// Who the final vote singled out, if anyone.
    accused_name: Option<String>,
    /// Whether the final vote tied.
    #[getter(copy)]
    is_tie: bool,
    /// The spy's name.
    spy_name: String,
    /// The true location.
    location: String,
    /// The spy's location guess, if one was made.
    spy_guess: Option<String>,
    /// Whether the game ended before the round budget ran out.
    #[getter(copy)]
    ended_early: bool,
    /// Rounds consumed by the turn loop.
    #[getter(copy)]
    rounds_played: u32,
    /// Full question/answer transcript.
    turns: Vec<Turn>,
}

/// Facts shared by every outcome of one session.
#[derive(Debug, Clone)]
pub(crate) struct OutcomeContext {
    pub spy_name: String,
    pub location: String,
    pub rounds_played: u32,
    pub turns: Vec<Turn>,
}

impl Outcome {
    /// Outcome of a game decided before the final vote.
    pub(crate) fn early(
        winner: Winner,
        reason: String,
        spy_guess: Option<String>,
        context: OutcomeContext,
    ) -> Self {
        Self {
            winner,
            reason,
            accused_name: None,
            is_tie: false,
            spy_name: context.spy_name,
            location: context.location,
            spy_guess,
            ended_early: true,
            rounds_played: context.rounds_played,
            turns: context.turns,
        }
    }

    /// Outcome of a game decided by the final vote and guess.
    pub(crate) fn after_vote(
        winner: Winner,
        reason: String,
        accused_name: Option<String>,
        is_tie: bool,
        spy_guess: Option<String>,
        context: OutcomeContext,
    ) -> Self {
        Self {
            winner,
            reason,
            accused_name,
            is_tie,
            spy_name: context.spy_name,
            location: context.location,
            spy_guess,
            ended_early: false,
            rounds_played: context.rounds_played,
            turns: context.turns,
        }
    }
}
