//! Shared fixtures: a scripted controller and a fixed table.

#![allow(dead_code)]

use anyhow::{Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;
use spyfall::{
    AccusationPlan, ActionChoice, ActionKind, Ballot, DefenseResult, EventSink, GameEvent,
    GameRules, GameSession, JuryVote, Location, Outcome, Player, PlayerController, QuestionPlan,
    Reaction, ReactionEvent, SeatSpec, Turn, deal_with_spy,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Shared log of `name:method` calls, in call order.
pub type Calls = Arc<Mutex<Vec<String>>>;

/// What a scripted player will say.
#[derive(Debug, Clone, Default)]
pub struct Script {
    /// Actions for successive turns; `question` once exhausted.
    pub actions: Vec<ActionKind>,
    /// Name nominated when asking.
    pub ask_target: String,
    /// Name nominated when accusing.
    pub accuse_target: String,
    /// Ballot cast as a juror.
    pub ballot: Ballot,
    /// Raw final-vote text.
    pub vote: String,
    /// Location guess, if any.
    pub guess: Option<String>,
    /// Method that fails instead of answering.
    pub fail_on: Option<&'static str>,
}

impl Script {
    pub fn voting(vote_for: &str) -> Self {
        Self {
            vote: format!("THOUGHT: obvious\nVOTE: {vote_for}"),
            ..Self::default()
        }
    }
}

/// Controller that replays a [`Script`] and records every call.
pub struct ScriptedPlayer {
    name: String,
    script: Script,
    actions: VecDeque<ActionKind>,
    calls: Calls,
}

impl ScriptedPlayer {
    pub fn new(name: &str, script: Script, calls: Calls) -> Self {
        Self {
            name: name.to_string(),
            actions: script.actions.iter().copied().collect(),
            script,
            calls,
        }
    }

    fn record(&self, method: &'static str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, method));
        if self.script.fail_on == Some(method) {
            bail!("{} lost connection during {}", self.name, method);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl PlayerController for ScriptedPlayer {
    async fn choose_action(
        &mut self,
        _players: &[Player],
        _turns: &[Turn],
        _me: &Player,
        _can_accuse: bool,
    ) -> Result<ActionChoice> {
        self.record("choose_action")?;
        Ok(ActionChoice::new(self.actions.pop_front().unwrap_or_default()))
    }

    async fn ask(&mut self, _players: &[Player], _me: &Player) -> Result<QuestionPlan> {
        self.record("ask")?;
        Ok(QuestionPlan {
            target_name: self.script.ask_target.clone(),
            question: format!("{}'s question", self.name),
            thought: None,
        })
    }

    async fn answer(&mut self, _asker_name: &str, _question: &str, _me: &Player) -> Result<String> {
        self.record("answer")?;
        Ok(format!("{}'s answer", self.name))
    }

    async fn accuse(
        &mut self,
        _players: &[Player],
        _turns: &[Turn],
        _me: &Player,
    ) -> Result<AccusationPlan> {
        self.record("accuse")?;
        Ok(AccusationPlan {
            target_name: self.script.accuse_target.clone(),
            reason: "You dodged my question".to_string(),
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
        self.record("defend")?;
        Ok(DefenseResult {
            defense: "I belong here".to_string(),
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
        self.record("vote_on_accusation")?;
        Ok(JuryVote {
            vote: self.script.ballot,
            reason: "scripted".to_string(),
        })
    }

    async fn vote(&mut self, _players: &[Player], _turns: &[Turn], _me: &Player) -> Result<String> {
        self.record("vote")?;
        Ok(self.script.vote.clone())
    }

    async fn guess_location(
        &mut self,
        _turns: &[Turn],
        _me: &Player,
        _when_caught: bool,
    ) -> Result<Option<String>> {
        self.record("guess_location")?;
        Ok(self.script.guess.clone())
    }

    async fn react(
        &mut self,
        _event: ReactionEvent,
        _author_name: &str,
        _content: &str,
        _me: &Player,
    ) -> Result<Reaction> {
        self.record("react")?;
        Ok(Reaction {
            emoji: "👀".to_string(),
            reaction: format!("{} noticed", self.name),
            suspicion: None,
        })
    }
}

/// The location every fixture game is played at.
pub fn airplane() -> Location {
    Location::new(
        "Airplane",
        [
            "Pilot",
            "Flight Attendant",
            "First Class Passenger",
            "Air Marshal",
            "Mechanic",
            "Economy Passenger",
            "Co-Pilot",
        ]
        .iter()
        .map(|r| r.to_string())
        .collect(),
    )
}

pub fn possible_locations() -> Vec<String> {
    ["Airplane", "Bank", "Beach", "Casino"]
        .iter()
        .map(|l| l.to_string())
        .collect()
}

/// Rules with reactions off, a fixed seed, and `first` opening.
pub fn rules(rounds: u32, first: &str) -> GameRules {
    GameRules::new()
        .with_rounds(rounds)
        .with_reactions(false)
        .with_seed(7)
        .with_first_asker(first.to_string())
}

/// A dealt table where `scripts[i]` plays `names[i]` and `spy` is the spy.
pub fn table(
    names: &[&str],
    spy: usize,
    scripts: Vec<Script>,
    rules: GameRules,
) -> (GameSession, Calls, tokio::sync::mpsc::UnboundedReceiver<GameEvent>) {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let seats: Vec<SeatSpec> = names.iter().map(|n| SeatSpec::new(*n, false)).collect();
    let players = deal_with_spy(&seats, &airplane(), spy, &mut StdRng::seed_from_u64(1)).unwrap();
    let controllers: Vec<Box<dyn PlayerController>> = names
        .iter()
        .zip(scripts)
        .map(|(name, script)| {
            Box::new(ScriptedPlayer::new(name, script, calls.clone())) as Box<dyn PlayerController>
        })
        .collect();
    let (events, rx) = EventSink::channel();
    let session = GameSession::from_dealt(
        players,
        controllers,
        airplane(),
        possible_locations(),
        rules,
        events,
    )
    .unwrap();
    (session, calls, rx)
}

/// Plays a session and drains every event it emitted.
pub async fn play(
    session: GameSession,
    mut rx: tokio::sync::mpsc::UnboundedReceiver<GameEvent>,
) -> (Result<Outcome>, Vec<GameEvent>) {
    let result = session.run().await;
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    (result, events)
}

/// Log lines among `events`.
pub fn log_lines(events: &[GameEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Log(line) => Some(line.clone()),
            _ => None,
        })
        .collect()
}

/// Calls made by `name`, method names only.
pub fn calls_by(calls: &Calls, name: &str) -> Vec<String> {
    let prefix = format!("{name}:");
    calls
        .lock()
        .unwrap()
        .iter()
        .filter_map(|c| c.strip_prefix(&prefix).map(str::to_string))
        .collect()
}
