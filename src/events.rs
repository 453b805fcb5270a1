//! Reporting surface: events the session emits for whoever is listening.

use crate::games::spyfall::{Outcome, Player, Reaction};
use crate::orchestrator::GameRules;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// One seat as shown in the setup snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatInfo {
    /// Display name.
    pub name: String,
    /// Whether a person controls the seat.
    pub is_human: bool,
    /// Role, or `None` for the spy.
    pub role: Option<String>,
    /// Whether this seat is the spy.
    pub is_spy: bool,
}

/// Snapshot emitted once at setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    /// The true location.
    pub location: String,
    /// Every location the spy may guess from.
    pub possible_locations: Vec<String>,
    /// Seats in roster order.
    pub players: Vec<SeatInfo>,
    /// The spy's name.
    pub spy_name: String,
    /// Rules in force.
    pub rules: GameRules,
}

impl GameInfo {
    /// Builds the snapshot from a dealt roster.
    pub fn new(
        players: &[Player],
        location: &str,
        possible_locations: Vec<String>,
        rules: &GameRules,
    ) -> Self {
        let seats = players
            .iter()
            .map(|p| SeatInfo {
                name: p.name().clone(),
                is_human: p.is_human(),
                role: p.secret().role().map(str::to_string),
                is_spy: p.is_spy(),
            })
            .collect();
        let spy_name = players
            .iter()
            .find(|p| p.is_spy())
            .map(|p| p.name().clone())
            .unwrap_or_default();
        Self {
            location: location.to_string(),
            possible_locations,
            players: seats,
            spy_name,
            rules: rules.clone(),
        }
    }
}

/// Events emitted by a running session, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum GameEvent {
    /// Setup snapshot, emitted once before play.
    Started(GameInfo),
    /// A human-readable log line.
    Log(String),
    /// A bystander's reaction.
    Reaction {
        /// Who reacted.
        player: String,
        /// The reaction itself.
        reaction: Reaction,
    },
    /// The session finished normally.
    Finished(Outcome),
    /// The session aborted with an error.
    Aborted(String),
    /// The session released its resources. Always the last event.
    Closed,
}

/// Injected sink the session writes to.
///
/// The session never learns whether anyone is subscribed; a closed or
/// missing receiver silently drops events.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<mpsc::UnboundedSender<GameEvent>>,
}

impl EventSink {
    /// Sink that forwards to `tx`.
    pub fn new(tx: mpsc::UnboundedSender<GameEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Sink plus a receiver for its events.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<GameEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Sink that discards everything.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Emits an event.
    pub fn emit(&self, event: GameEvent) {
        if let Some(tx) = &self.tx {
            if tx.send(event).is_err() {
                debug!("Event receiver dropped");
            }
        }
    }

    /// Emits a log line.
    pub fn log(&self, line: impl Into<String>) {
        let line = line.into();
        info!(target: "spyfall::game", "{}", line);
        self.emit(GameEvent::Log(line));
    }
}

/// Emits [`GameEvent::Closed`] when dropped, however the session ends.
pub(crate) struct CloseGuard {
    sink: EventSink,
}

impl CloseGuard {
    #[instrument(skip_all)]
    pub(crate) fn new(sink: EventSink) -> Self {
        Self { sink }
    }
}

impl Drop for CloseGuard {
    fn drop(&mut self) {
        debug!("Closing session event stream");
        self.sink.emit(GameEvent::Closed);
    }
}
