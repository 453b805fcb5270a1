//! Game session state machine.
//!
//! A [`GameSession`] owns the dealt roster, one controller per seat, the
//! transcript, and the asker cursor. [`GameSession::run`] drives the turn
//! loop, any accusations, the final vote, and the spy's guess, and reports
//! everything through the injected [`EventSink`].

mod accusation;
mod guess;
mod settings;
mod turns;
mod voting;

pub use accusation::{
    REASON_CAUGHT_BUT_GUESSED, REASON_CONVICTED_INNOCENT, REASON_CONVICTED_SPY,
};
pub use guess::{REASON_VOLUNTARY_RIGHT, REASON_VOLUNTARY_WRONG};
pub use settings::{DEFAULT_ROUNDS, GameRules};

use crate::events::{CloseGuard, EventSink, GameEvent, GameInfo};
use crate::games::spyfall::invariants::{self, SecretUniqueness};
use crate::games::spyfall::rules::resolve_winner;
use crate::games::spyfall::{
    EarlyEnd, Location, LocationPack, MIN_PLAYERS, Outcome, OutcomeContext, Player, SeatSpec,
    SetupError, Turn, check_names, deal,
};
use crate::players::PlayerController;
use anyhow::Result;
use derive_new::new;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info, instrument};

/// One seat before dealing: who sits there and who decides for them.
#[derive(new)]
pub struct Seat {
    /// Name and kind of the seat.
    pub spec: SeatSpec,
    /// Decision-maker for the seat.
    pub controller: Box<dyn PlayerController>,
}

/// A dealt, ready-to-run game.
pub struct GameSession {
    players: Vec<Player>,
    controllers: Vec<Box<dyn PlayerController>>,
    spy_index: usize,
    location: Location,
    possible_locations: Vec<String>,
    rules: GameRules,
    events: EventSink,
    rng: StdRng,
    transcript: Vec<Turn>,
    rounds_played: u32,
    spy_guess: Option<String>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("players", &self.players)
            .field("location", &self.location.name())
            .field("rules", &self.rules)
            .field("rounds_played", &self.rounds_played)
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Draws a location from `pack`, deals secrets, and seats controllers.
    #[instrument(skip_all, fields(seats = seats.len(), pack = %pack.name()))]
    pub fn new(
        seats: Vec<Seat>,
        pack: &LocationPack,
        rules: GameRules,
        events: EventSink,
    ) -> Result<Self, SetupError> {
        let mut rng = match rules.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let location = pack
            .choose(&mut rng)
            .map_err(|e| SetupError::new(e.message))?
            .clone();

        let (specs, controllers): (Vec<SeatSpec>, Vec<Box<dyn PlayerController>>) = seats
            .into_iter()
            .map(|seat| (seat.spec, seat.controller))
            .unzip();
        let players = deal(&specs, &location, &mut rng)?;

        Self::assemble(
            players,
            controllers,
            location,
            pack.location_names(),
            rules,
            events,
            rng,
        )
    }

    /// Seats controllers at an already-dealt roster.
    ///
    /// `controllers[i]` decides for `players[i]`.
    #[instrument(skip_all, fields(players = players.len(), location = %location.name()))]
    pub fn from_dealt(
        players: Vec<Player>,
        controllers: Vec<Box<dyn PlayerController>>,
        location: Location,
        possible_locations: Vec<String>,
        rules: GameRules,
        events: EventSink,
    ) -> Result<Self, SetupError> {
        let rng = match rules.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::assemble(
            players,
            controllers,
            location,
            possible_locations,
            rules,
            events,
            rng,
        )
    }

    fn assemble(
        players: Vec<Player>,
        controllers: Vec<Box<dyn PlayerController>>,
        location: Location,
        possible_locations: Vec<String>,
        rules: GameRules,
        events: EventSink,
        rng: StdRng,
    ) -> Result<Self, SetupError> {
        if players.len() < MIN_PLAYERS {
            return Err(SetupError::new(format!(
                "Need at least {} players, got {}",
                MIN_PLAYERS,
                players.len()
            )));
        }
        if players.len() != controllers.len() {
            return Err(SetupError::new(format!(
                "{} players but {} controllers",
                players.len(),
                controllers.len()
            )));
        }
        if players
            .iter()
            .enumerate()
            .any(|(index, p)| p.id().index() != index)
        {
            return Err(SetupError::new("Player ids must match roster order"));
        }
        check_names(players.iter().map(|p| p.name().as_str()))?;
        invariants::check::<[Player], SecretUniqueness>(&players)
            .map_err(|v| SetupError::new(v.to_string()))?;
        if let Some(p) = players
            .iter()
            .find(|p| p.secret().location().is_some_and(|l| l != location.name().as_str()))
        {
            return Err(SetupError::new(format!(
                "{} was dealt a different location than {}",
                p.name(),
                location.name()
            )));
        }
        let spy_index = players
            .iter()
            .position(Player::is_spy)
            .ok_or_else(|| SetupError::new("No spy in roster"))?;

        info!(
            players = players.len(),
            location = %location.name(),
            rounds = rules.rounds(),
            "Game session ready"
        );
        Ok(Self {
            players,
            controllers,
            spy_index,
            location,
            possible_locations,
            rules,
            events,
            rng,
            transcript: Vec::new(),
            rounds_played: 0,
            spy_guess: None,
        })
    }

    /// The dealt roster.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// The true location.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Rules in force.
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Plays the session to completion.
    ///
    /// Emits `Started` first and `Closed` last, with `Finished` or
    /// `Aborted` in between. A controller error aborts the session and is
    /// returned.
    #[instrument(skip_all, fields(players = self.players.len(), rounds = self.rules.rounds()))]
    pub async fn run(mut self) -> Result<Outcome> {
        let _guard = CloseGuard::new(self.events.clone());
        self.events.emit(GameEvent::Started(GameInfo::new(
            &self.players,
            self.location.name(),
            self.possible_locations.clone(),
            &self.rules,
        )));

        match self.play().await {
            Ok(outcome) => {
                self.events.log(format!(
                    "Winner: {} ({}). The spy was {}; the location was {}.",
                    outcome.winner(),
                    outcome.reason(),
                    outcome.spy_name(),
                    outcome.location()
                ));
                self.events.emit(GameEvent::Finished(outcome.clone()));
                Ok(outcome)
            }
            Err(e) => {
                error!(error = %e, "Session aborted");
                self.events.emit(GameEvent::Aborted(format!("{e:#}")));
                Err(e)
            }
        }
    }

    async fn play(&mut self) -> Result<Outcome> {
        for (controller, me) in self.controllers.iter_mut().zip(&self.players) {
            controller.seated(&self.players, me).await?;
        }
        self.events.log(format!(
            "{} players seated. {} rounds of questions.",
            self.players.len(),
            self.rules.rounds()
        ));

        if let EarlyEnd::Ended { winner, reason } = self.run_turns().await? {
            info!(%winner, %reason, rounds = self.rounds_played, "Game ended early");
            let spy_guess = self.spy_guess.take();
            return Ok(Outcome::early(winner, reason, spy_guess, self.outcome_context()));
        }

        let tally = self.final_vote().await?;
        let accused = tally.accused().map(str::to_string);
        let spy_name = self.spy().name().clone();
        let when_caught = accused.as_deref() == Some(spy_name.as_str());

        let guessed_right = self.resolve_spy_guess(when_caught).await?;
        let (winner, reason) =
            resolve_winner(accused.as_deref(), tally.is_tie(), &spy_name, guessed_right);
        let spy_guess = self.spy_guess.take();
        Ok(Outcome::after_vote(
            winner,
            reason.to_string(),
            accused,
            tally.is_tie(),
            spy_guess,
            self.outcome_context(),
        ))
    }

    fn spy(&self) -> &Player {
        &self.players[self.spy_index]
    }

    fn name_of(&self, index: usize) -> String {
        self.players[index].name().clone()
    }

    fn outcome_context(&mut self) -> OutcomeContext {
        OutcomeContext {
            spy_name: self.spy().name().clone(),
            location: self.location.name().clone(),
            rounds_played: self.rounds_played,
            turns: std::mem::take(&mut self.transcript),
        }
    }
}
