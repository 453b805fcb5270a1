//! Seating and dealing: one spy, distinct civilian roles.

use super::invariants::{self, SecretUniqueness};
use super::rules::normalize_name;
use super::{Location, Player, PlayerId, PlayerSecret};
use derive_more::{Display, Error};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// Fewest players a session can seat.
pub const MIN_PLAYERS: usize = 2;

/// A seat waiting to be dealt a secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatSpec {
    /// Display name.
    pub name: String,
    /// Whether a person controls the seat.
    pub is_human: bool,
}

impl SeatSpec {
    /// Creates a seat spec.
    pub fn new(name: impl Into<String>, is_human: bool) -> Self {
        Self {
            name: name.into(),
            is_human,
        }
    }
}

/// Checks the roster can be dealt at `location`.
#[instrument(skip(seats, location), fields(seats = seats.len(), location = %location.name()))]
pub fn validate_seats(seats: &[SeatSpec], location: &Location) -> Result<(), SetupError> {
    if seats.len() < MIN_PLAYERS {
        return Err(SetupError::new(format!(
            "Need at least {} players, got {}",
            MIN_PLAYERS,
            seats.len()
        )));
    }

    let civilians = seats.len() - 1;
    if location.roles().len() < civilians {
        return Err(SetupError::new(format!(
            "Location '{}' has {} roles but {} civilians need one each",
            location.name(),
            location.roles().len(),
            civilians
        )));
    }

    check_names(seats.iter().map(|seat| seat.name.as_str()))
}

/// Rejects names that cannot be told apart once normalized for matching,
/// or that normalize to nothing.
#[instrument(skip(names))]
pub fn check_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<(), SetupError> {
    let mut seen = HashSet::new();
    for name in names {
        let key = normalize_name(name);
        if key.is_empty() {
            return Err(SetupError::new(format!(
                "Player name '{}' has no matchable characters",
                name.trim()
            )));
        }
        if !seen.insert(key) {
            return Err(SetupError::new(format!(
                "Duplicate player name '{}'",
                name.trim()
            )));
        }
    }
    Ok(())
}

/// Deals secrets with a uniformly random spy.
#[instrument(skip(seats, location, rng), fields(seats = seats.len(), location = %location.name()))]
pub fn deal<R: Rng + ?Sized>(
    seats: &[SeatSpec],
    location: &Location,
    rng: &mut R,
) -> Result<Vec<Player>, SetupError> {
    validate_seats(seats, location)?;
    let spy_index = rng.gen_range(0..seats.len());
    deal_with_spy(seats, location, spy_index, rng)
}

/// Deals secrets with the spy at a fixed seat. Roles are drawn without
/// replacement from the location's pool.
#[instrument(skip(seats, location, rng), fields(seats = seats.len(), location = %location.name()))]
pub fn deal_with_spy<R: Rng + ?Sized>(
    seats: &[SeatSpec],
    location: &Location,
    spy_index: usize,
    rng: &mut R,
) -> Result<Vec<Player>, SetupError> {
    validate_seats(seats, location)?;
    if spy_index >= seats.len() {
        return Err(SetupError::new(format!(
            "Spy seat {} is outside a roster of {}",
            spy_index,
            seats.len()
        )));
    }

    let mut roles = location.roles().clone();
    roles.shuffle(rng);
    let mut roles = roles.into_iter();

    let mut players = Vec::with_capacity(seats.len());
    for (index, seat) in seats.iter().enumerate() {
        let secret = if index == spy_index {
            PlayerSecret::Spy
        } else {
            let role = roles
                .next()
                .ok_or_else(|| SetupError::new("Ran out of roles while dealing"))?;
            PlayerSecret::Civilian {
                location: location.name().clone(),
                role,
            }
        };
        debug!(seat = index, name = %seat.name, spy = secret.is_spy(), "Dealt seat");
        players.push(Player::new(
            PlayerId::from(index),
            seat.name.trim(),
            seat.is_human,
            secret,
        ));
    }

    invariants::check::<[Player], SecretUniqueness>(&players)
        .map_err(|v| SetupError::new(v.to_string()))?;

    info!(players = players.len(), "Roles dealt");
    Ok(players)
}

/// Setup error.
#[derive(Debug, Clone, Display, Error)]
#[display("Setup error: {} at {}:{}", message, file, line)]
pub struct SetupError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SetupError {
    /// Creates a new setup error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
