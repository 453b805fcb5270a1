//! Location packs: named locations and their role pools.

use derive_getters::Getters;
use derive_more::{Display, Error};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, instrument};

/// A location and the roles civilians can hold there.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Location {
    /// Location name, e.g. "Airplane".
    name: String,
    /// Distinguishable roles.
    roles: Vec<String>,
}

impl Location {
    /// Creates a location.
    pub fn new(name: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            name: name.into(),
            roles,
        }
    }
}

/// A named collection of locations.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct LocationPack {
    /// Pack name.
    name: String,
    /// Locations in the pack.
    locations: Vec<Location>,
}

const CLASSIC: &[(&str, &[&str])] = &[
    (
        "Airplane",
        &["First Class Passenger", "Air Marshal", "Mechanic", "Economy Passenger", "Flight Attendant", "Co-Pilot", "Captain"],
    ),
    (
        "Bank",
        &["Armored Car Driver", "Manager", "Consultant", "Customer", "Robber", "Security Guard", "Teller"],
    ),
    (
        "Beach",
        &["Beach Waitress", "Kite Surfer", "Lifeguard", "Thief", "Beach Goer", "Beach Photographer", "Ice Cream Truck Driver"],
    ),
    (
        "Casino",
        &["Bartender", "Head Security Guard", "Bouncer", "Manager", "Hustler", "Dealer", "Gambler"],
    ),
    (
        "Hospital",
        &["Nurse", "Doctor", "Anesthesiologist", "Intern", "Patient", "Therapist", "Surgeon"],
    ),
    (
        "Military Base",
        &["Deserter", "Colonel", "Medic", "Soldier", "Sniper", "Officer", "Tank Engineer"],
    ),
    (
        "Movie Studio",
        &["Stunt Man", "Sound Engineer", "Camera Man", "Director", "Costume Artist", "Actor", "Producer"],
    ),
    (
        "Pirate Ship",
        &["Cook", "Sailor", "Slave", "Cannoneer", "Bound Prisoner", "Cabin Boy", "Brave Captain"],
    ),
    (
        "Restaurant",
        &["Musician", "Customer", "Bouncer", "Hostess", "Head Chef", "Food Critic", "Waiter"],
    ),
    (
        "School",
        &["Gym Teacher", "Student", "Principal", "Security Guard", "Janitor", "Lunch Lady", "Maintenance Man"],
    ),
    (
        "Space Station",
        &["Engineer", "Alien", "Space Tourist", "Pilot", "Commander", "Scientist", "Doctor"],
    ),
    (
        "Submarine",
        &["Cook", "Commander", "Sonar Technician", "Electronics Technician", "Sailor", "Radioman", "Navigator"],
    ),
];

impl LocationPack {
    /// Creates and validates a pack.
    #[instrument(skip_all, fields(count = locations.len()))]
    pub fn new(name: impl Into<String>, locations: Vec<Location>) -> Result<Self, LocationError> {
        let pack = Self {
            name: name.into(),
            locations,
        };
        pack.validate()?;
        Ok(pack)
    }

    /// The classic built-in pack.
    #[instrument]
    pub fn classic() -> Self {
        let locations = CLASSIC
            .iter()
            .map(|(name, roles)| {
                Location::new(*name, roles.iter().map(|r| r.to_string()).collect())
            })
            .collect();
        debug!(count = CLASSIC.len(), "Built classic location pack");
        Self {
            name: "Classic".to_string(),
            locations,
        }
    }

    /// Loads a pack from a TOML file.
    ///
    /// ```toml
    /// name = "Custom"
    ///
    /// [[locations]]
    /// name = "Library"
    /// roles = ["Librarian", "Student", "Author"]
    /// ```
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LocationError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| LocationError::new(format!("Failed to read location pack: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses a pack from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, LocationError> {
        let pack: Self = toml::from_str(content)
            .map_err(|e| LocationError::new(format!("Failed to parse location pack: {}", e)))?;
        pack.validate()?;
        info!(name = %pack.name, count = pack.locations.len(), "Location pack loaded");
        Ok(pack)
    }

    /// Checks names are present and unique.
    #[instrument(skip(self), fields(pack = %self.name))]
    pub fn validate(&self) -> Result<(), LocationError> {
        if self.locations.is_empty() {
            return Err(LocationError::new(format!(
                "Location pack '{}' has no locations",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for location in &self.locations {
            let name = location.name.trim();
            if name.is_empty() {
                return Err(LocationError::new("Location with empty name"));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(LocationError::new(format!("Duplicate location '{}'", name)));
            }
            if location.roles.is_empty() {
                return Err(LocationError::new(format!("Location '{}' has no roles", name)));
            }

            let mut roles = HashSet::new();
            for role in &location.roles {
                if role.trim().is_empty() {
                    return Err(LocationError::new(format!(
                        "Location '{}' has an empty role",
                        name
                    )));
                }
                if !roles.insert(role.trim().to_lowercase()) {
                    return Err(LocationError::new(format!(
                        "Location '{}' lists role '{}' twice",
                        name, role
                    )));
                }
            }
        }
        Ok(())
    }

    /// Names of every location, in pack order.
    pub fn location_names(&self) -> Vec<String> {
        self.locations.iter().map(|l| l.name.clone()).collect()
    }

    /// Picks a location uniformly at random.
    #[instrument(skip(self, rng), fields(pack = %self.name))]
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&Location, LocationError> {
        self.locations
            .choose(rng)
            .ok_or_else(|| LocationError::new(format!("Location pack '{}' is empty", self.name)))
    }

    /// Looks up a location by name, case-insensitively.
    #[instrument(skip(self))]
    pub fn get(&self, name: &str) -> Option<&Location> {
        let wanted = name.trim().to_lowercase();
        self.locations
            .iter()
            .find(|l| l.name.to_lowercase() == wanted)
    }
}

impl Default for LocationPack {
    fn default() -> Self {
        Self::classic()
    }
}

/// Location pack error.
#[derive(Debug, Clone, Display, Error)]
#[display("Location error: {} at {}:{}", message, file, line)]
pub struct LocationError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LocationError {
    /// Creates a new location error.
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
