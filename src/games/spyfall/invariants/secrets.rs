//! Invariant: exactly one spy, one shared location, distinct roles.

use super::Invariant;
use crate::games::spyfall::{Player, PlayerSecret};
use std::collections::HashSet;
use tracing::{instrument, warn};

/// Exactly one player is the spy; every civilian names the same location
/// and no two civilians share a role.
pub struct SecretUniqueness;

impl Invariant<[Player]> for SecretUniqueness {
    #[instrument(skip(players), fields(count = players.len()))]
    fn holds(players: &[Player]) -> bool {
        let spies = players.iter().filter(|p| p.is_spy()).count();
        if spies != 1 {
            warn!(spies, "Expected exactly one spy");
            return false;
        }

        let mut location: Option<&str> = None;
        let mut roles = HashSet::new();
        for player in players {
            if let PlayerSecret::Civilian {
                location: loc,
                role,
            } = player.secret()
            {
                match location {
                    Some(shared) if shared != loc.as_str() => {
                        warn!(shared, other = %loc, "Civilians disagree on location");
                        return false;
                    }
                    _ => location = Some(loc.as_str()),
                }
                if !roles.insert(role.as_str()) {
                    warn!(role = %role, "Role dealt twice");
                    return false;
                }
            }
        }
        true
    }

    fn description() -> &'static str {
        "exactly one spy, one shared location, and distinct civilian roles"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::spyfall::PlayerId;

    fn civ(id: usize, role: &str, location: &str) -> Player {
        Player::new(
            PlayerId::from(id),
            format!("P{id}"),
            false,
            PlayerSecret::Civilian {
                location: location.to_string(),
                role: role.to_string(),
            },
        )
    }

    fn spy(id: usize) -> Player {
        Player::new(PlayerId::from(id), format!("P{id}"), false, PlayerSecret::Spy)
    }

    #[test]
    fn test_valid_deal() {
        let players = vec![civ(0, "Pilot", "Airplane"), spy(1), civ(2, "Mechanic", "Airplane")];
        assert!(SecretUniqueness::holds(&players));
    }

    #[test]
    fn test_two_spies() {
        let players = vec![spy(0), spy(1), civ(2, "Pilot", "Airplane")];
        assert!(!SecretUniqueness::holds(&players));
    }

    #[test]
    fn test_no_spy() {
        let players = vec![civ(0, "Pilot", "Airplane"), civ(1, "Mechanic", "Airplane")];
        assert!(!SecretUniqueness::holds(&players));
    }

    #[test]
    fn test_duplicate_role() {
        let players = vec![spy(0), civ(1, "Pilot", "Airplane"), civ(2, "Pilot", "Airplane")];
        assert!(!SecretUniqueness::holds(&players));
    }

    #[test]
    fn test_mixed_locations() {
        let players = vec![spy(0), civ(1, "Pilot", "Airplane"), civ(2, "Teller", "Bank")];
        assert!(!SecretUniqueness::holds(&players));
    }
}
