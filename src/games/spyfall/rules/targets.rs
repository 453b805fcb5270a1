//! Name resolution and target legality.

use super::super::{Player, PlayerId};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

/// How a target was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetResolution {
    /// The nominated name was legal and used.
    Nominated(PlayerId),
    /// The nomination was missing, unknown, or illegal; a random legal target was drawn.
    Fallback(PlayerId),
}

impl TargetResolution {
    /// The chosen player.
    pub fn id(self) -> PlayerId {
        match self {
            TargetResolution::Nominated(id) | TargetResolution::Fallback(id) => id,
        }
    }

    /// Whether the nomination had to be replaced.
    pub fn is_fallback(self) -> bool {
        matches!(self, TargetResolution::Fallback(_))
    }
}

/// Normalizes a name for comparison: trimmed, lowercased, with quotes,
/// markdown emphasis, and trailing punctuation stripped.
#[instrument]
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '*' | '`' | '.' | ',' | '!' | '?' | ':' | ';'))
        .trim()
        .to_lowercase()
}

/// Finds a player by name. Both sides are normalized, so a seated
/// "Dr. No." answers to "dr. no" as well as to its exact spelling.
#[instrument(skip(players))]
pub fn find_by_name<'a>(players: &'a [Player], name: &str) -> Option<&'a Player> {
    let wanted = normalize_name(name);
    if wanted.is_empty() {
        return None;
    }
    players.iter().find(|p| normalize_name(p.name()) == wanted)
}

/// Players the asker may legally question: neither themself nor the
/// player who just asked them. In two-player games the second condition
/// cannot be met, so everyone but the asker is legal.
#[instrument(skip(players))]
pub fn legal_targets(players: &[Player], asker: PlayerId, last_asker: Option<PlayerId>) -> Vec<PlayerId> {
    let strict: Vec<PlayerId> = players
        .iter()
        .map(|p| p.id())
        .filter(|&id| id != asker && Some(id) != last_asker)
        .collect();
    if !strict.is_empty() {
        return strict;
    }
    others(players, asker)
}

/// Every player except `me`.
pub fn others(players: &[Player], me: PlayerId) -> Vec<PlayerId> {
    players.iter().map(|p| p.id()).filter(|&id| id != me).collect()
}

/// Resolves a nominated question target, falling back to a uniformly random
/// legal target when the nomination is missing, unknown, or illegal.
///
/// Returns `None` only when the roster has no one but the asker.
#[instrument(skip(players, rng))]
pub fn resolve_question_target<R: Rng + ?Sized>(
    players: &[Player],
    asker: PlayerId,
    last_asker: Option<PlayerId>,
    nominated: &str,
    rng: &mut R,
) -> Option<TargetResolution> {
    let legal = legal_targets(players, asker, last_asker);
    if let Some(player) = find_by_name(players, nominated) {
        if legal.contains(&player.id()) {
            return Some(TargetResolution::Nominated(player.id()));
        }
        debug!(nominated, "Nominated target is illegal");
    } else {
        debug!(nominated, "Nominated target does not resolve");
    }
    legal.choose(rng).copied().map(TargetResolution::Fallback)
}

/// Resolves a vote for "anyone but me", falling back to a uniformly random
/// other player.
#[instrument(skip(players, rng))]
pub fn resolve_vote_target<R: Rng + ?Sized>(
    players: &[Player],
    voter: PlayerId,
    nominated: &str,
    rng: &mut R,
) -> Option<TargetResolution> {
    if let Some(player) = find_by_name(players, nominated) {
        if player.id() != voter {
            return Some(TargetResolution::Nominated(player.id()));
        }
        debug!(nominated, "Self-vote replaced");
    }
    others(players, voter)
        .choose(rng)
        .copied()
        .map(TargetResolution::Fallback)
}
