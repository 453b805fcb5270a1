//! Conviction threshold for accusations.

use tracing::instrument;

/// Yes votes needed to convict: a strict majority of the whole roster,
/// `floor(n / 2) + 1`. The accuser's and the accused's fixed ballots are
/// part of the roster and count toward `n`.
#[instrument]
pub fn conviction_threshold(roster_size: usize) -> usize {
    roster_size / 2 + 1
}

/// Whether `yes_votes` out of `roster_size` convicts.
#[instrument]
pub fn is_convicted(yes_votes: usize, roster_size: usize) -> bool {
    yes_votes >= conviction_threshold(roster_size)
}
