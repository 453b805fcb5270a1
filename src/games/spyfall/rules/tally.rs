//! End-of-rounds vote tally.

use std::collections::HashMap;
use tracing::{debug, instrument};

/// Result of reading a tally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TallyResult {
    /// One name has strictly more votes than any other.
    Accused {
        /// The singled-out player.
        name: String,
        /// Their vote count.
        votes: usize,
    },
    /// The top two counts are equal (or nobody voted).
    Tie,
}

impl TallyResult {
    /// The accused name, if any.
    pub fn accused(&self) -> Option<&str> {
        match self {
            TallyResult::Accused { name, .. } => Some(name),
            TallyResult::Tie => None,
        }
    }

    /// Whether the vote tied.
    pub fn is_tie(&self) -> bool {
        matches!(self, TallyResult::Tie)
    }
}

/// Votes per accused name, scoped to one voting phase.
#[derive(Debug, Clone, Default)]
pub struct VoteTally {
    counts: HashMap<String, usize>,
}

impl VoteTally {
    /// Creates an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one vote against `name`.
    #[instrument(skip(self))]
    pub fn record(&mut self, name: &str) {
        *self.counts.entry(name.to_string()).or_insert(0) += 1;
    }

    /// Votes against `name`.
    pub fn count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Total votes cast.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Counts sorted descending, ties broken by name for stable display.
    pub fn sorted(&self) -> Vec<(String, usize)> {
        let mut entries: Vec<(String, usize)> =
            self.counts.iter().map(|(n, c)| (n.clone(), *c)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }

    /// Reads the tally: equal top two counts are a tie, never broken at random.
    #[instrument(skip(self))]
    pub fn result(&self) -> TallyResult {
        let sorted = self.sorted();
        let result = match sorted.as_slice() {
            [] => TallyResult::Tie,
            [(first, n1), (_, n2), ..] if n1 == n2 => {
                debug!(name = %first, votes = n1, "Top counts tied");
                TallyResult::Tie
            }
            [(first, n1), ..] => TallyResult::Accused {
                name: first.clone(),
                votes: *n1,
            },
        };
        debug!(?result, "Tally read");
        result
    }
}
