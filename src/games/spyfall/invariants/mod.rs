//! First-class invariants for Spyfall.
//!
//! Invariants are logical properties that must hold throughout a session.
//! The orchestrator checks them in debug builds; tests check them directly.

use derive_more::{Display, Error};

mod secrets;
mod transcript;

pub use secrets::SecretUniqueness;
pub use transcript::TargetLegality;

/// A logical property that must hold for a given state.
pub trait Invariant<S: ?Sized> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("invariant violated: {description}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Checks a single invariant, turning a failure into a violation.
pub fn check<S: ?Sized, I: Invariant<S>>(state: &S) -> Result<(), InvariantViolation> {
    if I::holds(state) {
        Ok(())
    } else {
        Err(InvariantViolation::new(I::description()))
    }
}
