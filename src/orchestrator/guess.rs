//! The spy's location guess, voluntary or forced.

use super::GameSession;
use crate::games::spyfall::rules::guess_matches;
use crate::games::spyfall::{EarlyEnd, Winner};
use anyhow::Result;
use tracing::{info, instrument};

/// The spy revealed themselves and named the location.
pub const REASON_VOLUNTARY_RIGHT: &str = "spy correctly guessed the location";
/// The spy revealed themselves and missed.
pub const REASON_VOLUNTARY_WRONG: &str = "spy guessed the wrong location";

impl GameSession {
    /// Asks the spy for a guess and reports whether it names the location.
    /// A missing or blank guess counts as wrong.
    #[instrument(skip(self))]
    pub(super) async fn resolve_spy_guess(&mut self, when_caught: bool) -> Result<bool> {
        let s = self.spy_index;
        let spy_name = self.name_of(s);
        let guess = self.controllers[s]
            .guess_location(&self.transcript, &self.players[s], when_caught)
            .await?
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty());

        let correct = guess
            .as_deref()
            .is_some_and(|g| guess_matches(g, self.location.name()));
        match &guess {
            Some(g) => self.events.log(format!(
                "{spy_name} guesses the location is {g}. {}",
                if correct { "Correct!" } else { "Wrong." }
            )),
            None => self
                .events
                .log(format!("{spy_name} could not name a location.")),
        }
        info!(when_caught, correct, "Spy guess resolved");
        self.spy_guess = guess;
        Ok(correct)
    }

    /// The spy's voluntary reveal. Always ends the game.
    #[instrument(skip(self))]
    pub(super) async fn voluntary_guess(&mut self) -> Result<EarlyEnd> {
        self.events.log(format!(
            "{} reveals themselves as the spy!",
            self.spy().name()
        ));
        let end = if self.resolve_spy_guess(false).await? {
            EarlyEnd::ended(Winner::Spy, REASON_VOLUNTARY_RIGHT)
        } else {
            EarlyEnd::ended(Winner::Civilians, REASON_VOLUNTARY_WRONG)
        };
        Ok(end)
    }
}
