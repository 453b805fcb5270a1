//! Location guess comparison.

use tracing::instrument;

fn normalize(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    let words = match words.as_slice() {
        [article, rest @ ..] if !rest.is_empty() && matches!(*article, "the" | "a" | "an") => rest,
        all => all,
    };
    words.join(" ")
}

/// Whether `guess` names `location`. Case, surrounding and repeated
/// whitespace, and one leading article are ignored.
#[instrument]
pub fn guess_matches(guess: &str, location: &str) -> bool {
    let guess = normalize(guess);
    !guess.is_empty() && guess == normalize(location)
}
