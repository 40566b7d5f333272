//! Automatic play by bisection.

use tracing::info;

use super::{Feedback, GameSession, GuessRecord, Outcome, Phase};
use crate::{
    constants::{MAX_GUESS, MIN_GUESS},
    node::Node,
    Error, Result,
};

/// Narrows the inclusive range the hidden number can still be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bisection {
    min: u8,
    max: u8,
}

impl Default for Bisection {
    fn default() -> Self {
        Self::new()
    }
}

impl Bisection {
    /// Starts with the full guess range.
    pub const fn new() -> Self {
        Self { min: MIN_GUESS, max: MAX_GUESS }
    }

    /// The midpoint of the remaining range, rounded up.
    pub const fn next_guess(&self) -> u8 {
        ((self.min as u16 + self.max as u16 + 1) / 2) as u8
    }

    /// The remaining inclusive range.
    pub const fn range(&self) -> (u8, u8) {
        (self.min, self.max)
    }

    /// Narrows the range with the feedback of one guess.
    pub fn observe(&mut self, record: &GuessRecord) {
        match record.feedback() {
            Feedback::TooHigh => self.max = record.guess.saturating_sub(1),
            Feedback::TooLow => self.min = record.guess.saturating_add(1),
            Feedback::Correct => {
                self.min = record.guess;
                self.max = record.guess;
            }
        }
    }
}

/// Plays a started session by bisection until it finishes.
///
/// Guesses already in the session narrow the range first, so a resumed game continues where it
/// left off.
pub async fn play_bisection<N: Node>(session: &mut GameSession<N>) -> Result<Outcome> {
    let mut bisection = Bisection::new();
    for record in session.state().records() {
        bisection.observe(record);
    }

    loop {
        match session.phase() {
            Phase::NotStarted => return Err(Error::GameNotStarted),
            Phase::Finished(outcome) => return Ok(outcome),
            Phase::AwaitingGuess => {}
        }

        let guess = bisection.next_guess();
        let state = session.guess(guess).await?;
        if let Some(record) = state.last() {
            info!(%record, attempt = state.len(), "Guessed");
            bisection.observe(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play_offline(target: u8) -> Vec<u8> {
        let mut bisection = Bisection::new();
        let mut guesses = Vec::new();
        loop {
            let record = GuessRecord::against(bisection.next_guess(), target);
            guesses.push(record.guess);
            if record.is_correct() {
                return guesses;
            }
            bisection.observe(&record);
        }
    }

    #[test]
    fn test_first_guesses() {
        assert_eq!(play_offline(255), [128, 192, 224, 240, 248, 252, 254, 255]);
        assert_eq!(play_offline(200), [128, 192, 224, 208, 200]);
    }

    #[test]
    fn test_every_target_within_bound() {
        for target in MIN_GUESS..=MAX_GUESS {
            let guesses = play_offline(target);
            assert!(guesses.len() <= 9, "target {target} took {} guesses", guesses.len());
            assert_eq!(guesses.last(), Some(&target));
        }
    }
}
