//! Snapshots of a game as stored by the contract.

use std::fmt;

use crate::constants::MAX_GUESSES;

/// Feedback the contract gives for one guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// The guess is above the hidden number.
    TooHigh,
    /// The guess is below the hidden number.
    TooLow,
    /// The guess is the hidden number.
    Correct,
}

/// One guess and its feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuessRecord {
    /// The guessed value.
    pub guess: u8,
    /// Set when the guess is above the hidden number.
    pub too_high: bool,
    /// Set when the guess is below the hidden number.
    pub too_low: bool,
}

impl GuessRecord {
    /// Creates the record the contract stores for `guess` against `target`.
    pub const fn against(guess: u8, target: u8) -> Self {
        Self { guess, too_high: guess > target, too_low: guess < target }
    }

    /// Interprets the flags. A record with neither flag set is correct.
    pub const fn feedback(&self) -> Feedback {
        if self.too_high {
            Feedback::TooHigh
        } else if self.too_low {
            Feedback::TooLow
        } else {
            Feedback::Correct
        }
    }

    /// Returns `true` if the guess hit the hidden number.
    pub const fn is_correct(&self) -> bool {
        matches!(self.feedback(), Feedback::Correct)
    }
}

impl fmt::Display for GuessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.feedback() {
            Feedback::TooHigh => write!(f, "{} - too high", self.guess),
            Feedback::TooLow => write!(f, "{} - too low", self.guess),
            Feedback::Correct => write!(f, "{} - correct!", self.guess),
        }
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The hidden number was found after `attempts` guesses.
    Correct {
        /// Number of guesses it took.
        attempts: usize,
    },
    /// All guesses were used without finding the hidden number.
    Exhausted,
}

/// The ordered guesses of one game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    records: Vec<GuessRecord>,
}

impl GameState {
    /// Wraps the records returned by the contract.
    pub const fn new(records: Vec<GuessRecord>) -> Self {
        Self { records }
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[GuessRecord] {
        &self.records
    }

    /// The most recent record.
    pub fn last(&self) -> Option<&GuessRecord> {
        self.records.last()
    }

    /// Number of guesses made so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no guess has been made.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns how the game ended, or `None` while guesses remain.
    ///
    /// A correct last guess wins even when it used up the final attempt.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.last() {
            Some(last) if last.is_correct() => Some(Outcome::Correct { attempts: self.len() }),
            _ if self.len() >= MAX_GUESSES => Some(Outcome::Exhausted),
            _ => None,
        }
    }

    /// Appends a record.
    pub fn push(&mut self, record: GuessRecord) {
        self.records.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback() {
        assert_eq!(GuessRecord::against(200, 100).feedback(), Feedback::TooHigh);
        assert_eq!(GuessRecord::against(0, 100).feedback(), Feedback::TooLow);
        assert_eq!(GuessRecord::against(100, 100).feedback(), Feedback::Correct);
    }

    #[test]
    fn test_outcome() {
        let mut state = GameState::default();
        assert_eq!(state.outcome(), None);

        for guess in 0..11 {
            state.push(GuessRecord::against(guess, 255));
        }
        assert_eq!(state.outcome(), None);

        let mut exhausted = state.clone();
        exhausted.push(GuessRecord::against(11, 255));
        assert_eq!(exhausted.outcome(), Some(Outcome::Exhausted));

        state.push(GuessRecord::against(255, 255));
        assert_eq!(state.outcome(), Some(Outcome::Correct { attempts: 12 }));
    }
}
