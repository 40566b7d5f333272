//! Validation of guesses typed at a prompt.

use crate::constants::{MAX_GUESS, MIN_GUESS};

/// Why a typed guess was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GuessInputError {
    /// Nothing was typed
    #[error("Number missing")]
    Missing,
    /// The input is not a number
    #[error("Invalid number")]
    Invalid,
    /// The input has a fractional part
    #[error("Number must be an integer")]
    NotInteger,
    /// The input is outside the accepted range
    #[error("Number must be between 0 and 255")]
    OutOfRange,
}

/// Parses a guess typed by the player.
pub fn parse_guess(input: &str) -> Result<u8, GuessInputError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(GuessInputError::Missing);
    }
    let value: f64 = input.parse().map_err(|_| GuessInputError::Invalid)?;
    if value.is_nan() {
        return Err(GuessInputError::Invalid);
    }
    if value.fract() != 0.0 || value.is_infinite() {
        return Err(GuessInputError::NotInteger);
    }
    if value < f64::from(MIN_GUESS) || value > f64::from(MAX_GUESS) {
        return Err(GuessInputError::OutOfRange);
    }
    Ok(value as u8)
}
