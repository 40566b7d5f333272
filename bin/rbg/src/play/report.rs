//! What the player sees after each guess.

use rng_game::{
    constants::{MAX_GUESSES, MAX_GUESS, MIN_GUESS},
    game::{Feedback, GameState, Outcome},
};

/// Greeting printed before the first prompt.
pub fn welcome() -> String {
    format!(
        "\n\nStep right up, I'm thinking of a number between {MIN_GUESS} and {MAX_GUESS} \
         inclusive!\nYou have {MAX_GUESSES} guesses, after each guess I'll tell you if your \
         number was too high or too low.\nGood luck!"
    )
}

/// Describes the latest guess, and how the game ended if it did.
pub fn report(state: &GameState) -> Vec<String> {
    let mut lines = Vec::new();
    let Some(last) = state.last() else {
        return lines;
    };

    match last.feedback() {
        Feedback::TooHigh => lines.push(format!("Ouch, {} is too high", last.guess)),
        Feedback::TooLow => lines.push(format!("Yikes, {} is too low", last.guess)),
        Feedback::Correct => {
            lines.push(format!("Congratulations, {} is correct!", last.guess));
            lines.push(format!("You got it in {} guesses!", state.len()));
        }
    }
    if state.outcome() == Some(Outcome::Exhausted) {
        lines.push(format!(
            "\nOh no! You've run out of your {MAX_GUESSES} guesses, better luck next time!"
        ));
    }
    lines
}

/// Farewell printed when the game is over.
pub const GOODBYE: &str = "\nGoodbye! Thanks for playing!";
