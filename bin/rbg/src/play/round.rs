use rng_game::{game::GameSession, Node};
use tracing::warn;

use super::report;
use crate::common::Result;

/// What one round of the interactive loop shows the player.
#[derive(Debug)]
pub struct Round {
    /// The error the guess failed with, if it did.
    pub error: Option<rng_game::Error>,
    /// The report on the game after the guess.
    pub lines: Vec<String>,
}

/// Submits `guess` and reports on the game afterwards.
///
/// A failed guess does not end the game: it is logged, the session is re-read from the contract
/// and the error is handed back with the report. Only a failed re-read is returned as an error.
pub async fn play_round<N: Node>(session: &mut GameSession<N>, guess: u8) -> Result<Round> {
    let error = match session.guess(guess).await {
        Ok(_) => None,
        Err(e) => {
            warn!(guess, error = %e, "Guess failed");
            session.refresh().await?;
            Some(e)
        }
    };
    Ok(Round { error, lines: report(session.state()) })
}
