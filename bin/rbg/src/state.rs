use clap::Parser;
use rng_game::{
    game::{GameSession, Outcome, Phase},
    Error,
};

use crate::common::{GameArgs, LogArgs, NodeArgs, Result};

/// Print the player's current game
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Node connection
    #[command(flatten)]
    pub node_args: NodeArgs,

    /// Game contract location
    #[command(flatten)]
    pub game_args: GameArgs,

    /// Logging
    #[command(flatten)]
    pub log_args: LogArgs,
}

impl Cmd {
    /// Execute the state command
    pub async fn run(&self) -> Result<()> {
        let identity = self.node_args.connect().await?;
        let mut session = GameSession::new(identity, self.game_args.contract()?);

        match session.refresh().await {
            Ok(_) => {}
            Err(Error::GameNotFound(player)) => {
                println!("No game found for {player}");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }

        let state = session.state();
        if state.is_empty() {
            println!("No guesses yet");
        }
        for (index, record) in state.records().iter().enumerate() {
            println!("{:>2}. {record}", index + 1);
        }
        match session.phase() {
            Phase::Finished(Outcome::Correct { attempts }) => {
                println!("Solved in {attempts} guesses");
            }
            Phase::Finished(Outcome::Exhausted) => println!("Out of guesses"),
            Phase::AwaitingGuess | Phase::NotStarted => {}
        }
        Ok(())
    }
}
