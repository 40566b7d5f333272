use clap::Parser;
use rng_game::{
    faucet::ensure_funded,
    game::{play_bisection, GameSession, Outcome},
};

use crate::common::{FaucetArgs, GameArgs, LogArgs, NodeArgs, ReceiptArgs, Result, SubmitArgs};

/// Let the client play a game by bisection
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Continue the player's current game instead of creating a new one
    #[arg(long = "resume")]
    pub resume: bool,

    /// Node connection
    #[command(flatten)]
    pub node_args: NodeArgs,

    /// Game contract location
    #[command(flatten)]
    pub game_args: GameArgs,

    /// Funding
    #[command(flatten)]
    pub faucet_args: FaucetArgs,

    /// Submission path
    #[command(flatten)]
    pub submit_args: SubmitArgs,

    /// Receipt polling
    #[command(flatten)]
    pub receipt_args: ReceiptArgs,

    /// Logging
    #[command(flatten)]
    pub log_args: LogArgs,
}

impl Cmd {
    /// Execute the auto command
    pub async fn run(&self) -> Result<()> {
        let identity = self.node_args.connect().await?;
        ensure_funded(&identity, &self.faucet_args.faucet()).await?;
        let contract = self.game_args.contract()?;

        let mut session = GameSession::new(identity, contract)
            .with_submit_path(self.submit_args.submit_path(&self.node_args))
            .with_receipt_policy(self.receipt_args.receipt_policy());
        if self.resume {
            session.refresh().await?;
        } else {
            session.start().await?;
        }

        let outcome = play_bisection(&mut session).await?;

        for (index, record) in session.state().records().iter().enumerate() {
            println!("{:>2}. {record}", index + 1);
        }
        match outcome {
            Outcome::Correct { attempts } => println!("Found the number in {attempts} guesses"),
            Outcome::Exhausted => println!("Ran out of guesses"),
        }
        Ok(())
    }
}
