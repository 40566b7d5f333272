use clap::Parser;
use dialoguer::Input;
use rng_game::{
    faucet::ensure_funded,
    game::{parse_guess, GameSession, Phase},
};
use super::{play_round, welcome, GOODBYE};
use crate::common::{
    FaucetArgs, GameArgs, LogArgs, NodeArgs, RbgError, ReceiptArgs, Result, SubmitArgs,
};

/// Play a game interactively
#[derive(Parser, Debug)]
pub struct Cmd {
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
    /// Execute the play command
    pub async fn run(&self) -> Result<()> {
        // Step 1: Connect and make sure the player can pay for gas
        let identity = self.node_args.connect().await?;
        ensure_funded(&identity, &self.faucet_args.faucet()).await?;

        // Step 2: Locate the contract before greeting, a missing deployment ends the game early
        let contract = self.game_args.contract()?;
        println!("{}", welcome());

        // Step 3: Create a fresh game
        let mut session = GameSession::new(identity, contract)
            .with_submit_path(self.submit_args.submit_path(&self.node_args))
            .with_receipt_policy(self.receipt_args.receipt_policy());
        session.start().await?;

        // Step 4: Prompt until the game is over
        while !matches!(session.phase(), Phase::Finished(_)) {
            println!(" ");
            let guess = prompt_guess().await?;
            println!(" ");

            let round = play_round(&mut session, guess).await?;
            if let Some(e) = &round.error {
                eprintln!("error {e}");
            }
            for line in &round.lines {
                println!("{line}");
            }
        }

        println!("{GOODBYE}");
        Ok(())
    }
}

/// Reads a guess from the terminal, re-prompting until it is valid.
async fn prompt_guess() -> Result<u8> {
    let input = tokio::task::spawn_blocking(|| {
        Input::<String>::new()
            .with_prompt("Guess the number")
            .allow_empty(true)
            .validate_with(|input: &String| parse_guess(input).map(|_| ()))
            .interact_text()
    })
    .await
    .map_err(|e| RbgError::Prompt(e.to_string()))??;
    parse_guess(&input).map_err(|e| RbgError::Prompt(e.to_string()))
}
