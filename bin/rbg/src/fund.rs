use clap::Parser;
use rng_game::faucet::ensure_funded;

use crate::common::{FaucetArgs, LogArgs, NodeArgs, Result};

/// Fund the player account if it has no balance
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Node connection
    #[command(flatten)]
    pub node_args: NodeArgs,

    /// Funding
    #[command(flatten)]
    pub faucet_args: FaucetArgs,

    /// Logging
    #[command(flatten)]
    pub log_args: LogArgs,
}

impl Cmd {
    /// Execute the fund command
    pub async fn run(&self) -> Result<()> {
        let identity = self.node_args.connect().await?;
        if ensure_funded(&identity, &self.faucet_args.faucet()).await? {
            println!("Requested funds for {}", identity.address());
        }
        println!("Balance of {}: {} wei", identity.address(), identity.balance().await?);
        Ok(())
    }
}
