use clap::Parser;

use crate::common::LogArgs;

/// Main command enumeration for the rbg CLI tool
#[derive(Parser, Debug)]
#[command(name = "rbg", infer_subcommands = true, version)]
#[allow(clippy::large_enum_variant)]
pub enum MainCmd {
    /// Play a game interactively
    Play(crate::play::Cmd),
    /// Let the client play a game by bisection
    Auto(crate::AutoCmd),
    /// Fund the player account if it has no balance
    Fund(crate::FundCmd),
    /// Print the player's current game
    State(crate::StateCmd),
    /// Resolve and send an arbitrary transaction through the unchecked path
    Send(crate::SendCmd),
}

/// Error types for the main command system
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error raised by a subcommand
    #[error("{0}")]
    Rbg(#[from] crate::common::RbgError),
}

impl MainCmd {
    /// Execute the main command
    pub async fn run(&self) -> Result<(), Error> {
        self.log_args().init()?;
        match self {
            Self::Play(cmd) => cmd.run().await?,
            Self::Auto(cmd) => cmd.run().await?,
            Self::Fund(cmd) => cmd.run().await?,
            Self::State(cmd) => cmd.run().await?,
            Self::Send(cmd) => cmd.run().await?,
        }
        Ok(())
    }

    const fn log_args(&self) -> &LogArgs {
        match self {
            Self::Play(cmd) => &cmd.log_args,
            Self::Auto(cmd) => &cmd.log_args,
            Self::Fund(cmd) => &cmd.log_args,
            Self::State(cmd) => &cmd.log_args,
            Self::Send(cmd) => &cmd.log_args,
        }
    }
}
