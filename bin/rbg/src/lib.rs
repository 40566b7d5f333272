//! Command-line client for the `RngBinaryGame` guessing contract.
//!
//! Every subcommand connects to a node, picks the player account and talks to the game contract
//! through [`rng_game`].

mod cmd;
pub use cmd::*;

/// Argument groups, logging and errors shared by all subcommands
pub mod common;

/// Interactive game loop
pub mod play;

mod auto;
mod fund;
mod send;
mod state;

pub use auto::Cmd as AutoCmd;
pub use fund::Cmd as FundCmd;
pub use send::Cmd as SendCmd;
pub use state::Cmd as StateCmd;
