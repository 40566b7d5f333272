use alloy_primitives::{Address, TxHash};

use crate::node::NodeError;

/// Error types for transaction resolution, submission and game play
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request's `from` does not match the signing identity (argument mismatch)
    #[error("from address mismatch (argument=\"transaction\", expected {expected}, got {actual})")]
    FromMismatch {
        /// Address of the signing identity
        expected: Address,
        /// Address the request's `from` resolved to
        actual: Address,
    },

    /// A name could not be resolved to an address
    #[error("could not resolve name {0:?} to an address")]
    UnresolvedName(String),

    /// A value of unrecognized shape was handed to the structural copy
    #[error("assertion error: unsupported value {0}")]
    UnsupportedValue(String),

    /// A hex address that fails its checksum
    #[error("invalid address {input:?}: {reason}")]
    InvalidAddress {
        /// The address as given
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// Node or transport failure, passed through unchanged
    #[error(transparent)]
    Node(#[from] NodeError),

    /// ABI encoding or decoding failure
    #[error("ABI error: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    /// The player has no game on the contract
    #[error("no game found for player {0}")]
    GameNotFound(Address),

    /// A guess was submitted before the game was created
    #[error("the game has not been started")]
    GameNotStarted,

    /// A guess was submitted after the game finished
    #[error("the game is already finished")]
    GameOver,

    /// A transaction was included but reverted
    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    /// A transaction was not included within the configured timeout
    #[error("timed out waiting for transaction {0}")]
    ReceiptTimeout(TxHash),

    /// The faucet could not fund the address
    #[error("faucet error: {0}")]
    Faucet(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Faucet(err.to_string())
    }
}

/// Result type for the game client
pub type Result<T, E = Error> = std::result::Result<T, E>;
