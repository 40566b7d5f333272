use std::path::PathBuf;

use rng_game::constants::GAME_CONTRACT_NAME;

/// Error types for the rbg subcommands
#[derive(Debug, thiserror::Error)]
pub enum RbgError {
    /// Game client error
    #[error(transparent)]
    Game(#[from] rng_game::Error),

    /// Invalid private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// No deployment recorded for the game contract
    #[error(
        "No deployment found for {} on network {network} ({}){}",
        GAME_CONTRACT_NAME,
        path.display(),
        ephemeral_network_hint(network)
    )]
    DeploymentNotFound {
        /// Network the deployment was looked up for
        network: String,
        /// Deployment file that was expected
        path: PathBuf,
    },

    /// Deployment file without a usable address
    #[error("Invalid deployment file {}: {reason}", path.display())]
    InvalidDeployment {
        /// The deployment file
        path: PathBuf,
        /// Why it could not be used
        reason: String,
    },

    /// Failed to read or write a file
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid transaction JSON
    #[error("Invalid transaction JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The terminal prompt failed
    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl From<dialoguer::Error> for RbgError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Prompt(err.to_string())
    }
}

/// Hardhat's in-process network forgets its deployments when the process exits.
fn ephemeral_network_hint(network: &str) -> &'static str {
    if network == "hardhat" {
        ". You're running on Hardhat network, which is ephemeral. Contracts you deployed with \
         deploy scripts are not available. Either run a persistent local node and use \
         --network localhost, or deploy the contract before playing"
    } else {
        ""
    }
}

/// Result type for the rbg subcommands
pub type Result<T> = std::result::Result<T, RbgError>;
