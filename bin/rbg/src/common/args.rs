//! Argument groups shared between subcommands

use std::{path::PathBuf, str::FromStr, time::Duration};

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use clap::{Parser, ValueEnum};
use reqwest::Url;
use rng_game::{
    constants::{DEFAULT_FAUCET_URL, DEFAULT_RPC_URL},
    faucet::{AnyFaucet, DevNodeFaucet, HttpFaucet, NoFaucet},
    game::{GameContract, ReceiptPolicy, SubmitPath},
    AlloyNode, SigningIdentity,
};
use tracing::{info, warn};

use super::{load_game_address, RbgError, Result};

/// Node connection arguments
#[derive(Parser, Debug, Clone)]
#[command(next_help_heading = "Node")]
pub struct NodeArgs {
    /// JSON-RPC endpoint of the node
    #[arg(long = "rpc-url", env = "RBG_RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: Url,

    /// Hex private key of the player. Without it, the node's first account is used.
    #[arg(long = "private-key", env = "RBG_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,
}

impl NodeArgs {
    /// Connects to the node and picks the player account.
    pub async fn connect(&self) -> Result<SigningIdentity<AlloyNode>> {
        let signer = self
            .private_key
            .as_deref()
            .map(|key| {
                PrivateKeySigner::from_str(key.trim())
                    .map_err(|e| RbgError::InvalidPrivateKey(e.to_string()))
            })
            .transpose()?;

        let identity = match signer {
            Some(signer) => {
                let address = signer.address();
                let node = AlloyNode::connect_http(self.rpc_url.clone(), Some(signer));
                SigningIdentity::new(address, node)
            }
            None => {
                let node = AlloyNode::connect_http(self.rpc_url.clone(), None);
                SigningIdentity::from_node_accounts(node).await?
            }
        };
        info!(player = %identity.address(), rpc_url = %self.rpc_url, "Connected");
        Ok(identity)
    }
}

/// Game contract location arguments
#[derive(Parser, Debug, Clone)]
#[command(next_help_heading = "Game contract")]
pub struct GameArgs {
    /// Address of the game contract. Overrides the deployments directory.
    #[arg(long = "game-address", env = "RBG_GAME_ADDRESS")]
    pub game_address: Option<Address>,

    /// Directory with hardhat-deploy style deployment records
    #[arg(long = "deployments", env = "RBG_DEPLOYMENTS", default_value = "deployments")]
    pub deployments: PathBuf,

    /// Network whose deployment record to use
    #[arg(long = "network", env = "RBG_NETWORK", default_value = "localfhenix")]
    pub network: String,
}

impl GameArgs {
    /// Locates the game contract.
    pub fn contract(&self) -> Result<GameContract> {
        let address = match self.game_address {
            Some(address) => address,
            None => load_game_address(&self.deployments, &self.network)?,
        };
        Ok(GameContract::new(address))
    }
}

/// Faucet implementations selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FaucetKind {
    /// Never fund the player
    None,
    /// Ask an HTTP faucet service
    Http,
    /// Set the balance through the development node
    DevNode,
}

/// Funding arguments
#[derive(Parser, Debug, Clone)]
#[command(next_help_heading = "Funding")]
pub struct FaucetArgs {
    /// How to fund a player without balance
    #[arg(long = "faucet", env = "RBG_FAUCET", value_enum, default_value_t = FaucetKind::Http)]
    pub faucet: FaucetKind,

    /// Base URL of the HTTP faucet service
    #[arg(long = "faucet-url", env = "RBG_FAUCET_URL", default_value = DEFAULT_FAUCET_URL)]
    pub faucet_url: Url,
}

impl FaucetArgs {
    /// Builds the configured faucet.
    pub fn faucet(&self) -> AnyFaucet {
        match self.faucet {
            FaucetKind::None => AnyFaucet::None(NoFaucet),
            FaucetKind::Http => AnyFaucet::Http(HttpFaucet::new(self.faucet_url.clone())),
            FaucetKind::DevNode => AnyFaucet::DevNode(DevNodeFaucet::default()),
        }
    }
}

/// Submission paths selectable on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SubmitKind {
    /// Raw `eth_sendTransaction` after local resolution
    #[default]
    Unchecked,
    /// The signer's standard sign-and-send path
    Standard,
}

impl From<SubmitKind> for SubmitPath {
    fn from(kind: SubmitKind) -> Self {
        match kind {
            SubmitKind::Unchecked => Self::Unchecked,
            SubmitKind::Standard => Self::Standard,
        }
    }
}

/// Transaction submission arguments
#[derive(Parser, Debug, Clone)]
#[command(next_help_heading = "Submission")]
pub struct SubmitArgs {
    /// How guesses reach the node
    #[arg(long = "submit", env = "RBG_SUBMIT", value_enum, default_value_t)]
    pub submit: SubmitKind,
}

impl SubmitArgs {
    /// The configured submission path.
    pub fn submit_path(&self, node: &NodeArgs) -> SubmitPath {
        if self.submit == SubmitKind::Unchecked && node.private_key.is_some() {
            warn!("Unchecked submissions are signed by the node, not with the private key");
        }
        self.submit.into()
    }
}

/// Receipt polling arguments
#[derive(Parser, Debug, Clone)]
#[command(next_help_heading = "Receipts")]
pub struct ReceiptArgs {
    /// Interval between two receipt polls, in milliseconds
    #[arg(long = "receipt.poll-interval-ms", default_value = "500")]
    pub poll_interval_ms: u64,

    /// Time to wait for a transaction to be included, in seconds
    #[arg(long = "receipt.timeout-secs", default_value = "120")]
    pub timeout_secs: u64,
}

impl ReceiptArgs {
    /// The configured receipt polling policy.
    pub const fn receipt_policy(&self) -> ReceiptPolicy {
        ReceiptPolicy {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}
