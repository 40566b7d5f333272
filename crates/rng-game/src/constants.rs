//! Constants shared by the game client.

use std::time::Duration;

use alloy_primitives::{address, Address};

/// Maximum number of guesses a single game accepts.
pub const MAX_GUESSES: usize = 12;

/// Smallest value the contract accepts as a guess.
pub const MIN_GUESS: u8 = u8::MIN;

/// Largest value the contract accepts as a guess.
pub const MAX_GUESS: u8 = u8::MAX;

/// Name under which the game contract is recorded in a deployments directory.
pub const GAME_CONTRACT_NAME: &str = "RngBinaryGame";

/// The ENS registry address, identical on every network that deploys ENS.
pub const ENS_REGISTRY_ADDRESS: Address = address!("0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e");

/// Default RPC endpoint of a local development node.
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// Default endpoint of a local faucet service.
pub const DEFAULT_FAUCET_URL: &str = "http://localhost:42000";

/// Default interval between two receipt polls.
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default time to wait for a transaction to be included.
pub const DEFAULT_RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);

/// Balance a development node faucet credits: 1000 ether.
pub const DEV_NODE_FUNDING_WEI: u128 = 1_000_000_000_000_000_000_000;
