//! A single game played by one identity against the contract.

use std::time::Duration;

use alloy_primitives::TxHash;
use tracing::{debug, info, warn};

use super::{GameContract, GameState, Outcome};
use crate::{
    constants::{DEFAULT_RECEIPT_POLL_INTERVAL, DEFAULT_RECEIPT_TIMEOUT},
    node::Node,
    send_unchecked_transaction, Error, Result, SigningIdentity, TxRequest,
};

/// How transactions of a session reach the node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitPath {
    /// Resolve locally and submit with a raw `eth_sendTransaction` call.
    #[default]
    Unchecked,
    /// Hand the request to the node's signer stack.
    Standard,
}

/// How long and how often to poll for a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolicy {
    /// Delay between two receipt polls.
    pub poll_interval: Duration,
    /// Total time to wait before giving up.
    pub timeout: Duration,
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        Self { poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL, timeout: DEFAULT_RECEIPT_TIMEOUT }
    }
}

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No game has been created yet.
    NotStarted,
    /// The game accepts another guess.
    AwaitingGuess,
    /// The game is over.
    Finished(Outcome),
}

/// Drives one game: creation, guesses and state reads.
#[derive(Debug)]
pub struct GameSession<N> {
    identity: SigningIdentity<N>,
    contract: GameContract,
    submit_path: SubmitPath,
    receipts: ReceiptPolicy,
    phase: Phase,
    state: GameState,
}

impl<N: Node> GameSession<N> {
    /// Creates a session that has not started a game yet.
    pub fn new(identity: SigningIdentity<N>, contract: GameContract) -> Self {
        Self {
            identity,
            contract,
            submit_path: SubmitPath::default(),
            receipts: ReceiptPolicy::default(),
            phase: Phase::NotStarted,
            state: GameState::default(),
        }
    }

    /// Sets the submission path.
    pub fn with_submit_path(mut self, submit_path: SubmitPath) -> Self {
        self.submit_path = submit_path;
        self
    }

    /// Sets the receipt polling policy.
    pub fn with_receipt_policy(mut self, receipts: ReceiptPolicy) -> Self {
        self.receipts = receipts;
        self
    }

    /// The player.
    pub const fn identity(&self) -> &SigningIdentity<N> {
        &self.identity
    }

    /// The game contract.
    pub const fn contract(&self) -> GameContract {
        self.contract
    }

    /// The current phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// The state as of the last read.
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Creates a new game, replacing any previous game of the player.
    pub async fn start(&mut self) -> Result<()> {
        let hash = self.submit(&self.contract.create_game()).await?;
        self.wait_for_receipt(hash).await?;
        self.state = GameState::default();
        self.phase = Phase::AwaitingGuess;
        info!(player = %self.identity.address(), "Created game");
        Ok(())
    }

    /// Submits `value` as the next guess and returns the state that follows it.
    pub async fn guess(&mut self, value: u8) -> Result<&GameState> {
        match self.phase {
            Phase::NotStarted => return Err(Error::GameNotStarted),
            Phase::Finished(_) => return Err(Error::GameOver),
            Phase::AwaitingGuess => {}
        }

        let hash = self.submit(&self.contract.guess(value)).await?;
        debug!(value, %hash, "Submitted guess");
        self.wait_for_receipt(hash).await?;
        self.refresh().await
    }

    /// Reads the player's game from the contract and updates the phase.
    ///
    /// A player without a game moves the session back to [`Phase::NotStarted`].
    pub async fn refresh(&mut self) -> Result<&GameState> {
        let player = self.identity.address();
        let state = match self.contract.game_state(self.identity.node(), player).await {
            Ok(state) => state,
            Err(err @ Error::GameNotFound(_)) => {
                self.phase = Phase::NotStarted;
                return Err(err);
            }
            Err(err) => return Err(err),
        };
        self.phase = state.outcome().map_or(Phase::AwaitingGuess, Phase::Finished);
        self.state = state;
        Ok(&self.state)
    }

    async fn submit(&self, request: &TxRequest) -> Result<TxHash> {
        match self.submit_path {
            SubmitPath::Unchecked => send_unchecked_transaction(&self.identity, request).await,
            SubmitPath::Standard => self.identity.send_transaction(request).await,
        }
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<()> {
        wait_for_inclusion(self.identity.node(), hash, self.receipts).await
    }
}

/// Polls for the receipt of `hash` until it is included or the policy's timeout expires.
///
/// A reverted transaction fails with [`Error::Reverted`].
pub async fn wait_for_inclusion<N: Node + ?Sized>(
    node: &N,
    hash: TxHash,
    policy: ReceiptPolicy,
) -> Result<()> {
    let poll = async {
        loop {
            match node.transaction_status(hash).await {
                Ok(Some(true)) => break Ok(()),
                Ok(Some(false)) => break Err(Error::Reverted(hash)),
                Ok(None) => tokio::time::sleep(policy.poll_interval).await,
                Err(err) => break Err(Error::Node(err)),
            }
        }
    };
    tokio::time::timeout(policy.timeout, poll).await.unwrap_or_else(|_| {
        warn!(%hash, timeout = ?policy.timeout, "Transaction not included in time");
        Err(Error::ReceiptTimeout(hash))
    })
}
