//! Bindings for the `RngBinaryGame` contract.

use std::{collections::BTreeMap, sync::Arc};

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::{sol, SolCall, SolError, SolValue};
use tracing::trace;

use super::{GameState, GuessRecord};
use crate::{
    node::Node,
    tx::{Addressable, RpcTransaction, TxRequest, TxValue},
    Error, Result,
};

sol! {
    /// The guessing game contract.
    interface IRngBinaryGame {
        /// One guess and the feedback it received.
        struct Guess {
            uint8 guess;
            bool gt;
            bool lt;
        }

        /// The caller has no game.
        error GameNotFound();

        /// Starts a new game for the caller, replacing any previous one.
        function createGame() external;

        /// Records a guess in the caller's game.
        function guess(uint8 value) external;

        /// Returns the caller's guesses in order.
        function getGameState() external view returns (Guess[] memory);
    }
}

impl From<IRngBinaryGame::Guess> for GuessRecord {
    fn from(guess: IRngBinaryGame::Guess) -> Self {
        Self { guess: guess.guess, too_high: guess.gt, too_low: guess.lt }
    }
}

impl From<GuessRecord> for IRngBinaryGame::Guess {
    fn from(record: GuessRecord) -> Self {
        Self { guess: record.guess, gt: record.too_high, lt: record.too_low }
    }
}

/// A handle to a deployed game contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameContract {
    address: Address,
}

impl GameContract {
    /// Creates a handle for the contract at `address`.
    pub const fn new(address: Address) -> Self {
        Self { address }
    }

    /// Builds the request that starts a new game.
    pub fn create_game(&self) -> TxRequest {
        self.request(IRngBinaryGame::createGameCall {}.abi_encode())
    }

    /// Builds the request that submits `value` as a guess.
    pub fn guess(&self, value: u8) -> TxRequest {
        self.request(IRngBinaryGame::guessCall { value }.abi_encode())
    }

    /// Reads `player`'s guesses.
    ///
    /// The contract keys games by caller, so the call is made with `player` as `from`.
    pub async fn game_state<N: Node + ?Sized>(
        &self,
        node: &N,
        player: Address,
    ) -> Result<GameState> {
        let fields = BTreeMap::from([(
            "data".to_string(),
            TxValue::from(Bytes::from(IRngBinaryGame::getGameStateCall {}.abi_encode())),
        )]);
        let call = RpcTransaction::encode(Some(player), Some(self.address), None, &fields);

        let output = node.call(&call).await.map_err(|err| match err.revert_data() {
            Some(data) if data.starts_with(&IRngBinaryGame::GameNotFound::SELECTOR) => {
                Error::GameNotFound(player)
            }
            _ => Error::Node(err),
        })?;

        let (guesses,) = <(Vec<IRngBinaryGame::Guess>,)>::abi_decode_params(&output)?;
        trace!(count = guesses.len(), "Fetched game state");
        Ok(GameState::new(guesses.into_iter().map(GuessRecord::from).collect()))
    }

    fn request(&self, data: Vec<u8>) -> TxRequest {
        TxRequest::new().with_to(Arc::new(*self)).with_data(data)
    }
}

impl Addressable for GameContract {
    fn address(&self) -> Address {
        self.address
    }
}
