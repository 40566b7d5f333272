//! An in-memory node for tests.
//!
//! [`MockNode`] answers the JSON-RPC methods the client uses and emulates the game contract, the
//! ENS registry and a development node's balance override. Every request is recorded so tests
//! can assert on what reached the node.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use alloy_primitives::{address, keccak256, Address, Bytes, TxHash, B256, U256, U64};
use alloy_sol_types::{SolCall, SolError, SolValue};
use serde_json::{json, Map, Value};

use crate::{
    constants::{ENS_REGISTRY_ADDRESS, MAX_GUESSES},
    ens::{addrCall, namehash, resolverCall},
    game::{GuessRecord, IRngBinaryGame},
    node::{Node, NodeError, NodeResult},
    tx::RpcTransaction,
};

/// The first account of a development node.
pub const PLAYER: Address = address!("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266");

/// Another development node account.
pub const OTHER: Address = address!("0x70997970c51812dc3a010c7d01b50e0d17dc79c8");

/// Where the mock deploys the game contract.
pub const GAME: Address = address!("0x5fbdb2315678afecb367f032d93f642f64180aa3");

/// Where the mock deploys the ENS resolver.
pub const RESOLVER: Address = address!("0x4976fb03c32e5b8cfe2b6ccb31c09ba78ebaba41");

/// Gas estimate returned unless configured otherwise.
pub const DEFAULT_GAS_ESTIMATE: u64 = 53_000;

/// A request as it reached the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// The JSON-RPC method, or `sign_and_send` for the standard path.
    pub method: String,
    /// The request parameters.
    pub params: Value,
}

#[derive(Debug, Default)]
struct MockState {
    accounts: Vec<Address>,
    balances: HashMap<Address, U256>,
    gas_estimate: u64,
    target: u8,
    games: HashMap<Address, Vec<GuessRecord>>,
    names: HashMap<B256, Address>,
    receipts: HashMap<TxHash, bool>,
    pending_receipts: bool,
    rejection: Option<(i64, String)>,
    nonce: u64,
    calls: Vec<RecordedCall>,
}

/// An in-memory JSON-RPC node running the game contract at [`GAME`].
///
/// Clones share state.
#[derive(Debug, Clone)]
pub struct MockNode {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockNode {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNode {
    /// Creates a node that manages [`PLAYER`] with a zero balance and hides `0` in the game.
    pub fn new() -> Self {
        let state = MockState {
            accounts: vec![PLAYER],
            gas_estimate: DEFAULT_GAS_ESTIMATE,
            ..Default::default()
        };
        Self { state: Arc::new(Mutex::new(state)) }
    }

    /// Sets the number the game contract hides.
    pub fn with_target(self, target: u8) -> Self {
        self.lock().target = target;
        self
    }

    /// Sets the balance of `address`.
    pub fn with_balance(self, address: Address, balance: U256) -> Self {
        self.lock().balances.insert(address, balance);
        self
    }

    /// Sets the value `eth_estimateGas` returns.
    pub fn with_gas_estimate(self, gas: u64) -> Self {
        self.lock().gas_estimate = gas;
        self
    }

    /// Sets the accounts `eth_accounts` returns.
    pub fn with_accounts(self, accounts: Vec<Address>) -> Self {
        self.lock().accounts = accounts;
        self
    }

    /// Registers an ENS name.
    pub fn with_name(self, name: &str, address: Address) -> Self {
        self.lock().names.insert(namehash(name), address);
        self
    }

    /// Keeps every receipt pending.
    pub fn with_pending_receipts(self) -> Self {
        self.lock().pending_receipts = true;
        self
    }

    /// Rejects every subsequent submission with a JSON-RPC error.
    pub fn reject_sends(&self, code: i64, message: impl Into<String>) {
        self.lock().rejection = Some((code, message.into()));
    }

    /// Accepts submissions again after [`MockNode::reject_sends`].
    pub fn accept_sends(&self) {
        self.lock().rejection = None;
    }

    /// Starts a game for `player` with the given guesses already made.
    pub fn seed_game(&self, player: Address, guesses: &[u8]) {
        let mut state = self.lock();
        let target = state.target;
        let records = guesses.iter().map(|&guess| GuessRecord::against(guess, target)).collect();
        state.games.insert(player, records);
    }

    /// All requests in the order they arrived.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// The parameters of every request for `method`.
    pub fn requests(&self, method: &str) -> Vec<Value> {
        self.lock().calls.iter().filter(|c| c.method == method).map(|c| c.params.clone()).collect()
    }

    /// Number of requests for `method`.
    pub fn count(&self, method: &str) -> usize {
        self.lock().calls.iter().filter(|c| c.method == method).count()
    }

    /// The current balance of `address`.
    pub fn balance_of(&self, address: Address) -> U256 {
        self.lock().balances.get(&address).copied().unwrap_or_default()
    }

    /// The guesses `player` has made in their current game.
    pub fn guesses(&self, player: Address) -> Option<Vec<GuessRecord>> {
        self.lock().games.get(&player).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle(&self, method: &str, params: &Value) -> NodeResult<Value> {
        let mut state = self.lock();
        state.calls.push(RecordedCall { method: method.to_string(), params: params.clone() });

        match method {
            "eth_accounts" => Ok(json!(state.accounts)),
            "eth_estimateGas" => Ok(json!(U64::from(state.gas_estimate))),
            "eth_getBalance" => {
                let address: Address = param(method, params, 0)?;
                Ok(json!(state.balances.get(&address).copied().unwrap_or_default()))
            }
            "hardhat_setBalance" | "anvil_setBalance" => {
                let address: Address = param(method, params, 0)?;
                let balance: U256 = param(method, params, 1)?;
                state.balances.insert(address, balance);
                Ok(Value::Null)
            }
            "eth_sendTransaction" => {
                let tx: Map<String, Value> = param(method, params, 0)?;
                state.execute(method, &tx)
            }
            "eth_getTransactionReceipt" => {
                let hash: TxHash = param(method, params, 0)?;
                if state.pending_receipts {
                    return Ok(Value::Null);
                }
                Ok(state.receipts.get(&hash).map_or(Value::Null, |success| {
                    json!({ "transactionHash": hash, "status": U64::from(u8::from(*success)) })
                }))
            }
            "eth_call" => {
                let tx: Map<String, Value> = param(method, params, 0)?;
                state.call(&tx)
            }
            _ => Err(NodeError::Rejected {
                method: method.to_string(),
                code: -32601,
                message: format!("the method {method} does not exist/is not available"),
                data: None,
            }),
        }
    }
}

impl MockState {
    /// Mines `tx` and returns its hash. Reverted transactions still get a receipt.
    fn execute(&mut self, method: &str, tx: &Map<String, Value>) -> NodeResult<Value> {
        if let Some((code, message)) = &self.rejection {
            return Err(NodeError::Rejected {
                method: method.to_string(),
                code: *code,
                message: message.clone(),
                data: None,
            });
        }
        let from: Address = field(method, tx, "from")?.ok_or_else(|| invalid(method, "no from"))?;
        let to: Option<Address> = field(method, tx, "to")?;
        let data: Bytes = field(method, tx, "data")?.unwrap_or_default();

        let success = to == Some(GAME) && self.run_game(from, &data);

        self.nonce += 1;
        let hash = keccak256(self.nonce.to_be_bytes());
        self.receipts.insert(hash, success);
        Ok(json!(hash))
    }

    fn run_game(&mut self, from: Address, data: &[u8]) -> bool {
        if data.starts_with(&IRngBinaryGame::createGameCall::SELECTOR) {
            self.games.insert(from, Vec::new());
            return true;
        }
        let Ok(call) = IRngBinaryGame::guessCall::abi_decode(data) else {
            return false;
        };
        let target = self.target;
        match self.games.get_mut(&from) {
            Some(records)
                if records.len() < MAX_GUESSES && !records.iter().any(GuessRecord::is_correct) =>
            {
                records.push(GuessRecord::against(call.value, target));
                true
            }
            _ => false,
        }
    }

    fn call(&self, tx: &Map<String, Value>) -> NodeResult<Value> {
        let method = "eth_call";
        let from: Option<Address> = field(method, tx, "from")?;
        let to: Option<Address> = field(method, tx, "to")?;
        let data: Bytes = field(method, tx, "data")?.unwrap_or_default();

        let output = if to == Some(GAME)
            && data.starts_with(&IRngBinaryGame::getGameStateCall::SELECTOR)
        {
            let Some(records) = from.and_then(|from| self.games.get(&from)) else {
                return Err(NodeError::Rejected {
                    method: method.to_string(),
                    code: 3,
                    message: "execution reverted".to_string(),
                    data: Some(IRngBinaryGame::GameNotFound {}.abi_encode().into()),
                });
            };
            let guesses: Vec<IRngBinaryGame::Guess> =
                records.iter().copied().map(Into::into).collect();
            (guesses,).abi_encode_params()
        } else if to == Some(ENS_REGISTRY_ADDRESS) && !self.names.is_empty() {
            let call =
                resolverCall::abi_decode(&data).map_err(|e| invalid(method, &e.to_string()))?;
            let resolver =
                if self.names.contains_key(&call.node) { RESOLVER } else { Address::ZERO };
            resolver.abi_encode()
        } else if to == Some(RESOLVER) {
            let call = addrCall::abi_decode(&data).map_err(|e| invalid(method, &e.to_string()))?;
            self.names.get(&call.node).copied().unwrap_or_default().abi_encode()
        } else {
            Vec::new()
        };
        Ok(json!(Bytes::from(output)))
    }
}

impl Node for MockNode {
    async fn request(&self, method: &'static str, params: Value) -> NodeResult<Value> {
        self.handle(method, &params)
    }

    async fn sign_and_send(&self, tx: &RpcTransaction) -> NodeResult<TxHash> {
        let mut state = self.lock();
        state
            .calls
            .push(RecordedCall { method: "sign_and_send".to_string(), params: tx.to_value() });
        let hash = state.execute("eth_sendTransaction", &tx.clone().into_inner())?;
        serde_json::from_value(hash).map_err(|e| invalid("eth_sendTransaction", &e.to_string()))
    }
}

fn param<T: serde::de::DeserializeOwned>(
    method: &str,
    params: &Value,
    index: usize,
) -> NodeResult<T> {
    let value = params.get(index).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| invalid(method, &e.to_string()))
}

fn field<T: serde::de::DeserializeOwned>(
    method: &str,
    tx: &Map<String, Value>,
    key: &str,
) -> NodeResult<Option<T>> {
    tx.get(key)
        .cloned()
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| invalid(method, &e.to_string()))
}

fn invalid(method: &str, reason: &str) -> NodeError {
    NodeError::InvalidRequest { method: method.to_string(), reason: reason.to_string() }
}
