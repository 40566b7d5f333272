//! The seam between the client and a remote ledger node.
//!
//! Everything the client needs from a node is expressed as a JSON-RPC request ([`Node::request`])
//! plus the signer's standard sign-and-send path ([`Node::sign_and_send`]). The typed helpers
//! (`eth_estimateGas`, `eth_call`, ...) are default methods layered on top of the raw request, so
//! an implementation only has to move JSON back and forth.

mod provider;
pub use provider::AlloyNode;

use std::future::Future;

use alloy_primitives::{Address, Bytes, TxHash, U256, U64};
use alloy_transport::TransportError;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};

use crate::tx::RpcTransaction;

/// Error types for node requests
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// The request never got a JSON-RPC response
    #[error("RPC transport error: {0}")]
    Transport(TransportError),

    /// The node answered with a JSON-RPC error
    #[error("{method} rejected by node: {message} (code {code})")]
    Rejected {
        /// The RPC method that was rejected
        method: String,
        /// JSON-RPC error code
        code: i64,
        /// JSON-RPC error message
        message: String,
        /// Revert data attached to the error, if any
        data: Option<Bytes>,
    },

    /// A request could not be expressed in the form the node expects
    #[error("invalid {method} request: {reason}")]
    InvalidRequest {
        /// The RPC method the request was meant for
        method: String,
        /// Why the request was rejected locally
        reason: String,
    },

    /// The node answered with a payload of the wrong shape
    #[error("invalid response to {method}: {reason}")]
    InvalidResponse {
        /// The RPC method whose response could not be decoded
        method: String,
        /// Why decoding failed
        reason: String,
    },
}

impl NodeError {
    /// Classifies a transport error, keeping JSON-RPC error responses apart from transport
    /// failures.
    pub fn from_transport(method: &str, err: TransportError) -> Self {
        match err.as_error_resp() {
            Some(payload) => Self::Rejected {
                method: method.to_string(),
                code: payload.code,
                message: payload.message.to_string(),
                data: payload.as_revert_data(),
            },
            None => Self::Transport(err),
        }
    }

    /// Returns the revert data of a rejected call.
    pub const fn revert_data(&self) -> Option<&Bytes> {
        match self {
            Self::Rejected { data, .. } => data.as_ref(),
            _ => None,
        }
    }
}

/// Result type for node requests
pub type NodeResult<T> = std::result::Result<T, NodeError>;

/// A connection to a remote ledger node.
pub trait Node: Send + Sync {
    /// Sends a raw JSON-RPC request and returns the `result` member of the response.
    fn request(
        &self,
        method: &'static str,
        params: Value,
    ) -> impl Future<Output = NodeResult<Value>> + Send;

    /// Signs and broadcasts a transaction through the standard path (nonce, fee and signature
    /// filled in by the signer stack).
    fn sign_and_send(&self, tx: &RpcTransaction)
        -> impl Future<Output = NodeResult<TxHash>> + Send;

    /// Returns the accounts the node manages (`eth_accounts`).
    fn accounts(&self) -> impl Future<Output = NodeResult<Vec<Address>>> + Send {
        async move { decode("eth_accounts", self.request("eth_accounts", json!([])).await?) }
    }

    /// Estimates the gas a transaction needs (`eth_estimateGas`).
    fn estimate_gas(&self, tx: &RpcTransaction) -> impl Future<Output = NodeResult<u64>> + Send {
        let params = json!([tx]);
        async move {
            let gas: U64 =
                decode("eth_estimateGas", self.request("eth_estimateGas", params).await?)?;
            Ok(gas.to::<u64>())
        }
    }

    /// Returns the latest balance of an address (`eth_getBalance`).
    fn balance(&self, address: Address) -> impl Future<Output = NodeResult<U256>> + Send {
        async move {
            let balance = self.request("eth_getBalance", json!([address, "latest"])).await?;
            decode("eth_getBalance", balance)
        }
    }

    /// Executes a read-only call against the latest block (`eth_call`).
    fn call(&self, tx: &RpcTransaction) -> impl Future<Output = NodeResult<Bytes>> + Send {
        let params = json!([tx, "latest"]);
        async move { decode("eth_call", self.request("eth_call", params).await?) }
    }

    /// Submits a transaction the node signs itself (`eth_sendTransaction`).
    fn send_transaction(
        &self,
        tx: &RpcTransaction,
    ) -> impl Future<Output = NodeResult<TxHash>> + Send {
        let params = json!([tx]);
        async move {
            decode("eth_sendTransaction", self.request("eth_sendTransaction", params).await?)
        }
    }

    /// Returns the execution status of an included transaction, or `None` while it is pending
    /// (`eth_getTransactionReceipt`).
    fn transaction_status(
        &self,
        hash: TxHash,
    ) -> impl Future<Output = NodeResult<Option<bool>>> + Send {
        async move {
            let receipt: Option<ReceiptStatus> = decode(
                "eth_getTransactionReceipt",
                self.request("eth_getTransactionReceipt", json!([hash])).await?,
            )?;
            // Pre-byzantium receipts carry no status; inclusion is all we know.
            Ok(receipt.map(|r| r.status.is_none_or(|s| s == U64::from(1))))
        }
    }

    /// Resolves an ENS name through the registry the node serves.
    fn resolve_name(&self, name: &str) -> impl Future<Output = NodeResult<Option<Address>>> + Send {
        async move { crate::ens::resolve_name(self, name).await }
    }
}

/// The part of a receipt the client looks at.
#[derive(Debug, Deserialize)]
struct ReceiptStatus {
    status: Option<U64>,
}

/// Decodes the `result` of a response into `T`.
pub(crate) fn decode<T: DeserializeOwned>(method: &str, value: Value) -> NodeResult<T> {
    serde_json::from_value(value).map_err(|e| NodeError::InvalidResponse {
        method: method.to_string(),
        reason: e.to_string(),
    })
}
