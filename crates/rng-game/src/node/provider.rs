//! [`Node`] backed by an alloy HTTP provider.

use std::{borrow::Cow, fmt};

use alloy_network::EthereumWallet;
use alloy_primitives::{Address, TxHash};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types_eth::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, trace};

use super::{Node, NodeError, NodeResult};
use crate::tx::RpcTransaction;

/// A node reached over HTTP JSON-RPC.
///
/// With a local signer the standard send path signs locally and broadcasts the raw transaction;
/// without one it falls back to the node's own accounts.
#[derive(Clone)]
pub struct AlloyNode {
    provider: DynProvider,
    wallet_address: Option<Address>,
}

impl AlloyNode {
    /// Connects to `url`, signing standard-path transactions with `signer` when given.
    pub fn connect_http(url: Url, signer: Option<PrivateKeySigner>) -> Self {
        let wallet_address = signer.as_ref().map(|signer| signer.address());
        let provider = match signer {
            Some(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer))
                .connect_http(url)
                .erased(),
            None => ProviderBuilder::new().connect_http(url).erased(),
        };
        debug!(?wallet_address, "Connected HTTP provider");
        Self { provider, wallet_address }
    }

    /// Wraps an already configured provider.
    pub const fn from_provider(provider: DynProvider) -> Self {
        Self { provider, wallet_address: None }
    }

    /// Address of the local signer, if one was configured.
    pub const fn wallet_address(&self) -> Option<Address> {
        self.wallet_address
    }

    /// The underlying provider.
    pub const fn provider(&self) -> &DynProvider {
        &self.provider
    }
}

impl fmt::Debug for AlloyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlloyNode")
            .field("wallet_address", &self.wallet_address)
            .finish_non_exhaustive()
    }
}

impl Node for AlloyNode {
    async fn request(&self, method: &'static str, params: Value) -> NodeResult<Value> {
        trace!(method, %params, "Sending raw request");
        self.provider
            .raw_request::<_, Value>(Cow::Borrowed(method), params)
            .await
            .map_err(|e| NodeError::from_transport(method, e))
    }

    async fn sign_and_send(&self, tx: &RpcTransaction) -> NodeResult<TxHash> {
        let request: TransactionRequest =
            serde_json::from_value(tx.to_value()).map_err(|e| NodeError::InvalidRequest {
                method: "eth_sendTransaction".to_string(),
                reason: e.to_string(),
            })?;
        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(|e| NodeError::from_transport("eth_sendTransaction", e))?;
        Ok(*pending.tx_hash())
    }
}
