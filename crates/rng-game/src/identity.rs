use alloy_primitives::{Address, TxHash, U256};
use tracing::debug;

use crate::{node::Node, resolve_rpc_transaction, Error, Result, TxRequest};

/// An account that authorizes transactions, together with the node it talks to.
#[derive(Debug, Clone)]
pub struct SigningIdentity<N> {
    address: Address,
    node: N,
}

impl<N: Node> SigningIdentity<N> {
    /// Creates an identity for a known address.
    pub const fn new(address: Address, node: N) -> Self {
        Self { address, node }
    }

    /// Uses the first account the node manages, like a development node's default signer.
    pub async fn from_node_accounts(node: N) -> Result<Self> {
        let address = node.accounts().await?.into_iter().next().ok_or_else(|| {
            Error::Node(crate::NodeError::InvalidResponse {
                method: "eth_accounts".to_string(),
                reason: "the node manages no accounts".to_string(),
            })
        })?;
        debug!(%address, "Using node-managed account");
        Ok(Self::new(address, node))
    }

    /// The identity's address.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The node the identity is connected to.
    pub const fn node(&self) -> &N {
        &self.node
    }

    /// The identity's current balance.
    pub async fn balance(&self) -> Result<U256> {
        Ok(self.node.balance(self.address).await?)
    }

    /// Sends a transaction through the standard path: the request is resolved, then signed and
    /// broadcast by the node's signer stack.
    pub async fn send_transaction(&self, request: &TxRequest) -> Result<TxHash> {
        let tx = resolve_rpc_transaction(self, request).await?;
        let hash = self.node.sign_and_send(&tx).await?;
        debug!(%hash, "Sent transaction through the standard path");
        Ok(hash)
    }
}
