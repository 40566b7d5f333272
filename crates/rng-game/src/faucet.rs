//! Funding of the player account before a game.

use std::future::Future;

use alloy_primitives::{Address, U256};
use reqwest::{Client, Url};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::{constants::DEV_NODE_FUNDING_WEI, node::Node, Error, Result, SigningIdentity};

/// A source of funds for an account.
pub trait Faucet: Send + Sync {
    /// Credits `address`. `node` is the node the account lives on.
    fn fund<N: Node>(&self, node: &N, address: Address) -> impl Future<Output = Result<()>> + Send;

    /// Returns `false` when funding is disabled.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// A faucet service asked over HTTP with `GET {url}/faucet?address=0x…`.
#[derive(Debug, Clone)]
pub struct HttpFaucet {
    client: Client,
    url: Url,
}

impl HttpFaucet {
    /// Creates a client for the faucet service at `url`.
    pub fn new(url: Url) -> Self {
        Self { client: Client::new(), url }
    }

    /// The endpoint that receives funding requests.
    pub fn endpoint(&self) -> String {
        format!("{}/faucet", self.url.as_str().trim_end_matches('/'))
    }
}

impl Faucet for HttpFaucet {
    async fn fund<N: Node>(&self, _node: &N, address: Address) -> Result<()> {
        let endpoint = self.endpoint();
        debug!(%endpoint, %address, "Requesting funds");
        let response = self
            .client
            .get(&endpoint)
            .query(&[("address", address.to_checksum(None))])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Faucet(format!("{endpoint} answered {status}: {body}")));
        }
        Ok(())
    }
}

/// Sets the balance directly through a development node (`hardhat_setBalance`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevNodeFaucet {
    amount: U256,
}

impl Default for DevNodeFaucet {
    fn default() -> Self {
        Self::new(U256::from(DEV_NODE_FUNDING_WEI))
    }
}

impl DevNodeFaucet {
    /// Creates a faucet that sets balances to `amount` wei.
    pub const fn new(amount: U256) -> Self {
        Self { amount }
    }

    /// The balance an address is set to.
    pub const fn amount(&self) -> U256 {
        self.amount
    }
}

impl Faucet for DevNodeFaucet {
    async fn fund<N: Node>(&self, node: &N, address: Address) -> Result<()> {
        node.request("hardhat_setBalance", json!([address, self.amount])).await?;
        Ok(())
    }
}

/// Funding disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoFaucet;

impl Faucet for NoFaucet {
    async fn fund<N: Node>(&self, _node: &N, _address: Address) -> Result<()> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// One of the available faucets, chosen at configuration time.
#[derive(Debug, Clone)]
pub enum AnyFaucet {
    /// Funding disabled.
    None(NoFaucet),
    /// An HTTP faucet service.
    Http(HttpFaucet),
    /// A development node's balance override.
    DevNode(DevNodeFaucet),
}

impl Faucet for AnyFaucet {
    async fn fund<N: Node>(&self, node: &N, address: Address) -> Result<()> {
        match self {
            Self::None(faucet) => faucet.fund(node, address).await,
            Self::Http(faucet) => faucet.fund(node, address).await,
            Self::DevNode(faucet) => faucet.fund(node, address).await,
        }
    }

    fn is_enabled(&self) -> bool {
        !matches!(self, Self::None(_))
    }
}

/// Funds the identity through `faucet` when its balance is zero.
///
/// Returns `true` if funds were requested.
pub async fn ensure_funded<N: Node, F: Faucet>(
    identity: &SigningIdentity<N>,
    faucet: &F,
) -> Result<bool> {
    let balance = identity.balance().await?;
    if !balance.is_zero() {
        debug!(%balance, "Account already funded");
        return Ok(false);
    }
    if !faucet.is_enabled() {
        warn!(address = %identity.address(), "Account has no funds and no faucet is configured");
        return Ok(false);
    }

    faucet.fund(identity.node(), identity.address()).await?;
    info!(address = %identity.address(), "Funded account");
    Ok(true)
}
