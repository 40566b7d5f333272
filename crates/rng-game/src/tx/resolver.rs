//! Resolution of partially specified transaction requests.

use std::collections::BTreeMap;

use alloy_primitives::Address;
use tracing::{debug, trace};

use super::{AddressRef, RpcTransaction, TxRequest, TxValue};
use crate::{node::Node, Error, Result, SigningIdentity};

/// A transaction whose sender, recipient and gas limit are concrete.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTransaction {
    /// The sender, always the signing identity.
    pub from: Address,
    /// The recipient; absent for contract creation.
    pub to: Option<Address>,
    /// The gas limit.
    pub gas_limit: u64,
    /// Pass-through fields.
    pub fields: BTreeMap<String, TxValue>,
}

impl ResolvedTransaction {
    /// Encodes the transaction in the node's wire format.
    pub fn to_rpc(&self) -> RpcTransaction {
        RpcTransaction::encode(Some(self.from), self.to, Some(self.gas_limit), &self.fields)
    }
}

/// Fills in the unset fields of `request` on behalf of `identity`.
///
/// - `from` is checked against the identity's address (case-insensitively, after resolving
///   names) or set to it when absent.
/// - `gasLimit` is estimated by the node when absent.
/// - `to` is resolved when present.
///
/// The `from` lookup runs concurrently with the `to` lookup and the estimate, and the first
/// failure aborts the whole resolution. The estimate needs the resolved `to`, so those two run in
/// sequence and each name is looked up once. A `from` that is known without a lookup is checked
/// before anything is sent to the node.
pub async fn resolve_transaction<N: Node>(
    identity: &SigningIdentity<N>,
    request: &TxRequest,
) -> Result<ResolvedTransaction> {
    let request = request.deep_copy();
    let node = identity.node();
    let signer = identity.address();

    if let Some(from) = request.from.as_ref().map(AddressRef::literal).transpose()?.flatten() {
        check_sender(signer, from)?;
    }

    let ((), (to, gas_limit)) = tokio::try_join!(
        check_named_sender(node, signer, request.from.as_ref()),
        recipient_and_gas_limit(node, signer, &request),
    )?;

    let resolved = ResolvedTransaction { from: signer, to, gas_limit, fields: request.fields };
    debug!(from = %resolved.from, to = ?resolved.to, gas_limit, "Resolved transaction");
    Ok(resolved)
}

/// Resolves `request` and encodes it in the node's wire format.
pub async fn resolve_rpc_transaction<N: Node>(
    identity: &SigningIdentity<N>,
    request: &TxRequest,
) -> Result<RpcTransaction> {
    Ok(resolve_transaction(identity, request).await?.to_rpc())
}

/// Resolves a named `from` and checks it against the signer.
async fn check_named_sender<N: Node>(
    node: &N,
    signer: Address,
    from: Option<&AddressRef>,
) -> Result<()> {
    match from {
        Some(from @ AddressRef::Name(_)) => check_sender(signer, from.resolve(node).await?),
        _ => Ok(()),
    }
}

/// Resolves the recipient, then returns the requested gas limit or asks the node to estimate one
/// with the signer as sender.
async fn recipient_and_gas_limit<N: Node>(
    node: &N,
    signer: Address,
    request: &TxRequest,
) -> Result<(Option<Address>, u64)> {
    let to = resolve_recipient(node, request.to.as_ref()).await?;
    if let Some(gas_limit) = request.gas_limit {
        return Ok((to, gas_limit));
    }
    let in_progress = RpcTransaction::encode(Some(signer), to, None, &request.fields);
    let gas_limit = node.estimate_gas(&in_progress).await?;
    trace!(gas_limit, "Estimated gas");
    Ok((to, gas_limit))
}

async fn resolve_recipient<N: Node>(node: &N, to: Option<&AddressRef>) -> Result<Option<Address>> {
    match to {
        Some(to) => Ok(Some(to.resolve(node).await?)),
        None => Ok(None),
    }
}

/// Addresses compare as bytes, which makes the hex comparison case-insensitive.
fn check_sender(signer: Address, from: Address) -> Result<()> {
    if from == signer {
        Ok(())
    } else {
        Err(Error::FromMismatch { expected: signer, actual: from })
    }
}
