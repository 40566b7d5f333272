//! Submission of resolved transactions through a raw `eth_sendTransaction` call.

use alloy_primitives::TxHash;
use tracing::debug;

use super::{resolve_rpc_transaction, TxRequest};
use crate::{node::Node, Result, SigningIdentity};

/// Resolves `request` and submits it with a raw `eth_sendTransaction` call, bypassing the
/// signer's standard sign-and-send path.
///
/// Returns the hash the node reports without waiting for the transaction to be included.
/// Resolution errors come back unchanged and node rejections as [`crate::NodeError`].
pub async fn send_unchecked_transaction<N: Node>(
    identity: &SigningIdentity<N>,
    request: &TxRequest,
) -> Result<TxHash> {
    let tx = resolve_rpc_transaction(identity, request).await?;
    let hash = identity.node().send_transaction(&tx).await?;
    debug!(%hash, "Sent unchecked transaction");
    Ok(hash)
}
