//! ENS name resolution through the registry contract.

use std::collections::BTreeMap;

use alloy_primitives::{keccak256, Address, Bytes, B256};
use alloy_sol_types::{sol, SolCall, SolValue};

use crate::{
    constants::ENS_REGISTRY_ADDRESS,
    node::{Node, NodeError, NodeResult},
    tx::{RpcTransaction, TxValue},
};

sol! {
    function resolver(bytes32 node) external view returns (address);
    function addr(bytes32 node) external view returns (address);
}

/// Folds `name` to the form its namehash is computed over.
// TODO: full ENSIP-15 normalization (emoji, confusables, NFC); this only case-folds.
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
}

/// Computes the EIP-137 namehash of `name` after [`normalize`].
pub fn namehash(name: &str) -> B256 {
    if name.is_empty() {
        return B256::ZERO;
    }
    normalize(name).rsplit('.').fold(B256::ZERO, |parent, label| {
        keccak256([parent.as_slice(), keccak256(label.as_bytes()).as_slice()].concat())
    })
}

/// Resolves `name` through the ENS registry.
///
/// Returns `None` when the name has no resolver, the resolver has no address for it, or the
/// network has no registry deployed.
pub async fn resolve_name<N: Node + ?Sized>(node: &N, name: &str) -> NodeResult<Option<Address>> {
    let hash = namehash(name);
    let Some(resolver) =
        call_address(node, ENS_REGISTRY_ADDRESS, resolverCall { node: hash }.abi_encode()).await?
    else {
        return Ok(None);
    };
    call_address(node, resolver, addrCall { node: hash }.abi_encode()).await
}

/// Calls a view function returning a single address; zero and empty results count as unset.
async fn call_address<N: Node + ?Sized>(
    node: &N,
    to: Address,
    data: Vec<u8>,
) -> NodeResult<Option<Address>> {
    let fields = BTreeMap::from([("data".to_string(), TxValue::from(Bytes::from(data)))]);
    let output = node.call(&RpcTransaction::encode(None, Some(to), None, &fields)).await?;
    if output.is_empty() {
        return Ok(None);
    }
    let address = Address::abi_decode(&output).map_err(|e| NodeError::InvalidResponse {
        method: "eth_call".to_string(),
        reason: e.to_string(),
    })?;
    Ok((!address.is_zero()).then_some(address))
}
