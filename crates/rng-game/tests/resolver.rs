//! Tests for transaction resolution.

use std::sync::Arc;

use alloy_primitives::{address, bytes, Address, U256};
use rng_game::{
    game::GameContract,
    resolve_rpc_transaction, resolve_transaction,
    test_utils::{MockNode, DEFAULT_GAS_ESTIMATE, GAME, OTHER, PLAYER},
    Error, SigningIdentity, TxRequest, TxValue,
};
use rstest::rstest;
use serde_json::json;

const TARGET: Address = address!("0xabc0000000000000000000000000000000000abc");

fn identity(node: &MockNode) -> SigningIdentity<MockNode> {
    SigningIdentity::new(PLAYER, node.clone())
}

#[tokio::test]
async fn test_unset_from_is_signer() {
    let node = MockNode::new();
    let request = TxRequest::new().with_to(TARGET);

    let resolved = resolve_transaction(&identity(&node), &request).await.unwrap();

    assert_eq!(resolved.from, PLAYER);
    assert_eq!(resolved.to, Some(TARGET));
    assert_eq!(resolved.gas_limit, DEFAULT_GAS_ESTIMATE);
    assert_eq!(node.count("eth_estimateGas"), 1);
    assert!(request.from.is_none(), "the caller's request must not be modified");
}

#[tokio::test]
async fn test_mismatched_from_makes_no_rpc_call() {
    let node = MockNode::new();
    let request = TxRequest::new().with_from(OTHER).with_to(TARGET);

    let err = resolve_transaction(&identity(&node), &request).await.unwrap_err();

    assert!(
        matches!(err, Error::FromMismatch { expected, actual }
            if expected == PLAYER && actual == OTHER),
        "unexpected error: {err}"
    );
    assert!(err.to_string().contains("argument=\"transaction\""));
    assert!(node.calls().is_empty());
}

#[rstest]
#[case::lowercase("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266")]
#[case::uppercase("0xF39FD6E51AAD88F6F4CE6AB8827279CFFFB92266")]
#[case::checksummed("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")]
#[tokio::test]
async fn test_from_matches_case_insensitively(#[case] from: &str) {
    let node = MockNode::new();
    let request = TxRequest::new().with_from(from).with_gas_limit(21_000);

    let resolved = resolve_transaction(&identity(&node), &request).await.unwrap();

    assert_eq!(resolved.from, PLAYER);
}

#[tokio::test]
async fn test_gas_limit_set_skips_estimation() {
    let node = MockNode::new().with_gas_estimate(1);
    let request = TxRequest::new().with_to(TARGET).with_gas_limit(100_000);

    let resolved = resolve_transaction(&identity(&node), &request).await.unwrap();

    assert_eq!(resolved.gas_limit, 100_000);
    assert_eq!(node.count("eth_estimateGas"), 0);
    assert!(node.calls().is_empty());
}

#[tokio::test]
async fn test_gas_estimated_once_with_signer_as_sender() {
    let node = MockNode::new().with_gas_estimate(77_777);
    let request = TxRequest::new().with_to(TARGET).with_value(U256::from(5));

    let resolved = resolve_transaction(&identity(&node), &request).await.unwrap();

    assert_eq!(resolved.gas_limit, 77_777);
    let estimates = node.requests("eth_estimateGas");
    assert_eq!(estimates.len(), 1);
    assert_eq!(
        estimates[0],
        json!([{
            "from": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
            "to": TARGET.to_checksum(None),
            "value": "0x5",
        }])
    );
}

#[tokio::test]
async fn test_empty_request() {
    let node = MockNode::new();

    let resolved = resolve_transaction(&identity(&node), &TxRequest::new()).await.unwrap();

    assert_eq!(resolved.from, PLAYER);
    assert_eq!(resolved.to, None);
    assert!(resolved.fields.is_empty());
    assert_eq!(node.count("eth_estimateGas"), 1);
    assert_eq!(node.count("eth_call"), 0);
}

#[tokio::test]
async fn test_to_is_left_absent() {
    let node = MockNode::new();
    let request = TxRequest::new().with_gas_limit(21_000).with_data(bytes!("0x6080"));

    let tx = resolve_rpc_transaction(&identity(&node), &request).await.unwrap();

    assert_eq!(tx.get("to"), None);
    assert_eq!(tx.get("data"), Some(&json!("0x6080")));
    assert_eq!(tx.get("gas"), Some(&json!("0x5208")));
}

#[tokio::test]
async fn test_resolves_names() {
    let node = MockNode::new().with_name("game.eth", GAME).with_name("me.eth", PLAYER);
    let request = TxRequest::new().with_from("me.eth").with_to("game.eth");

    let resolved = resolve_transaction(&identity(&node), &request).await.unwrap();

    assert_eq!(resolved.from, PLAYER);
    assert_eq!(resolved.to, Some(GAME));
}

#[tokio::test]
async fn test_named_from_mismatch() {
    let node = MockNode::new().with_name("other.eth", OTHER);
    let request = TxRequest::new().with_from("other.eth").with_gas_limit(21_000);

    let err = resolve_transaction(&identity(&node), &request).await.unwrap_err();

    assert!(
        matches!(err, Error::FromMismatch { actual, .. } if actual == OTHER),
        "unexpected error: {err}"
    );
}

#[rstest]
#[case::unknown_name(MockNode::new().with_name("game.eth", GAME))]
#[case::no_registry(MockNode::new())]
#[tokio::test]
async fn test_unresolved_name(#[case] node: MockNode) {
    let request = TxRequest::new().with_to("nobody.eth");

    let err = resolve_transaction(&identity(&node), &request).await.unwrap_err();

    assert!(matches!(err, Error::UnresolvedName(ref name) if name == "nobody.eth"));
}

#[tokio::test]
async fn test_addressable_recipient_is_shared() {
    let node = MockNode::new();
    let contract = Arc::new(GameContract::new(GAME));
    let request = TxRequest::new()
        .with_to(Arc::clone(&contract))
        .with_field("accessList", vec![TxValue::Addressable(contract.clone())]);

    let resolved = resolve_transaction(&identity(&node), &request).await.unwrap();

    assert_eq!(resolved.to, Some(GAME));
    assert_eq!(resolved.to_rpc().get("accessList"), Some(&json!([GAME.to_checksum(None)])));
    // Held by this test, the request (twice) and the resolved field.
    assert_eq!(Arc::strong_count(&contract), 4);
}

#[tokio::test]
async fn test_failed_lookup_aborts_resolution() {
    let node = MockNode::new().with_name("game.eth", GAME);
    let request = TxRequest::new().with_from(PLAYER).with_to("missing.eth");

    let err = resolve_transaction(&identity(&node), &request).await.unwrap_err();

    assert!(matches!(err, Error::UnresolvedName(_)));
    assert_eq!(node.count("eth_sendTransaction"), 0);
}

#[tokio::test]
async fn test_named_recipient_looked_up_once() {
    let node = MockNode::new().with_name("game.eth", GAME);
    let request = TxRequest::new().with_to("game.eth");

    let resolved = resolve_transaction(&identity(&node), &request).await.unwrap();

    assert_eq!(resolved.to, Some(GAME));
    // Registry then resolver, shared by the estimate and the result.
    assert_eq!(node.count("eth_call"), 2);
    assert_eq!(node.count("eth_estimateGas"), 1);
    assert_eq!(node.requests("eth_estimateGas")[0][0]["to"], json!(GAME.to_checksum(None)));
}

#[tokio::test]
async fn test_names_resolve_case_insensitively() {
    let node = MockNode::new().with_name("game.eth", GAME);
    let request = TxRequest::new().with_to("Game.ETH").with_gas_limit(21_000);

    let resolved = resolve_transaction(&identity(&node), &request).await.unwrap();

    assert_eq!(resolved.to, Some(GAME));
}

#[rstest]
#[case::from(TxRequest::new().with_from("0xF39Fd6e51aad88F6F4ce6aB8827279cffFb92266"))]
#[case::to(TxRequest::new().with_to("0xF39Fd6e51aad88F6F4ce6aB8827279cffFb92266"))]
#[tokio::test]
async fn test_bad_checksum_rejected_without_lookup(#[case] request: TxRequest) {
    let node = MockNode::new();

    let err = resolve_transaction(&identity(&node), &request).await.unwrap_err();

    assert!(matches!(err, Error::InvalidAddress { .. }), "unexpected error: {err}");
    assert_eq!(node.count("eth_call"), 0);
    assert_eq!(node.count("eth_estimateGas"), 0);
}

#[tokio::test]
async fn test_json_quantities_go_out_as_hex() {
    let node = MockNode::new();
    let request = TxRequest::from_json(json!({
        "to": TARGET.to_checksum(None),
        "value": "1000",
        "gasLimit": 21000,
    }))
    .unwrap();

    let tx = resolve_rpc_transaction(&identity(&node), &request).await.unwrap();

    assert_eq!(tx.get("value"), Some(&json!("0x3e8")));
    assert_eq!(tx.get("gas"), Some(&json!("0x5208")));
}
