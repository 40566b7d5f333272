//! Tests for the alloy-backed node against a JSON-RPC endpoint.

use alloy_primitives::{b256, Address, Bytes, U256};
use alloy_sol_types::{SolError, SolValue};
use reqwest::Url;
use rng_game::{
    game::{GameContract, GuessRecord, IRngBinaryGame},
    send_unchecked_transaction,
    test_utils::{GAME, PLAYER},
    AlloyNode, Error, Node, NodeError, SigningIdentity, TxRequest,
};
use serde_json::{json, Value};
use wiremock::{matchers::body_partial_json, Mock, MockServer, Request, Respond, ResponseTemplate};

/// Answers a JSON-RPC request with a fixed `result` or `error`, echoing the request id.
struct RpcResponder {
    member: &'static str,
    payload: Value,
}

impl RpcResponder {
    fn result(result: Value) -> Self {
        Self { member: "result", payload: result }
    }

    fn error(code: i64, message: &str, data: Option<Value>) -> Self {
        let mut error = json!({ "code": code, "message": message });
        if let Some(data) = data {
            error["data"] = data;
        }
        Self { member: "error", payload: error }
    }
}

impl Respond for RpcResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let mut response = json!({ "jsonrpc": "2.0", "id": body["id"] });
        response[self.member] = self.payload.clone();
        ResponseTemplate::new(200).set_body_json(response)
    }
}

async fn mount(server: &MockServer, method: &str, responder: RpcResponder) {
    Mock::given(body_partial_json(json!({ "method": method })))
        .respond_with(responder)
        .mount(server)
        .await;
}

fn connect(server: &MockServer) -> AlloyNode {
    AlloyNode::connect_http(Url::parse(&server.uri()).unwrap(), None)
}

#[tokio::test]
async fn test_typed_requests() {
    let server = MockServer::start().await;
    mount(&server, "eth_accounts", RpcResponder::result(json!([PLAYER]))).await;
    mount(&server, "eth_getBalance", RpcResponder::result(json!("0x3e8"))).await;
    mount(&server, "eth_estimateGas", RpcResponder::result(json!("0x5208"))).await;
    let node = connect(&server);

    assert_eq!(node.accounts().await.unwrap(), vec![PLAYER]);
    assert_eq!(node.balance(PLAYER).await.unwrap(), U256::from(1000));
    assert_eq!(node.estimate_gas(&Default::default()).await.unwrap(), 21_000);
}

#[tokio::test]
async fn test_rejection_keeps_code_and_revert_data() {
    let server = MockServer::start().await;
    let revert = Bytes::from(IRngBinaryGame::GameNotFound {}.abi_encode());
    mount(
        &server,
        "eth_call",
        RpcResponder::error(3, "execution reverted", Some(json!(revert.clone()))),
    )
    .await;
    let node = connect(&server);

    let err = GameContract::new(GAME).game_state(&node, PLAYER).await.unwrap_err();
    assert!(matches!(err, Error::GameNotFound(player) if player == PLAYER), "{err}");

    let err = node.call(&Default::default()).await.unwrap_err();
    match err {
        NodeError::Rejected { method, code, data, .. } => {
            assert_eq!(method, "eth_call");
            assert_eq!(code, 3);
            assert_eq!(data, Some(revert));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_game_state_decoding() {
    let server = MockServer::start().await;
    let records = [GuessRecord::against(128, 100), GuessRecord::against(64, 100)];
    let guesses: Vec<IRngBinaryGame::Guess> = records.iter().copied().map(Into::into).collect();
    let output = Bytes::from((guesses,).abi_encode_params());
    mount(&server, "eth_call", RpcResponder::result(json!(output))).await;
    let node = connect(&server);

    let state = GameContract::new(GAME).game_state(&node, PLAYER).await.unwrap();

    assert_eq!(state.records(), records);
    assert_eq!(state.outcome(), None);
}

#[tokio::test]
async fn test_unchecked_send() {
    let server = MockServer::start().await;
    let hash = b256!("0x1111111111111111111111111111111111111111111111111111111111111111");
    mount(&server, "eth_estimateGas", RpcResponder::result(json!("0xcf08"))).await;
    Mock::given(body_partial_json(json!({
        "method": "eth_sendTransaction",
        "params": [{ "from": PLAYER.to_checksum(None), "gas": "0xcf08" }],
    })))
    .respond_with(RpcResponder::result(json!(hash)))
    .expect(1)
    .mount(&server)
    .await;
    let identity = SigningIdentity::new(PLAYER, connect(&server));

    let request = GameContract::new(GAME).guess(42);
    let sent = send_unchecked_transaction(&identity, &request).await.unwrap();

    assert_eq!(sent, hash);
}

#[tokio::test]
async fn test_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(body_partial_json(json!({ "method": "eth_accounts" })))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let node = connect(&server);

    let err = node.accounts().await.unwrap_err();

    assert!(matches!(err, NodeError::Transport(_)), "{err}");
}

#[tokio::test]
async fn test_ens_without_registry() {
    let server = MockServer::start().await;
    mount(&server, "eth_call", RpcResponder::result(json!("0x"))).await;
    let node = connect(&server);

    assert_eq!(node.resolve_name("game.eth").await.unwrap(), None::<Address>);
}
