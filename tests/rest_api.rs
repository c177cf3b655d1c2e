//! End-to-end tests of the REST surface over real sockets.

use serde_json::{json, Value};

use node_restful::http::errcode::{
    ILLEGAL_DATAFORMAT, INVALID_METHOD, INVALID_PARAMS, INVALID_TOKEN, OAUTH_TIMEOUT, SUCCESS,
};

mod common;

#[tokio::test]
async fn block_by_height_round_trip() {
    let server = common::start_server(common::test_config(), None).await;

    let body = server.get("/api/v1/block/details/height/100?raw=1").await;
    assert_eq!(body["Action"], "getblockbyheight");
    assert_eq!(body["Error"], SUCCESS);
    assert_eq!(body["Desc"], "SUCCESS");
    assert_eq!(body["Version"], "1.0.0");
    assert_eq!(body["Result"]["Height"], "100");
    assert_eq!(body["Result"]["Raw"], "1");
    assert_eq!(body["Result"]["Hash"], Value::Null);

    let body = server.get("/api/v1/block/height").await;
    assert_eq!(body["Result"], 1234);

    server.stop().await;
}

#[tokio::test]
async fn unknown_path_and_method_answer_200_invalid_method() {
    let server = common::start_server(common::test_config(), None).await;

    let response = reqwest::get(server.url("/api/v2/nothing")).await.unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["Error"], INVALID_METHOD);

    let response = reqwest::Client::new()
        .put(server.url("/api/v1/transaction"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["Error"], INVALID_METHOD);

    server.stop().await;
}

#[tokio::test]
async fn preflight_is_empty_with_cors_headers() {
    let server = common::start_server(common::test_config(), None).await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, server.url("/api/v1/transaction"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert_eq!(response.headers()["access-control-allow-headers"], "Content-Type");
    assert!(response.text().await.unwrap().is_empty());

    server.stop().await;
}

#[tokio::test]
async fn raw_transaction_records_owner() {
    let server = common::start_server(common::test_config(), None).await;

    let body = server
        .post("/api/v1/transaction?userid=alice", json!({"Data": "deadbeef"}))
        .await;
    assert_eq!(body["Action"], "sendrawtransaction");
    assert_eq!(body["Result"], "deadbeef");
    assert!(body.get("Userid").is_none());
    assert_eq!(server.push.calls(), vec!["owner deadbeef alice"]);

    server.stop().await;
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let server = common::start_server(common::test_config(), None).await;

    let body: Value = reqwest::Client::new()
        .post(server.url("/api/v1/custom/transaction/record"))
        .body("{oops")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["Error"], ILLEGAL_DATAFORMAT);
    assert_eq!(body["Action"], "sendrecord");

    server.stop().await;
}

#[tokio::test]
async fn websocket_state_drives_push_server() {
    let server = common::start_server(common::test_config(), None).await;

    let body = server
        .post("/api/v1/config/websocket/state", json!({"Open": true, "Port": 30335}))
        .await;
    assert_eq!(body["Error"], SUCCESS);

    let body = server
        .post("/api/v1/config/websocket/state", json!({"Open": false}))
        .await;
    assert_eq!(body["Result"], false);

    let body = server
        .post("/api/v1/config/websocket/state", json!({"Port": 1}))
        .await;
    assert_eq!(body["Error"], INVALID_PARAMS);

    assert_eq!(server.push.calls(), vec!["restart 30335", "stop"]);

    server.stop().await;
}

#[tokio::test]
async fn oauth_gate_end_to_end() {
    let oauth = common::start_mock_oauth().await;
    let mut config = common::test_config();
    config.oauth.server_addr = format!("http://{}/auth", oauth);
    let server = common::start_server(config, None).await;

    // Rejected token: the envelope carries the oauth reply.
    let body = server.get("/api/v1/asset/ff01?access_token=bad").await;
    assert_eq!(body["Error"], INVALID_TOKEN);
    assert_eq!(body["Action"], "getasset");
    assert_eq!(body["Result"]["Result"], "token expired");

    // Accepted token: the caller key reaches the handler.
    let body = server.get("/api/v1/asset/ff01?access_token=good&auth_type=x").await;
    assert_eq!(body["Error"], SUCCESS);
    assert_eq!(body["Result"]["CAkey"], "ca-7");
    assert_eq!(body["Result"]["Hash"], "ff01");

    // The oauth address route stays reachable without a valid token.
    let body = server.get("/api/v1/config/oauthserver/addr").await;
    assert_eq!(body["Error"], SUCCESS);
    assert_eq!(body["Result"], format!("http://{}/auth", oauth));

    // Pointing at a dead server makes every other route time out.
    let dead = format!("http://127.0.0.1:{}/auth", common::free_port());
    let body = server
        .post("/api/v1/config/oauthserver/addr", json!({"Url": dead}))
        .await;
    assert_eq!(body["Error"], SUCCESS);

    let body = server.get("/api/v1/block/height?access_token=good").await;
    assert_eq!(body["Error"], OAUTH_TIMEOUT);
    assert_eq!(body["Desc"], "CONNECT TO OAUTH TIMEOUT");

    // Clearing it reopens the gate.
    let body = server
        .post("/api/v1/config/oauthserver/addr", json!({"Url": ""}))
        .await;
    assert_eq!(body["Error"], SUCCESS);
    let body = server.get("/api/v1/block/height").await;
    assert_eq!(body["Error"], SUCCESS);

    server.stop().await;
}
