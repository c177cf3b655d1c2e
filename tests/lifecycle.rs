//! Start/stop/restart behaviour of the running server.

use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::watch;

use node_restful::http::errcode::SUCCESS;
use node_restful::lifecycle::ServerState;

mod common;

use common::MockNode;

async fn wait_for_state_where(
    states: &mut watch::Receiver<ServerState>,
    matches: impl FnMut(&ServerState) -> bool,
) {
    tokio::time::timeout(Duration::from_secs(5), states.wait_for(matches))
        .await
        .expect("server never reached the awaited state")
        .unwrap();
}

async fn wait_for_state(states: &mut watch::Receiver<ServerState>, target: ServerState) {
    wait_for_state_where(states, |s| *s == target).await;
}

#[tokio::test]
async fn restart_answers_before_restarting() {
    let mut config = common::test_config();
    config.lifecycle.restart_delay_ms = 300;
    let server = common::start_server(config, None).await;
    let mut states = server.server.subscribe();

    let started = Instant::now();
    let body = server.get("/api/v1/restart").await;
    assert_eq!(body["Action"], "restart");
    assert_eq!(body["Error"], SUCCESS);
    assert!(started.elapsed() < Duration::from_millis(300));
    assert_eq!(server.server.state(), ServerState::Serving);

    wait_for_state(&mut states, ServerState::Stopped).await;
    wait_for_state(&mut states, ServerState::Serving).await;

    let body = server.get("/api/v1/block/height").await;
    assert_eq!(body["Result"], 1234);

    server.stop().await;
}

#[tokio::test]
async fn restart_keeps_runtime_settings() {
    let server = common::start_server(common::test_config(), None).await;
    let mut states = server.server.subscribe();

    let body = server
        .post(
            "/api/v1/config/noticeserver/addr",
            serde_json::json!({"Url": "http://notice.example:8080"}),
        )
        .await;
    assert_eq!(body["Error"], SUCCESS);

    server.get("/api/v1/restart").await;
    wait_for_state(&mut states, ServerState::Stopped).await;
    wait_for_state(&mut states, ServerState::Serving).await;

    let body = server.get("/api/v1/config/noticeserver/addr").await;
    assert_eq!(body["Result"], "http://notice.example:8080");

    server.stop().await;
}

#[tokio::test]
async fn requests_during_restart_finish_or_fail_to_connect() {
    let mut config = common::test_config();
    config.lifecycle.restart_delay_ms = 100;
    let drain = Duration::from_secs(config.lifecycle.shutdown_timeout_secs);
    let limit = drain + Duration::from_secs(1);
    let server =
        common::start_server_with_node(config, None, MockNode::slow(Duration::from_millis(300)))
            .await;

    let mut states = server.server.subscribe();
    let restarted = tokio::spawn(async move {
        wait_for_state_where(&mut states, |s| *s != ServerState::Serving).await;
        wait_for_state(&mut states, ServerState::Serving).await;
    });

    // Fresh connection per request so none rides a socket from before the stop.
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap();
    let url = server.url("/api/v1/block/height");

    let body = server.get("/api/v1/restart").await;
    assert_eq!(body["Error"], SUCCESS);

    let mut requests = Vec::new();
    while !restarted.is_finished() {
        assert!(requests.len() < 200, "restart did not complete");
        let client = client.clone();
        let url = url.clone();
        requests.push(tokio::spawn(async move {
            tokio::time::timeout(limit, async {
                client.get(&url).send().await?.json::<Value>().await
            })
            .await
        }));
        tokio::time::sleep(Duration::from_millis(30)).await;
    }
    restarted.await.unwrap();

    let mut answered = 0;
    for request in requests {
        match request.await.unwrap() {
            Err(_) => panic!("request hung across the restart"),
            Ok(Ok(body)) => {
                assert_eq!(body["Result"], 1234);
                answered += 1;
            }
            Ok(Err(e)) => assert!(e.is_connect() || e.is_request(), "unexpected error: {}", e),
        }
    }
    assert!(answered > 0);
    assert_eq!(server.server.state(), ServerState::Serving);

    server.stop().await;
}

#[tokio::test]
async fn shutdown_closes_the_port() {
    let server = common::start_server(common::test_config(), None).await;
    let url = server.url("/api/v1/block/height");

    server.stop().await;
    assert!(reqwest::get(url).await.is_err());
}
