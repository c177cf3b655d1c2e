//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{extract::Query, routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use node_restful::blockchain::{NodeService, PushNotifier};
use node_restful::config::ServerConfig;
use node_restful::http::{Envelope, ParamMap, ParamValue};
use node_restful::lifecycle::{
    self, Collaborators, LifecycleError, RestServer, ServerState, Shutdown,
};
use node_restful::security::TokenValidator;

/// Reserve a free local port.
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Plain-HTTP config on a free port with short lifecycle delays.
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.rest.bind_host = "127.0.0.1".into();
    config.rest.http_rest_port = free_port();
    config.lifecycle.restart_delay_ms = 50;
    config.lifecycle.shutdown_timeout_secs = 1;
    config
}

fn param_json(value: &ParamValue) -> Value {
    match value {
        ParamValue::Absent => Value::Null,
        ParamValue::Str(s) => json!(s),
        ParamValue::Number(n) => json!(n),
        ParamValue::Bool(b) => json!(b),
        ParamValue::Json(v) => v.clone(),
    }
}

/// Ledger stand-in that echoes the parameters it receives.
#[derive(Default)]
pub struct MockNode {
    height_delay: Duration,
}

impl MockNode {
    /// A node whose `block_height` takes `delay` to answer.
    pub fn slow(delay: Duration) -> Self {
        Self {
            height_delay: delay,
        }
    }

    fn echo(operation: &str, params: &ParamMap) -> Envelope {
        let mut out = serde_json::Map::new();
        out.insert("op".into(), json!(operation));
        for (k, v) in params.iter() {
            out.insert(k.to_string(), param_json(v));
        }
        Envelope::success(Value::Object(out))
    }
}

#[async_trait]
impl NodeService for MockNode {
    async fn connection_count(&self, _: ParamMap) -> Envelope {
        Envelope::success(8)
    }
    async fn block_by_height(&self, params: ParamMap) -> Envelope {
        Self::echo("block_by_height", &params)
    }
    async fn block_by_hash(&self, params: ParamMap) -> Envelope {
        Self::echo("block_by_hash", &params)
    }
    async fn block_height(&self, _: ParamMap) -> Envelope {
        tokio::time::sleep(self.height_delay).await;
        Envelope::success(1234)
    }
    async fn block_hash(&self, params: ParamMap) -> Envelope {
        Self::echo("block_hash", &params)
    }
    async fn transaction(&self, params: ParamMap) -> Envelope {
        Self::echo("transaction", &params)
    }
    async fn asset(&self, params: ParamMap) -> Envelope {
        Self::echo("asset", &params)
    }
    async fn unspent_outputs(&self, params: ParamMap) -> Envelope {
        Self::echo("unspent_outputs", &params)
    }
    async fn send_raw_transaction(&self, params: ParamMap) -> Envelope {
        // Pretend the payload is the transaction hash.
        match params.str("Data") {
            Some(data) => Envelope::success(data.to_string()),
            None => Envelope::new(node_restful::http::errcode::INVALID_PARAMS),
        }
    }
    async fn send_record_transaction(&self, params: ParamMap) -> Envelope {
        Self::echo("send_record_transaction", &params)
    }
}

/// Push notifier that records every call.
#[derive(Default)]
pub struct MockPush {
    calls: Mutex<Vec<String>>,
}

impl MockPush {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl PushNotifier for MockPush {
    fn set_tx_owner(&self, tx_hash: &str, user_id: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("owner {} {}", tx_hash, user_id));
    }
    fn set_push_block(&self, enabled: bool) {
        self.calls.lock().unwrap().push(format!("push_block {}", enabled));
    }
    fn restart(&self, port: u16) {
        self.calls.lock().unwrap().push(format!("restart {}", port));
    }
    fn stop(&self) {
        self.calls.lock().unwrap().push("stop".into());
    }
}

/// A running server plus everything needed to drive it.
pub struct TestServer {
    pub base_url: String,
    pub server: Arc<RestServer>,
    pub push: Arc<MockPush>,
    pub shutdown: Shutdown,
    pub task: JoinHandle<Result<(), LifecycleError>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Value {
        reqwest::get(self.url(path)).await.unwrap().json().await.unwrap()
    }

    pub async fn post(&self, path: &str, body: Value) -> Value {
        reqwest::Client::new()
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    /// Trigger shutdown and wait for the supervisor to return.
    pub async fn stop(self) {
        self.shutdown.trigger();
        let result = tokio::time::timeout(Duration::from_secs(5), self.task)
            .await
            .expect("supervisor did not stop")
            .unwrap();
        assert!(result.is_ok());
        assert_eq!(self.server.state(), ServerState::Stopped);
    }
}

/// Assemble and run a server with mock collaborators.
pub async fn start_server(
    config: ServerConfig,
    validator: Option<Arc<dyn TokenValidator>>,
) -> TestServer {
    start_server_with_node(config, validator, MockNode::default()).await
}

/// Like `start_server`, with a specific ledger stand-in.
pub async fn start_server_with_node(
    config: ServerConfig,
    validator: Option<Arc<dyn TokenValidator>>,
    node: MockNode,
) -> TestServer {
    let port = config.rest.http_rest_port;
    let push = Arc::new(MockPush::default());
    let assembled = lifecycle::assemble(
        config,
        Collaborators {
            node: Arc::new(node),
            push: push.clone(),
            validator,
        },
    )
    .unwrap();

    let server = Arc::clone(&assembled.server);
    let shutdown = Shutdown::new();
    let stopped = shutdown.signalled();
    let task = tokio::spawn(async move {
        assembled.server.run(assembled.restarts, stopped).await
    });

    tokio::time::timeout(Duration::from_secs(5), server.wait_for(ServerState::Serving))
        .await
        .expect("server did not start");

    TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        server,
        push,
        shutdown,
        task,
    }
}

#[derive(serde::Deserialize)]
struct TokenQuery {
    token: String,
}

/// Start an oauth server granting token "good" as `CaKey` "ca-7".
pub async fn start_mock_oauth() -> SocketAddr {
    let app = Router::new().route(
        "/auth",
        get(|Query(q): Query<TokenQuery>| async move {
            if q.token == "good" {
                Json(json!({"Error": 0, "Result": {"CaKey": "ca-7"}}))
            } else {
                Json(json!({"Error": 42003, "Result": "token expired"}))
            }
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
