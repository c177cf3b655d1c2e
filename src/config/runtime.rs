//! Node settings that can change while the server is running.
//!
//! Seeded from the loaded configuration and updated by the configuration
//! endpoints (oauth/notice addresses, push flags, websocket port). Readers
//! take a lock-free snapshot; writers publish a whole new value.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::ServerConfig;

/// One consistent view of the runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeSettings {
    /// Token-issuing server; empty disables token checks.
    pub oauth_server_addr: String,
    /// Server that receives pushed blocks.
    pub notice_server_addr: String,
    /// Whether new blocks are pushed to the notice server.
    pub notice_push_block: bool,
    /// Port of the websocket push server.
    pub ws_port: u16,
}

/// Shared, atomically swapped settings.
#[derive(Debug)]
pub struct RuntimeSettings {
    current: ArcSwap<NodeSettings>,
}

impl RuntimeSettings {
    pub fn new(settings: NodeSettings) -> Self {
        Self {
            current: ArcSwap::from_pointee(settings),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(NodeSettings {
            oauth_server_addr: config.oauth.server_addr.clone(),
            notice_server_addr: config.notice.server_addr.clone(),
            notice_push_block: config.notice.push_block,
            ws_port: config.websocket.http_ws_port,
        })
    }

    /// Current settings.
    pub fn snapshot(&self) -> Arc<NodeSettings> {
        self.current.load_full()
    }

    /// Apply `change` to a copy of the current settings and publish it.
    pub fn update(&self, change: impl Fn(&mut NodeSettings)) -> Arc<NodeSettings> {
        self.current.rcu(|current| {
            let mut next = NodeSettings::clone(current);
            change(&mut next);
            next
        });
        self.snapshot()
    }

    pub fn oauth_server_addr(&self) -> String {
        self.current.load().oauth_server_addr.clone()
    }
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self::new(NodeSettings::default())
    }
}
