//! Websocket push subsystem contract.
//!
//! The push server itself lives elsewhere; the REST layer only toggles it and
//! tells it who owns a freshly submitted transaction.

/// Operations the REST layer needs from the websocket push server.
pub trait PushNotifier: Send + Sync {
    /// Remember that `user_id` submitted transaction `tx_hash`.
    fn set_tx_owner(&self, tx_hash: &str, user_id: &str);

    /// Enable or disable pushing new blocks to websocket clients.
    fn set_push_block(&self, enabled: bool);

    /// (Re)start the push server on `port`.
    fn restart(&self, port: u16);

    /// Stop the push server.
    fn stop(&self);
}

/// Push notifier for nodes running without a websocket server; only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedPush;

impl PushNotifier for DetachedPush {
    fn set_tx_owner(&self, tx_hash: &str, user_id: &str) {
        tracing::debug!(tx_hash, user_id, "Transaction owner recorded (no push server)");
    }

    fn set_push_block(&self, enabled: bool) {
        tracing::info!(enabled, "Websocket block push toggled (no push server)");
    }

    fn restart(&self, port: u16) {
        tracing::info!(port, "Websocket restart requested (no push server)");
    }

    fn stop(&self) {
        tracing::info!("Websocket stop requested (no push server)");
    }
}
