//! Handlers owned by the REST layer itself.
//!
//! Ledger queries go to the external `NodeService`; everything here touches
//! only runtime settings, the push notifier, or the lifecycle controller.

use serde_json::Value;

use crate::blockchain::{NodeService, PushNotifier};
use crate::config::validation::is_http_server_addr;
use crate::config::RuntimeSettings;
use crate::http::errcode::{INTERNAL_ERROR, INVALID_PARAMS, SUCCESS};
use crate::http::{keys, Envelope, ParamMap};
use crate::lifecycle::RestartHandle;

/// Body key carrying an address.
pub const URL: &str = "Url";
/// Body key carrying an on/off flag.
pub const OPEN: &str = "Open";
/// Body key toggling websocket block push.
pub const PUSH_BLOCK: &str = "PushBlock";
/// Body key carrying the websocket port.
pub const PORT: &str = "Port";

/// Read a raw string body value; `None` when absent or not a string.
fn raw_str<'a>(params: &'a ParamMap, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|value| value.as_str())
}

pub fn get_oauth_server_addr(settings: &RuntimeSettings) -> Envelope {
    Envelope::success(settings.snapshot().oauth_server_addr.clone())
}

pub fn set_oauth_server_addr(settings: &RuntimeSettings, params: &ParamMap) -> Envelope {
    let Some(addr) = raw_str(params, URL).filter(|a| is_http_server_addr(a)) else {
        return Envelope::new(INVALID_PARAMS);
    };
    let current = settings.update(|s| s.oauth_server_addr = addr.to_string());
    tracing::info!(addr = %current.oauth_server_addr, "OAuth server address updated");
    Envelope::success(current.oauth_server_addr.clone())
}

pub fn get_notice_server_addr(settings: &RuntimeSettings) -> Envelope {
    Envelope::success(settings.snapshot().notice_server_addr.clone())
}

pub fn set_notice_server_addr(settings: &RuntimeSettings, params: &ParamMap) -> Envelope {
    let Some(addr) = raw_str(params, URL).filter(|a| is_http_server_addr(a)) else {
        return Envelope::new(INVALID_PARAMS);
    };
    let current = settings.update(|s| s.notice_server_addr = addr.to_string());
    tracing::info!(addr = %current.notice_server_addr, "Notice server address updated");
    Envelope::success(current.notice_server_addr.clone())
}

/// Toggle pushing new blocks to the notice server.
pub fn set_post_block(settings: &RuntimeSettings, params: &ParamMap) -> Envelope {
    let Some(open) = params.bool(OPEN) else {
        return Envelope::new(INVALID_PARAMS);
    };
    settings.update(|s| s.notice_push_block = open);
    tracing::info!(open, "Notice block push toggled");
    Envelope::success(open)
}

/// Start, restart or stop the websocket push server.
pub fn set_websocket_state(
    settings: &RuntimeSettings,
    push: &dyn PushNotifier,
    params: &ParamMap,
) -> Envelope {
    let Some(open) = params.bool(OPEN) else {
        return Envelope::new(INVALID_PARAMS);
    };

    let push_block = match params.get(PUSH_BLOCK) {
        Some(value) if !value.is_absent() => match value.as_bool() {
            Some(flag) => Some(flag),
            None => return Envelope::new(INVALID_PARAMS),
        },
        _ => None,
    };

    let port = match params.number(PORT) {
        Some(n) if n == 0.0 => None,
        Some(n) if n.fract() == 0.0 && n > 0.0 && n <= f64::from(u16::MAX) => Some(n as u16),
        Some(_) => return Envelope::new(INVALID_PARAMS),
        None if params.get(PORT).is_some_and(|v| !v.is_absent()) => {
            return Envelope::new(INVALID_PARAMS)
        }
        None => None,
    };

    if let Some(flag) = push_block {
        push.set_push_block(flag);
    }
    let current = settings.update(|s| {
        if let Some(port) = port {
            s.ws_port = port;
        }
    });

    if open {
        push.restart(current.ws_port);
    } else {
        push.stop();
    }
    tracing::info!(open, port = current.ws_port, "Websocket state changed");
    Envelope::success(open)
}

/// Hand the owner of a freshly submitted transaction to the push server.
///
/// Consumes the envelope's `user_id`; it never reaches the wire.
pub fn forward_tx_owner(push: &dyn PushNotifier, mut envelope: Envelope) -> Envelope {
    let user_id = envelope.user_id.take();
    if let (Some(user_id), Value::String(tx_hash)) = (user_id, &envelope.result) {
        if !user_id.is_empty() && envelope.is_success() {
            push.set_tx_owner(tx_hash, &user_id);
        }
    }
    envelope
}

/// Submit a raw transaction and record who sent it.
///
/// The sender is the request's `Userid` unless the node reported one itself.
pub async fn send_raw_transaction(
    node: &dyn NodeService,
    push: &dyn PushNotifier,
    params: ParamMap,
) -> Envelope {
    let user_id = params.str(keys::USER_ID).map(str::to_string);
    let mut envelope = node.send_raw_transaction(params).await;
    if envelope.user_id.is_none() {
        envelope.user_id = user_id;
    }
    forward_tx_owner(push, envelope)
}

/// Queue an in-process restart and answer immediately.
pub fn restart(handle: &RestartHandle) -> Envelope {
    if handle.request() {
        tracing::info!("REST server restart requested");
        Envelope::new(SUCCESS)
    } else {
        Envelope::new(INTERNAL_ERROR)
    }
}
