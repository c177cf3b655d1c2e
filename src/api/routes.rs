//! Route table of the node REST API.

use std::sync::Arc;

use futures_util::future::{ready, BoxFuture};

use crate::api::handlers;
use crate::blockchain::{NodeService, PushNotifier};
use crate::config::RuntimeSettings;
use crate::http::{Envelope, ParamMap};
use crate::lifecycle::RestartHandle;
use crate::routing::{ActionRegistry, Handler, RegistryError};

pub const API_GET_CONNECTION_COUNT: &str = "/api/v1/node/connectioncount";
pub const API_GET_BLOCK_BY_HEIGHT: &str = "/api/v1/block/details/height/:height";
pub const API_GET_BLOCK_BY_HASH: &str = "/api/v1/block/details/hash/:hash";
pub const API_GET_BLOCK_HEIGHT: &str = "/api/v1/block/height";
pub const API_GET_BLOCK_HASH: &str = "/api/v1/block/hash/:height";
pub const API_GET_TRANSACTION: &str = "/api/v1/transaction/:hash";
pub const API_GET_ASSET: &str = "/api/v1/asset/:hash";
pub const API_GET_UNSPENT_OUTPUT: &str = "/api/v1/asset/unspendoutput";
pub const API_RESTART: &str = "/api/v1/restart";

pub const API_SEND_RAW_TRANSACTION: &str = "/api/v1/transaction";
pub const API_SEND_RECORD: &str = "/api/v1/custom/transaction/record";
pub const API_NOTICE_POST_BLOCK: &str = "/api/v1/config/noticeserver/state";
pub const API_WEBSOCKET_STATE: &str = "/api/v1/config/websocket/state";

/// Readable and writable without a token, so a node can be pointed at its
/// token server in the first place.
pub const API_OAUTH_SERVER_ADDR: &str = "/api/v1/config/oauthserver/addr";
pub const API_NOTICE_SERVER_ADDR: &str = "/api/v1/config/noticeserver/addr";

/// Collaborators the handlers close over.
#[derive(Clone)]
pub struct ApiContext {
    pub node: Arc<dyn NodeService>,
    pub push: Arc<dyn PushNotifier>,
    pub settings: Arc<RuntimeSettings>,
    pub restart: RestartHandle,
}

/// One `NodeService` method, as a function pointer.
type NodeOp = for<'a> fn(&'a dyn NodeService, ParamMap) -> BoxFuture<'a, Envelope>;

/// Forward straight to the ledger.
fn node_action(node: &Arc<dyn NodeService>, op: NodeOp) -> impl Handler {
    let node = Arc::clone(node);
    move |params: ParamMap| {
        let node = Arc::clone(&node);
        async move { op(node.as_ref(), params).await }
    }
}

/// Run a synchronous settings handler.
fn settings_action(
    settings: &Arc<RuntimeSettings>,
    op: fn(&RuntimeSettings, &ParamMap) -> Envelope,
) -> impl Handler {
    let settings = Arc::clone(settings);
    move |params: ParamMap| ready(op(&settings, &params))
}

/// Register every REST action.
pub fn build_registry(ctx: ApiContext) -> Result<ActionRegistry, RegistryError> {
    let ApiContext {
        node,
        push,
        settings,
        restart,
    } = ctx;

    let get_oauth = {
        let settings = Arc::clone(&settings);
        move |_: ParamMap| ready(handlers::get_oauth_server_addr(&settings))
    };
    let get_notice = {
        let settings = Arc::clone(&settings);
        move |_: ParamMap| ready(handlers::get_notice_server_addr(&settings))
    };
    let websocket_state = {
        let settings = Arc::clone(&settings);
        let push = Arc::clone(&push);
        move |params: ParamMap| {
            ready(handlers::set_websocket_state(&settings, push.as_ref(), &params))
        }
    };
    let send_raw = {
        let node = Arc::clone(&node);
        let push = Arc::clone(&push);
        move |params: ParamMap| {
            let node = Arc::clone(&node);
            let push = Arc::clone(&push);
            async move {
                handlers::send_raw_transaction(node.as_ref(), push.as_ref(), params).await
            }
        }
    };
    let restart_action = move |_: ParamMap| ready(handlers::restart(&restart));

    ActionRegistry::builder()
        .get(
            API_GET_CONNECTION_COUNT,
            "getconnectioncount",
            node_action(&node, |n, p| n.connection_count(p)),
        )
        .get(
            API_GET_BLOCK_BY_HEIGHT,
            "getblockbyheight",
            node_action(&node, |n, p| n.block_by_height(p)),
        )
        .get(
            API_GET_BLOCK_BY_HASH,
            "getblockbyhash",
            node_action(&node, |n, p| n.block_by_hash(p)),
        )
        .get(
            API_GET_BLOCK_HEIGHT,
            "getblockheight",
            node_action(&node, |n, p| n.block_height(p)),
        )
        .get(
            API_GET_BLOCK_HASH,
            "getblockhash",
            node_action(&node, |n, p| n.block_hash(p)),
        )
        .get(
            API_GET_TRANSACTION,
            "gettransaction",
            node_action(&node, |n, p| n.transaction(p)),
        )
        .get(
            API_GET_ASSET,
            "getasset",
            node_action(&node, |n, p| n.asset(p)),
        )
        .get(
            API_GET_UNSPENT_OUTPUT,
            "getunspendoutput",
            node_action(&node, |n, p| n.unspent_outputs(p)),
        )
        .get(API_OAUTH_SERVER_ADDR, "getoauthserveraddr", get_oauth)
        .get(API_NOTICE_SERVER_ADDR, "getnoticeserveraddr", get_notice)
        .get(API_RESTART, "restart", restart_action)
        .post(API_SEND_RAW_TRANSACTION, "sendrawtransaction", send_raw)
        .post(
            API_SEND_RECORD,
            "sendrecord",
            node_action(&node, |n, p| n.send_record_transaction(p)),
        )
        .post(
            API_OAUTH_SERVER_ADDR,
            "setoauthserveraddr",
            settings_action(&settings, handlers::set_oauth_server_addr),
        )
        .post(
            API_NOTICE_SERVER_ADDR,
            "setnoticeserveraddr",
            settings_action(&settings, handlers::set_notice_server_addr),
        )
        .post(
            API_NOTICE_POST_BLOCK,
            "setpostblock",
            settings_action(&settings, handlers::set_post_block),
        )
        .post(API_WEBSOCKET_STATE, "setwebsocketstate", websocket_state)
        .build()
}
