//! Ledger operations reached through the REST surface.
//!
//! The node's block store, transaction pool and asset index live outside this
//! crate. Each method receives the normalized parameters of one request and
//! returns the envelope to write; the error code inside it is passed through
//! untouched.

use async_trait::async_trait;

use crate::http::errcode::INTERNAL_ERROR;
use crate::http::{Envelope, ParamMap};

/// The node's query and mutation operations.
#[async_trait]
pub trait NodeService: Send + Sync {
    /// Number of connected peers.
    async fn connection_count(&self, params: ParamMap) -> Envelope;

    /// Block at `Height`; `Raw=1` asks for the serialized form.
    async fn block_by_height(&self, params: ParamMap) -> Envelope;

    /// Block with hash `Hash`.
    async fn block_by_hash(&self, params: ParamMap) -> Envelope;

    /// Current chain height.
    async fn block_height(&self, params: ParamMap) -> Envelope;

    /// Hash of the block at `Height`.
    async fn block_hash(&self, params: ParamMap) -> Envelope;

    /// Transaction with hash `Hash`.
    async fn transaction(&self, params: ParamMap) -> Envelope;

    /// Asset registered by transaction `Hash`.
    async fn asset(&self, params: ParamMap) -> Envelope;

    /// Unspent outputs of `Addr` for asset `Assetid`.
    async fn unspent_outputs(&self, params: ParamMap) -> Envelope;

    /// Submit the hex-encoded transaction in `Data`.
    ///
    /// Returns the transaction hash as `Result`. An envelope may name an
    /// owner through `user_id` to be notified once the transaction lands.
    async fn send_raw_transaction(&self, params: ParamMap) -> Envelope;

    /// Build and submit a record transaction from the body.
    async fn send_record_transaction(&self, params: ParamMap) -> Envelope;
}

/// Stand-in used when the server runs without a ledger attached.
///
/// Every operation answers `INTERNAL_ERROR`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedNode;

impl DetachedNode {
    fn unavailable(operation: &'static str) -> Envelope {
        tracing::debug!(operation, "No ledger attached");
        Envelope::new(INTERNAL_ERROR).with_result("ledger not attached")
    }
}

#[async_trait]
impl NodeService for DetachedNode {
    async fn connection_count(&self, _: ParamMap) -> Envelope {
        Self::unavailable("connection_count")
    }

    async fn block_by_height(&self, _: ParamMap) -> Envelope {
        Self::unavailable("block_by_height")
    }

    async fn block_by_hash(&self, _: ParamMap) -> Envelope {
        Self::unavailable("block_by_hash")
    }

    async fn block_height(&self, _: ParamMap) -> Envelope {
        Self::unavailable("block_height")
    }

    async fn block_hash(&self, _: ParamMap) -> Envelope {
        Self::unavailable("block_hash")
    }

    async fn transaction(&self, _: ParamMap) -> Envelope {
        Self::unavailable("transaction")
    }

    async fn asset(&self, _: ParamMap) -> Envelope {
        Self::unavailable("asset")
    }

    async fn unspent_outputs(&self, _: ParamMap) -> Envelope {
        Self::unavailable("unspent_outputs")
    }

    async fn send_raw_transaction(&self, _: ParamMap) -> Envelope {
        Self::unavailable("send_raw_transaction")
    }

    async fn send_record_transaction(&self, _: ParamMap) -> Envelope {
        Self::unavailable("send_record_transaction")
    }
}
