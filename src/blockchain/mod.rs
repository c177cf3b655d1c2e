//! Blockchain collaborators.
//!
//! # Data Flow
//! ```text
//! Dispatched request
//!     → service.rs (NodeService: block/transaction/asset queries, submission)
//!     → push.rs (PushNotifier: websocket toggles, transaction owners)
//! ```
//!
//! # Design Decisions
//! - The ledger and the push server are external; only their contracts live here
//! - Ledger calls are async and may block the request, never other requests
//! - Detached implementations let the server run without either subsystem

pub mod push;
pub mod service;

pub use push::{DetachedPush, PushNotifier};
pub use service::{DetachedNode, NodeService};
