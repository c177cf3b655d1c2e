//! Node REST API surface.
//!
//! # Data Flow
//! ```text
//! routes.rs (template constants, registry wiring)
//!     → ledger routes → blockchain::NodeService
//!     → settings routes → handlers.rs → config::RuntimeSettings
//!     → websocket/tx-owner routes → handlers.rs → blockchain::PushNotifier
//!     → restart route → handlers.rs → lifecycle::RestartHandle
//! ```
//!
//! # Design Decisions
//! - The route table is built once at startup and never changes
//! - Handlers receive their collaborators by closure capture, not globals

pub mod handlers;
pub mod routes;

pub use routes::{build_registry, ApiContext, API_OAUTH_SERVER_ADDR};
