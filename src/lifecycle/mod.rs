//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Runtime settings → Registry → Dispatcher → RestServer
//!
//! Controller (controller.rs):
//!     Stopped → Starting → Serving → Stopping → Stopped
//!     Restart request → delay → stop → delay → start
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger → supervisor stops the server
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then collaborators, then listener
//! - Ordered shutdown: stop accept, drain, close
//! - Draining has a deadline: connections are cut after it

pub mod controller;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use controller::{
    restart_channel, LifecycleError, RestServer, RestartHandle, RestartRequests, ServerState,
};
pub use shutdown::Shutdown;
pub use startup::{assemble, Assembled, Collaborators, StartupError};
