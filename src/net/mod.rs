//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! RestConfig (port, TLS paths)
//!     → listener.rs (port check, plain/TLS decision, bind)
//!     → tls.rs (certificate/key loading)
//!     → BoundListener + axum_server::Handle
//!     → Hand off to the lifecycle controller
//! ```
//!
//! # Design Decisions
//! - Plain and TLS listeners share one serving path (axum-server)
//! - The shutdown handle is owned by the caller, never global
//! - TLS is selected by convention (port % 1000 == 443) or flag

pub mod listener;
pub mod tls;

pub use listener::{bootstrap, BootstrapError, BoundListener};
