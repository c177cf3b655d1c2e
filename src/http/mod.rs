//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Dispatcher: preflight, resolve, authorize)
//!     → request.rs (query/body → ParamMap)
//!     → [action handler]
//!     → response.rs (Envelope → JSON + CORS headers)
//!     → errcode.rs (Error → Desc)
//!     → Send to client
//! ```

pub mod errcode;
pub mod request;
pub mod response;
pub mod server;

pub use request::{keys, BodyError, ParamMap, ParamValue, QueryParams};
pub use response::{preflight_response, Envelope};
pub use server::{DispatchError, Dispatcher};
