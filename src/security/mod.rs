//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Resolved request (template, query):
//!     → access_control.rs (auth_type + access_token → TokenValidator)
//!     → caller key on success, Unauthorized envelope otherwise
//! ```
//!
//! # Design Decisions
//! - Fail closed: any positive validator code rejects the request
//! - Exactly one exempt route (oauth address configuration)
//! - The validator is a trait object so deployments can swap token servers

pub mod access_control;

pub use access_control::{
    AuthorizationGate, OauthValidator, TokenCheck, TokenValidator, Unauthorized,
};
