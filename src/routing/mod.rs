//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (method, path)
//!     → registry.rs (pick the table for the method class)
//!     → matcher.rs (literal lookup, then placeholder prefix scan)
//!     → Return: (Action, RouteMatch) or no match
//!
//! Registry compilation (at startup):
//!     register(method, template, name, handler)*
//!     → validate templates (duplicates, overlapping prefixes)
//!     → freeze as immutable ActionRegistry
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (exact set + prefix scan)
//! - Deterministic: same path always resolves to the same template
//! - Explicit no-match rather than silent default

pub mod matcher;
pub mod registry;

pub use matcher::{PathMatcher, RouteMatch};
pub use registry::{
    Action, ActionRegistry, Handler, HandlerFuture, MethodClass, RegistryBuilder, RegistryError,
};
