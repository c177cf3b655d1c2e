//! REST gateway of a blockchain node.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::schema::ServerConfig;
pub use http::Dispatcher;
pub use lifecycle::{RestServer, Shutdown};
