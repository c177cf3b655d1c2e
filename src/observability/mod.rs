//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher, lifecycle, handlers produce:
//!     → logging.rs (structured tracing events, EnvFilter)
//!     → metrics.rs (request counters, latency histograms, restarts)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID (`x-request-id`) is set and echoed by the dispatcher layers
//! - Metrics are cheap no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
