//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//!
//! At runtime:
//!     configuration endpoints
//!     → runtime.rs (atomic swap of Arc<NodeSettings>)
//!     → token validator / push handlers observe new settings
//! ```
//!
//! # Design Decisions
//! - Static config is immutable once loaded; changes require a restart
//! - Settings the API may change live in `RuntimeSettings`, not in the config
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod runtime;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use runtime::{NodeSettings, RuntimeSettings};
pub use schema::{
    LifecycleConfig, NoticeConfig, OauthConfig, ObservabilityConfig, RestConfig, SecurityConfig,
    ServerConfig, TlsConfig, WebsocketConfig,
};
pub use validation::{validate_config, ValidationError};
