//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the REST
//! server. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the REST server.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// REST listener (port, TLS).
    pub rest: RestConfig,

    /// Websocket push server settings.
    pub websocket: WebsocketConfig,

    /// Token-issuing server.
    pub oauth: OauthConfig,

    /// Block notice server.
    pub notice: NoticeConfig,

    /// Start/stop/restart timing.
    pub lifecycle: LifecycleConfig,

    /// Request limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// REST listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RestConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub bind_host: String,

    /// Listening port. Zero means unconfigured and is fatal at start.
    pub http_rest_port: u16,

    /// TLS certificate settings.
    pub tls: TlsConfig,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            http_rest_port: 0,
            tls: TlsConfig::default(),
        }
    }
}

impl RestConfig {
    /// TLS is used when forced by flag or when the port ends in 443.
    pub fn use_tls(&self) -> bool {
        self.tls.enabled || self.http_rest_port % 1000 == 443
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct TlsConfig {
    /// Force TLS regardless of port.
    pub enabled: bool,

    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Websocket push server configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WebsocketConfig {
    pub http_ws_port: u16,
}

impl Default for WebsocketConfig {
    fn default() -> Self {
        Self { http_ws_port: 20335 }
    }
}

/// Token validation against an oauth server.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OauthConfig {
    /// Initial oauth server address; empty disables token checks.
    pub server_addr: String,

    /// Validation request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OauthConfig {
    fn default() -> Self {
        Self {
            server_addr: String::new(),
            timeout_secs: 5,
        }
    }
}

/// Block notice server.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct NoticeConfig {
    pub server_addr: String,

    /// Push new blocks to the notice server.
    pub push_block: bool,
}

/// Lifecycle timing.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Pause before stopping and again before starting during a restart.
    pub restart_delay_ms: u64,

    /// Upper bound for draining in-flight requests on stop.
    pub shutdown_timeout_secs: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            restart_delay_ms: 1000,
            shutdown_timeout_secs: 30,
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tls_by_port_convention() {
        let mut rest = RestConfig::default();
        rest.http_rest_port = 20334;
        assert!(!rest.use_tls());

        rest.http_rest_port = 443;
        assert!(rest.use_tls());

        rest.http_rest_port = 8443;
        assert!(rest.use_tls());

        rest.http_rest_port = 4430;
        assert!(!rest.use_tls());
    }

    #[test]
    fn tls_by_flag() {
        let mut rest = RestConfig::default();
        rest.http_rest_port = 8080;
        rest.tls.enabled = true;
        assert!(rest.use_tls());
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.rest.http_rest_port, 0);
        assert_eq!(config.lifecycle.restart_delay_ms, 1000);
        assert_eq!(config.security.max_body_size, 2 * 1024 * 1024);
        assert!(config.oauth.server_addr.is_empty());
    }
}
