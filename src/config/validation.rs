//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (port set, timeouts > 0, body limit > 0)
//! - Check that TLS has certificate paths when it will be used
//! - Check that addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("rest.http_rest_port is not configured")]
    MissingPort,

    #[error("TLS is required for port {port} but {field} is empty")]
    MissingTlsPath { port: u16, field: &'static str },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("invalid {field}: {value}")]
    InvalidAddress { field: &'static str, value: String },
}

/// Whether `addr` can be handed to an outbound HTTP client.
///
/// Empty means unset and is always accepted.
pub fn is_http_server_addr(addr: &str) -> bool {
    if addr.is_empty() {
        return true;
    }
    match url::Url::parse(addr) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Check `config`, collecting every problem.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let rest = &config.rest;

    if rest.http_rest_port == 0 {
        errors.push(ValidationError::MissingPort);
    } else if rest.use_tls() {
        if rest.tls.cert_path.is_empty() {
            errors.push(ValidationError::MissingTlsPath {
                port: rest.http_rest_port,
                field: "rest.tls.cert_path",
            });
        }
        if rest.tls.key_path.is_empty() {
            errors.push(ValidationError::MissingTlsPath {
                port: rest.http_rest_port,
                field: "rest.tls.key_path",
            });
        }
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero {
            field: "security.max_body_size",
        });
    }
    if config.lifecycle.shutdown_timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "lifecycle.shutdown_timeout_secs",
        });
    }
    if config.oauth.timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "oauth.timeout_secs",
        });
    }

    for (field, addr) in [
        ("oauth.server_addr", &config.oauth.server_addr),
        ("notice.server_addr", &config.notice.server_addr),
    ] {
        if !is_http_server_addr(addr) {
            errors.push(ValidationError::InvalidAddress {
                field,
                value: addr.clone(),
            });
        }
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
