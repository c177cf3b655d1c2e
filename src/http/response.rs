//! Response envelope construction and serialization.
//!
//! # Responsibilities
//! - Carry handler output in the uniform `Action/Desc/Error/Result` shape
//! - Derive `Desc` from `Error` through the static code table
//! - Serialize to UTF-8 JSON with permissive CORS headers
//! - Build the empty preflight response for mutation routes
//!
//! # Design Decisions
//! - Domain failures are always HTTP 200 with a non-zero `Error`
//! - Encoding failures degrade to a fixed internal-error body, never a panic
//! - `Userid` is a side channel for the push subsystem and is never serialized

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

use crate::http::errcode;

/// Version stamped into every envelope.
pub const API_VERSION: &str = "1.0.0";

/// Content type for envelopes.
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=utf-8";

/// Written when an envelope cannot be encoded.
const FALLBACK_BODY: &str =
    r#"{"Action":"","Desc":"INTERNAL ERROR","Error":45002,"Result":"","Version":"1.0.0"}"#;

/// Uniform JSON response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope {
    /// Name of the matched action; empty when no action resolved.
    pub action: String,
    /// Human-readable form of `error`, filled in at write time.
    pub desc: String,
    /// Numeric error code, `0` on success.
    pub error: i64,
    /// Handler-defined payload.
    pub result: Value,
    pub version: String,
    /// Owner of a submitted transaction, consumed before serialization.
    #[serde(skip)]
    pub user_id: Option<String>,
}

impl Envelope {
    /// Create an envelope with the given code and an empty result.
    pub fn new(error: i64) -> Self {
        Self {
            action: String::new(),
            desc: String::new(),
            error,
            result: Value::String(String::new()),
            version: API_VERSION.to_string(),
            user_id: None,
        }
    }

    /// Shorthand for a successful envelope carrying `result`.
    pub fn success(result: impl Into<Value>) -> Self {
        Self::new(errcode::SUCCESS).with_result(result)
    }

    pub fn with_result(mut self, result: impl Into<Value>) -> Self {
        self.result = result.into();
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Whether `error` reports success.
    pub fn is_success(&self) -> bool {
        self.error == errcode::SUCCESS
    }

    /// Fill `Desc` from the code table.
    pub fn describe(mut self) -> Self {
        self.desc = errcode::describe(self.error).to_string();
        self
    }

    /// Encode the described envelope.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let envelope = self.describe();
        let body = match envelope.to_json() {
            Ok(bytes) => Body::from(bytes),
            Err(e) => {
                tracing::error!(
                    action = %envelope.action,
                    error = %e,
                    "Failed to encode response envelope"
                );
                Body::from(FALLBACK_BODY)
            }
        };
        with_cors_headers(Response::new(body), JSON_CONTENT_TYPE)
    }
}

/// Empty 200 response answering a CORS preflight.
pub fn preflight_response() -> Response {
    with_cors_headers(Response::new(Body::empty()), "application/json;charset=UTF-8")
}

fn with_cors_headers(mut response: Response, content_type: &'static str) -> Response {
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}
