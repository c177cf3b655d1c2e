//! Access-token gate.
//!
//! Every dispatched request passes through `AuthorizationGate::authorize`
//! before parameters are normalized. The gate asks a `TokenValidator` about
//! the request's `auth_type`/`access_token` pair and either hands back the
//! caller key or short-circuits with the validator's code and detail.
//!
//! The oauth address configuration route is exempt so a node can be pointed
//! at its token server before any token can be validated. The exemption
//! matches the template exactly.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::RuntimeSettings;
use crate::http::errcode::{INVALID_TOKEN, OAUTH_TIMEOUT, SUCCESS};
use crate::http::QueryParams;

/// Outcome of one token validation.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenCheck {
    /// Identity of the caller, passed to handlers as `CAkey`.
    pub caller_key: String,
    /// `0` on success; any positive code denies the request.
    pub code: i64,
    /// Validator-specific detail, returned as `Result` on denial.
    pub detail: Value,
}

impl TokenCheck {
    pub fn granted(caller_key: impl Into<String>) -> Self {
        Self {
            caller_key: caller_key.into(),
            code: SUCCESS,
            detail: Value::Null,
        }
    }

    pub fn denied(code: i64, detail: Value) -> Self {
        Self {
            caller_key: String::new(),
            code,
            detail,
        }
    }

    pub fn is_denied(&self) -> bool {
        self.code > 0
    }
}

/// External access-token validator.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn check_access_token(&self, auth_type: &str, access_token: &str) -> TokenCheck;
}

/// Request rejected by the gate.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("access token rejected with code {code}")]
pub struct Unauthorized {
    pub code: i64,
    pub detail: Value,
}

/// Pre-dispatch token check with a single exempt route.
#[derive(Clone)]
pub struct AuthorizationGate {
    validator: Arc<dyn TokenValidator>,
    exempt_template: &'static str,
}

impl AuthorizationGate {
    pub fn new(validator: Arc<dyn TokenValidator>, exempt_template: &'static str) -> Self {
        Self {
            validator,
            exempt_template,
        }
    }

    /// Validate the request's token for `template`.
    ///
    /// Returns the caller key, which is empty when the validator supplied
    /// none (including on the exempt route after a failed check).
    pub async fn authorize(
        &self,
        template: &str,
        query: &QueryParams,
    ) -> Result<String, Unauthorized> {
        let check = self
            .validator
            .check_access_token(query.value("auth_type"), query.value("access_token"))
            .await;

        if check.is_denied() {
            if template == self.exempt_template {
                tracing::debug!(code = check.code, template, "Token check failed on exempt route");
            } else {
                tracing::debug!(code = check.code, template, "Access token rejected");
                return Err(Unauthorized {
                    code: check.code,
                    detail: check.detail,
                });
            }
        }
        Ok(check.caller_key)
    }
}

/// Validator that consults the configured oauth server.
///
/// With no oauth server configured every request is granted with an empty
/// caller key.
pub struct OauthValidator {
    client: reqwest::Client,
    settings: Arc<RuntimeSettings>,
}

impl OauthValidator {
    pub fn new(settings: Arc<RuntimeSettings>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl TokenValidator for OauthValidator {
    async fn check_access_token(&self, auth_type: &str, access_token: &str) -> TokenCheck {
        let addr = self.settings.oauth_server_addr();
        if addr.is_empty() {
            return TokenCheck::granted("");
        }

        let response = self
            .client
            .get(&addr)
            .query(&[("token", access_token), ("auth_type", auth_type)])
            .send()
            .await;

        let reply: Value = match response {
            Ok(response) => match response.json().await {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::warn!(oauth_server = %addr, error = %e, "Unreadable oauth reply");
                    return TokenCheck::denied(OAUTH_TIMEOUT, Value::Null);
                }
            },
            Err(e) => {
                tracing::warn!(oauth_server = %addr, error = %e, "Oauth server unreachable");
                return TokenCheck::denied(OAUTH_TIMEOUT, Value::Null);
            }
        };

        if reply["Error"].as_f64() == Some(0.0) {
            if let Some(ca_key) = reply["Result"]["CaKey"].as_str() {
                return TokenCheck {
                    caller_key: ca_key.to_string(),
                    code: SUCCESS,
                    detail: reply,
                };
            }
        }
        TokenCheck::denied(INVALID_TOKEN, reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NodeSettings;
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    struct Fixed(TokenCheck);

    #[async_trait]
    impl TokenValidator for Fixed {
        async fn check_access_token(&self, _: &str, _: &str) -> TokenCheck {
            self.0.clone()
        }
    }

    const EXEMPT: &str = "/api/v1/config/oauthserver/addr";

    fn gate(check: TokenCheck) -> AuthorizationGate {
        AuthorizationGate::new(Arc::new(Fixed(check)), EXEMPT)
    }

    #[tokio::test]
    async fn granted_returns_caller_key() {
        let key = gate(TokenCheck::granted("ca-1"))
            .authorize("/api/v1/block/height", &QueryParams::default())
            .await
            .unwrap();
        assert_eq!(key, "ca-1");
    }

    #[tokio::test]
    async fn denied_short_circuits() {
        let err = gate(TokenCheck::denied(INVALID_TOKEN, json!("bad token")))
            .authorize("/api/v1/block/height", &QueryParams::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, INVALID_TOKEN);
        assert_eq!(err.detail, json!("bad token"));
    }

    #[tokio::test]
    async fn exempt_route_passes_on_denial() {
        let key = gate(TokenCheck::denied(INVALID_TOKEN, Value::Null))
            .authorize(EXEMPT, &QueryParams::default())
            .await
            .unwrap();
        assert_eq!(key, "");
    }

    #[tokio::test]
    async fn exemption_is_exact() {
        let err = gate(TokenCheck::denied(INVALID_TOKEN, Value::Null))
            .authorize("/api/v1/config/oauthserver/addr/x", &QueryParams::default())
            .await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn non_positive_codes_pass() {
        let key = gate(TokenCheck::denied(-1, Value::Null))
            .authorize("/api/v1/block/height", &QueryParams::default())
            .await;
        assert!(key.is_ok());
    }

    async fn oauth_server() -> String {
        let app = Router::new().route(
            "/oauth",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                if q.get("token").map(String::as_str) == Some("good")
                    && q.get("auth_type").map(String::as_str) == Some("app")
                {
                    Json(json!({"Error": 0, "Result": {"CaKey": "ca-7"}}))
                } else {
                    Json(json!({"Error": 42003, "Result": "expired"}))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/oauth")
    }

    fn validator(addr: String) -> OauthValidator {
        let settings = Arc::new(RuntimeSettings::new(NodeSettings {
            oauth_server_addr: addr,
            ..NodeSettings::default()
        }));
        OauthValidator::new(settings, Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn oauth_disabled_grants_everything() {
        let check = validator(String::new()).check_access_token("", "").await;
        assert_eq!(check, TokenCheck::granted(""));
    }

    #[tokio::test]
    async fn oauth_accepts_valid_token() {
        let check = validator(oauth_server().await)
            .check_access_token("app", "good")
            .await;
        assert_eq!(check.code, SUCCESS);
        assert_eq!(check.caller_key, "ca-7");
    }

    #[tokio::test]
    async fn oauth_rejects_invalid_token() {
        let check = validator(oauth_server().await)
            .check_access_token("app", "stale")
            .await;
        assert_eq!(check.code, INVALID_TOKEN);
        assert_eq!(check.detail["Result"], json!("expired"));
    }

    #[tokio::test]
    async fn oauth_unreachable_is_timeout_code() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let check = validator(format!("http://{addr}/oauth"))
            .check_access_token("app", "good")
            .await;
        assert_eq!(check.code, OAUTH_TIMEOUT);
    }
}
