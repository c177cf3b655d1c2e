//! Request dispatcher.
//!
//! # Responsibilities
//! - Answer CORS preflight on mutation paths
//! - Resolve method + path to a registered action
//! - Run the authorization gate before any handler
//! - Normalize query/body into a `ParamMap`
//! - Invoke the handler and write its envelope
//! - Record per-action request metrics
//!
//! # Design Decisions
//! - One catch-all route: the action registry does the real matching
//! - Every outcome is an HTTP 200 envelope; failures differ only by `Error`
//! - Short-circuits are typed (`DispatchError`) and converted in one place

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{request::Parts, Method},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::http::errcode::{ILLEGAL_DATAFORMAT, INVALID_METHOD};
use crate::http::request::{mutation_params, retrieval_params, BodyError, QueryParams};
use crate::http::response::{preflight_response, Envelope};
use crate::observability::metrics;
use crate::routing::{ActionRegistry, MethodClass};
use crate::security::{AuthorizationGate, Unauthorized};

/// Why a request never reached its handler.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{action}: {source}")]
    Unauthorized {
        action: &'static str,
        #[source]
        source: Unauthorized,
    },

    #[error("no action for {method} {path}")]
    RouteNotFound { method: Method, path: String },

    #[error("{action}: {source}")]
    MalformedBody {
        action: &'static str,
        #[source]
        source: BodyError,
    },
}

impl DispatchError {
    fn route_not_found(parts: &Parts) -> Self {
        DispatchError::RouteNotFound {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
        }
    }

    /// Envelope written in place of the handler's.
    pub fn into_envelope(self) -> Envelope {
        match self {
            DispatchError::Unauthorized { action, source } => Envelope::new(source.code)
                .with_result(source.detail)
                .with_action(action),
            DispatchError::RouteNotFound { .. } => Envelope::new(INVALID_METHOD),
            DispatchError::MalformedBody { action, .. } => {
                Envelope::new(ILLEGAL_DATAFORMAT).with_action(action)
            }
        }
    }
}

/// Routes every request through the action registry.
pub struct Dispatcher {
    registry: Arc<ActionRegistry>,
    gate: AuthorizationGate,
    max_body_size: usize,
}

impl Dispatcher {
    pub fn new(registry: ActionRegistry, gate: AuthorizationGate, max_body_size: usize) -> Self {
        Self {
            registry: Arc::new(registry),
            gate,
            max_body_size,
        }
    }

    /// Build the Axum router with all middleware layers.
    pub fn into_router(self) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(Arc::new(self))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Handle one request end to end.
    pub async fn handle(&self, request: Request) -> Response {
        let start = Instant::now();
        let (parts, body) = request.into_parts();

        if parts.method == Method::OPTIONS && self.registry.allows_preflight(parts.uri.path()) {
            tracing::debug!(path = %parts.uri.path(), "CORS preflight");
            return preflight_response();
        }

        let envelope = match self.pipeline(&parts, body).await {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!(error = %e, "Request short-circuited");
                e.into_envelope()
            }
        };

        metrics::record_request(&envelope.action, envelope.error, start);
        envelope.into_response()
    }

    async fn pipeline(&self, parts: &Parts, body: Body) -> Result<Envelope, DispatchError> {
        let class = MethodClass::from_method(&parts.method)
            .ok_or_else(|| DispatchError::route_not_found(parts))?;
        let (action, route) = self
            .registry
            .resolve(class, parts.uri.path())
            .ok_or_else(|| DispatchError::route_not_found(parts))?;

        let query = QueryParams::parse(parts.uri.query());
        let caller_key = self
            .gate
            .authorize(route.template(), &query)
            .await
            .map_err(|source| DispatchError::Unauthorized {
                action: action.name(),
                source,
            })?;

        let params = match class {
            MethodClass::Retrieval => retrieval_params(&route, &query, &caller_key),
            MethodClass::Mutation => {
                mutation_params(body, self.max_body_size, &query, &caller_key)
                    .await
                    .map_err(|source| DispatchError::MalformedBody {
                        action: action.name(),
                        source,
                    })?
            }
        };

        let envelope = action.call(params).await.with_action(action.name());
        Ok(envelope)
    }
}

async fn dispatch(State(dispatcher): State<Arc<Dispatcher>>, request: Request) -> Response {
    dispatcher.handle(request).await
}
