//! Startup orchestration.
//!
//! # Responsibilities
//! - Seed runtime settings from configuration
//! - Build the token validator, action registry and dispatcher
//! - Hand the router to a `RestServer` together with its restart channel
//!
//! # Design Decisions
//! - Fail fast: any assembly error is fatal
//! - Nothing binds here; listeners start in `RestServer::run`

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::api::{self, ApiContext, API_OAUTH_SERVER_ADDR};
use crate::blockchain::{NodeService, PushNotifier};
use crate::config::{RuntimeSettings, ServerConfig};
use crate::http::Dispatcher;
use crate::lifecycle::controller::{restart_channel, RestServer, RestartRequests};
use crate::routing::RegistryError;
use crate::security::{AuthorizationGate, OauthValidator, TokenValidator};

/// Error type for server assembly.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build route table: {0}")]
    Registry(#[from] RegistryError),

    #[error("failed to build oauth client: {0}")]
    OauthClient(#[from] reqwest::Error),
}

/// External subsystems the REST layer talks to.
pub struct Collaborators {
    pub node: Arc<dyn NodeService>,
    pub push: Arc<dyn PushNotifier>,
    /// `None` selects the oauth-server validator.
    pub validator: Option<Arc<dyn TokenValidator>>,
}

/// A ready-to-run server.
pub struct Assembled {
    pub server: Arc<RestServer>,
    pub restarts: RestartRequests,
    pub settings: Arc<RuntimeSettings>,
}

/// Wire every subsystem for `config`.
pub fn assemble(
    config: ServerConfig,
    collaborators: Collaborators,
) -> Result<Assembled, StartupError> {
    let settings = Arc::new(RuntimeSettings::from_config(&config));

    let validator = match collaborators.validator {
        Some(validator) => validator,
        None => Arc::new(OauthValidator::new(
            Arc::clone(&settings),
            Duration::from_secs(config.oauth.timeout_secs),
        )?),
    };

    let (restart, restarts) = restart_channel();
    let registry = api::build_registry(ApiContext {
        node: collaborators.node,
        push: collaborators.push,
        settings: Arc::clone(&settings),
        restart,
    })?;

    let gate = AuthorizationGate::new(validator, API_OAUTH_SERVER_ADDR);
    let dispatcher = Dispatcher::new(registry, gate, config.security.max_body_size);

    tracing::info!(
        port = config.rest.http_rest_port,
        tls = config.rest.use_tls(),
        oauth = !settings.oauth_server_addr().is_empty(),
        "REST server assembled"
    );

    let server = Arc::new(RestServer::new(config, dispatcher.into_router()));
    Ok(Assembled {
        server,
        restarts,
        settings,
    })
}
