//! REST server lifecycle: start, stop, and in-process restart.
//!
//! # State Machine
//! ```text
//! Stopped ──bootstrap──▶ Starting ──serve──▶ Serving
//!    ▲                       │                  │
//!    └──── bind/TLS error ───┘                stop
//!    ▲                                          ▼
//!    └────────────── drained ────────────── Stopping
//! ```
//!
//! # Design Decisions
//! - Restart requests travel over a bounded channel to a single supervisor,
//!   so the handler that asked for a restart never runs the sequence itself
//! - Pending requests coalesce: one restart can be queued while another runs
//! - The supervisor waits for `Stopped` before rebinding the port
//! - Draining is bounded by `lifecycle.shutdown_timeout_secs`

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::Router;
use axum_server::Handle;
use thiserror::Error;
use tokio::sync::{mpsc, watch};

use crate::config::ServerConfig;
use crate::net::{self, BootstrapError, BoundListener};
use crate::observability::metrics;

/// Observable state of the REST listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Stopped,
    Starting,
    Serving,
    Stopping,
}

/// Error type for lifecycle transitions.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    /// Start was requested while the server was not stopped.
    #[error("server is not stopped (currently {0:?})")]
    AlreadyRunning(ServerState),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Sender half given to the restart action.
#[derive(Debug, Clone)]
pub struct RestartHandle {
    tx: mpsc::Sender<()>,
}

impl RestartHandle {
    /// Ask the supervisor for a restart. Returns immediately.
    ///
    /// Returns `false` only when no supervisor is listening anymore.
    pub fn request(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(())) => {
                tracing::debug!("Restart already pending, request coalesced");
                true
            }
            Err(mpsc::error::TrySendError::Closed(())) => {
                tracing::warn!("Restart requested but no supervisor is running");
                false
            }
        }
    }
}

/// Receiver half consumed by [`RestServer::run`].
#[derive(Debug)]
pub struct RestartRequests {
    rx: mpsc::Receiver<()>,
}

/// Create a connected restart handle/receiver pair.
pub fn restart_channel() -> (RestartHandle, RestartRequests) {
    let (tx, rx) = mpsc::channel(1);
    (RestartHandle { tx }, RestartRequests { rx })
}

/// Owns the listener lifecycle for one router.
pub struct RestServer {
    config: ServerConfig,
    app: Router,
    state: watch::Sender<ServerState>,
    handle: Mutex<Option<Handle>>,
}

impl RestServer {
    pub fn new(config: ServerConfig, app: Router) -> Self {
        let (state, _) = watch::channel(ServerState::Stopped);
        Self {
            config,
            app,
            state,
            handle: Mutex::new(None),
        }
    }

    pub fn state(&self) -> ServerState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ServerState> {
        self.state.subscribe()
    }

    /// Wait until the server reaches `target`.
    pub async fn wait_for(&self, target: ServerState) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|state| *state == target).await;
    }

    /// Bind the listener, moving `Stopped → Starting`.
    ///
    /// On failure the state falls back to `Stopped`.
    pub async fn bootstrap(&self) -> Result<BoundListener, LifecycleError> {
        let mut current = ServerState::Stopped;
        let claimed = self.state.send_if_modified(|state| {
            current = *state;
            if *state == ServerState::Stopped {
                *state = ServerState::Starting;
                true
            } else {
                false
            }
        });
        if !claimed {
            return Err(LifecycleError::AlreadyRunning(current));
        }

        match net::bootstrap(&self.config.rest).await {
            Ok(bound) => Ok(bound),
            Err(e) => {
                tracing::error!(error = %e, "REST listener bootstrap failed");
                self.state.send_replace(ServerState::Stopped);
                Err(e.into())
            }
        }
    }

    /// Serve on a bound listener until stopped. Ends in `Stopped`.
    pub async fn serve(&self, bound: BoundListener) -> Result<(), LifecycleError> {
        let handle = Handle::new();
        *self.lock_handle() = Some(handle.clone());
        self.state.send_replace(ServerState::Serving);

        tracing::info!(address = %bound.local_addr(), tls = bound.is_tls(), "REST server serving");
        let result = bound.serve(self.app.clone(), handle).await;

        self.lock_handle().take();
        self.state.send_replace(ServerState::Stopped);

        match result {
            Ok(()) => {
                tracing::info!("REST server stopped");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "REST server terminated");
                Err(LifecycleError::Serve(e))
            }
        }
    }

    /// Bootstrap and serve; resolves when the server stops.
    pub async fn start(&self) -> Result<(), LifecycleError> {
        let bound = self.bootstrap().await?;
        self.serve(bound).await
    }

    /// Gracefully stop serving and wait until `Stopped`.
    ///
    /// A server that is still `Starting` is stopped once it serves;
    /// otherwise a no-op unless the server is `Serving`.
    pub async fn stop(&self) {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|state| *state != ServerState::Starting).await;

        let handle = self.lock_handle().clone();
        let Some(handle) = handle else {
            tracing::debug!(state = ?self.state(), "Stop requested while not serving");
            return;
        };

        let claimed = self.state.send_if_modified(|state| {
            if *state == ServerState::Serving {
                *state = ServerState::Stopping;
                true
            } else {
                false
            }
        });
        if !claimed {
            return;
        }

        let timeout = Duration::from_secs(self.config.lifecycle.shutdown_timeout_secs);
        tracing::info!(timeout_secs = timeout.as_secs(), "Stopping REST server");
        handle.graceful_shutdown(Some(timeout));
        self.wait_for(ServerState::Stopped).await;
    }

    /// Supervise the server: start it, honour restart requests, and stop
    /// when `shutdown` resolves.
    pub async fn run(
        self: Arc<Self>,
        mut restarts: RestartRequests,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), LifecycleError> {
        let bound = self.bootstrap().await?;
        self.spawn_serve(bound);

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                request = restarts.rx.recv() => match request {
                    Some(()) => self.restart_sequence().await,
                    None => {
                        // No handle can request restarts anymore.
                        (&mut shutdown).await;
                        break;
                    }
                },
            }
        }

        tracing::info!("Shutdown requested");
        self.stop().await;
        Ok(())
    }

    /// Delay, stop, delay, start. Failures are logged, never returned.
    async fn restart_sequence(self: &Arc<Self>) {
        let delay = Duration::from_millis(self.config.lifecycle.restart_delay_ms);
        metrics::record_restart();
        tracing::info!(delay_ms = delay.as_millis() as u64, "REST server restart scheduled");

        tokio::time::sleep(delay).await;
        self.stop().await;
        tokio::time::sleep(delay).await;

        match self.bootstrap().await {
            Ok(bound) => self.spawn_serve(bound),
            Err(e) => tracing::error!(error = %e, "REST server restart failed"),
        }
    }

    fn spawn_serve(self: &Arc<Self>, bound: BoundListener) {
        let server = Arc::clone(self);
        tokio::spawn(async move {
            // Errors are already logged by `serve`.
            let _ = server.serve(bound).await;
        });
    }

    fn lock_handle(&self) -> std::sync::MutexGuard<'_, Option<Handle>> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
