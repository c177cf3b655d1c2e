//! Listener bootstrap: plain TCP or TLS.
//!
//! # Responsibilities
//! - Refuse to start without a configured port
//! - Decide plain vs TLS (explicit flag, or port ending in 443)
//! - Load the certificate/key pair for TLS
//! - Bind the socket and hand it to axum-server with a shutdown handle
//!
//! # Design Decisions
//! - Every failure is returned to the caller; nothing is retried here
//! - The socket is bound before serving so bind errors surface at start

use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::RestConfig;
use crate::net::tls::load_rustls;

/// Error type for listener bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Port is zero or absent.
    #[error("HTTP REST port is not configured")]
    PortNotConfigured,

    /// Failed to bind to address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("TLS certificate not found: {}", .0.display())]
    CertificateMissing(PathBuf),

    #[error("TLS private key not found: {}", .0.display())]
    KeyMissing(PathBuf),

    /// Certificate or key exists but does not parse.
    #[error("failed to load TLS certificate: {0}")]
    Tls(#[source] io::Error),
}

/// A bound socket, ready to serve.
pub struct BoundListener {
    listener: std::net::TcpListener,
    tls: Option<RustlsConfig>,
    local_addr: SocketAddr,
}

impl std::fmt::Debug for BoundListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundListener")
            .field("local_addr", &self.local_addr)
            .field("tls", &self.tls.is_some())
            .finish()
    }
}

impl BoundListener {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_tls(&self) -> bool {
        self.tls.is_some()
    }

    /// Serve `app` until `handle` requests shutdown.
    pub async fn serve(self, app: Router, handle: Handle) -> io::Result<()> {
        let service = app.into_make_service();
        match self.tls {
            Some(tls) => {
                axum_server::from_tcp_rustls(self.listener, tls)
                    .handle(handle)
                    .serve(service)
                    .await
            }
            None => {
                axum_server::from_tcp(self.listener)
                    .handle(handle)
                    .serve(service)
                    .await
            }
        }
    }
}

/// Bind the REST listener described by `config`.
pub async fn bootstrap(config: &RestConfig) -> Result<BoundListener, BootstrapError> {
    if config.http_rest_port == 0 {
        tracing::error!("HTTP REST port not configured");
        return Err(BootstrapError::PortNotConfigured);
    }

    let tls = if config.use_tls() {
        let cert = Path::new(&config.tls.cert_path);
        let tls = load_rustls(cert, Path::new(&config.tls.key_path))
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, cert_path = %cert.display(), "Failed to load TLS keys");
            })?;
        Some(tls)
    } else {
        None
    };

    let addr = format!("{}:{}", config.bind_host, config.http_rest_port);
    let bind_error = |source: io::Error| BootstrapError::Bind {
        addr: addr.clone(),
        source,
    };

    let listener = TcpListener::bind(&addr).await.map_err(bind_error)?;
    let local_addr = listener.local_addr().map_err(bind_error)?;
    let listener = listener.into_std().map_err(bind_error)?;

    tracing::info!(
        address = %local_addr,
        tls = tls.is_some(),
        "REST listener bound"
    );

    Ok(BoundListener {
        listener,
        tls,
        local_addr,
    })
}
