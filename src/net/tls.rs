//! Certificate and key loading for the TLS listener.

use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

use crate::net::listener::BootstrapError;

/// Read the PEM certificate chain and private key for `bootstrap`.
///
/// Each file is checked on its own so the error names the one that is
/// missing; rustls only reports a generic read failure.
pub async fn load_rustls(cert: &Path, key: &Path) -> Result<RustlsConfig, BootstrapError> {
    if !cert.is_file() {
        return Err(BootstrapError::CertificateMissing(cert.to_path_buf()));
    }
    if !key.is_file() {
        return Err(BootstrapError::KeyMissing(key.to_path_buf()));
    }
    RustlsConfig::from_pem_file(cert, key)
        .await
        .map_err(BootstrapError::Tls)
}
