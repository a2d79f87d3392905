//! reqwest client construction: TLS backend selection and verification policy.

use std::error::Error;
use std::time::Duration;

use reqwest::{Client, ClientBuilder};

use crate::error::ClientError;
#[cfg(feature = "fips")]
use tracing::debug;

/// Environment name for which TLS verification is enabled by default.
pub const PRODUCTION_ENVIRONMENT: &str = "production";
/// Environment assumed when the caller does not name one.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Options forwarded to the HTTP transport without interpretation by the client.
#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    /// Overrides the environment-derived TLS verification policy.
    pub verify_tls: Option<bool>,
    /// Total request timeout.
    pub timeout: Option<Duration>,
    /// Connection establishment timeout.
    pub connect_timeout: Option<Duration>,
    /// Custom `User-Agent` header value.
    pub user_agent: Option<String>,
}

/// Default verification policy: only production environments verify certificates.
pub fn verify_tls_for(environment: &str) -> bool {
    environment == PRODUCTION_ENVIRONMENT
}

/// Builds the reqwest client used for all server calls.
///
/// Failures to set up the TLS backend are reported as [`ClientError::Tls`];
/// any other builder failure surfaces as [`ClientError::Transport`].
pub fn build_client(environment: &str, options: &TransportOptions) -> Result<Client, ClientError> {
    let verify = options
        .verify_tls
        .unwrap_or_else(|| verify_tls_for(environment));
    let mut builder = create_reqwest_client_builder()
        .map_err(|e| ClientError::Tls(e.to_string()))?
        .danger_accept_invalid_certs(!verify)
        .danger_accept_invalid_hostnames(!verify);
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(timeout) = options.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(user_agent) = &options.user_agent {
        builder = builder.user_agent(user_agent.as_str());
    }
    Ok(builder.build()?)
}

/// Creates a reqwest client builder with TLS configuration.
/// When the "fips" feature is enabled, it uses a FIPS-compliant TLS configuration.
/// Otherwise, it uses reqwest's default rustls TLS implementation.
#[cfg(not(feature = "fips"))]
pub fn create_reqwest_client_builder() -> Result<ClientBuilder, Box<dyn Error>> {
    Ok(reqwest::Client::builder().use_rustls_tls())
}

/// Creates a reqwest client builder with FIPS-compliant TLS configuration.
/// This version loads native root certificates and verifies FIPS compliance.
#[cfg(feature = "fips")]
pub fn create_reqwest_client_builder() -> Result<ClientBuilder, Box<dyn Error>> {
    // The process must install a FIPS provider (e.g. rustls::crypto::default_fips_provider())
    // before the first client is built.
    let provider =
        rustls::crypto::CryptoProvider::get_default().ok_or("No crypto provider configured")?;

    if !provider.fips() {
        return Err("Crypto provider is not FIPS-compliant".into());
    }

    let mut root_cert_store = rustls::RootCertStore::empty();
    let native_certs = rustls_native_certs::load_native_certs();
    let mut valid_count = 0;
    for cert in native_certs.certs {
        match root_cert_store.add(cert) {
            Ok(()) => valid_count += 1,
            Err(err) => {
                debug!("Failed to parse certificate: {:?}", err);
            }
        }
    }
    if valid_count == 0 {
        return Err("No valid certificates found in native root store".into());
    }

    let config = rustls::ClientConfig::builder_with_provider(provider.clone())
        .with_protocol_versions(rustls::ALL_VERSIONS)
        .map_err(|_| "Failed to set protocol versions")?
        .with_root_certificates(root_cert_store)
        .with_no_client_auth();

    if !config.fips() {
        return Err("The final TLS configuration is not FIPS-compliant".into());
    }
    debug!("ConfigHub client builder is configured with FIPS.");

    Ok(reqwest::Client::builder().use_preconfigured_tls(config))
}
