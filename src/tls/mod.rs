//! TLS client configuration.
//!
//! Builds `tokio-rustls` connectors for `https:` attempts. Certificates are
//! verified against the `webpki-roots` trust anchors unless the caller turns
//! verification off with `reject_unauthorized(false)`; there is no pinning.

use std::sync::Arc;

use log::debug;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{ring, verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, SignatureScheme};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use crate::config::ALPN_HTTP1;
use crate::error_handling::{classify_io_error, RequestError};

/// Returns the process-wide crypto provider, falling back to `ring`.
fn crypto_provider() -> Arc<CryptoProvider> {
    CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(ring::default_provider()))
}

/// Builds the client configuration for one attempt.
///
/// # Arguments
///
/// * `reject_unauthorized` - Verify the server certificate chain (`true`) or accept any certificate
///
/// # Errors
///
/// Returns [`RequestError::Tls`] if the provider cannot satisfy the default protocol versions.
pub fn client_config(reject_unauthorized: bool) -> Result<ClientConfig, RequestError> {
    let provider = crypto_provider();
    let builder =
        ClientConfig::builder_with_provider(provider.clone()).with_safe_default_protocol_versions()?;

    let mut config = if reject_unauthorized {
        let mut root_store = RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        builder
            .with_root_certificates(root_store)
            .with_no_client_auth()
    } else {
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyCertificate(provider)))
            .with_no_client_auth()
    };
    config.alpn_protocols = vec![ALPN_HTTP1.to_vec()];
    Ok(config)
}

/// Performs the TLS handshake over an established TCP stream.
///
/// # Arguments
///
/// * `stream` - Connected TCP stream
/// * `hostname` - Host name (or IP literal, brackets allowed) used for SNI and verification
/// * `reject_unauthorized` - Whether the certificate chain must verify
pub async fn connect(
    stream: TcpStream,
    hostname: &str,
    reject_unauthorized: bool,
) -> Result<TlsStream<TcpStream>, RequestError> {
    let host = hostname.trim_start_matches('[').trim_end_matches(']');
    let server_name = ServerName::try_from(host.to_string())?;
    let connector = TlsConnector::from(Arc::new(client_config(reject_unauthorized)?));

    debug!("TLS handshake with {host} (verify: {reject_unauthorized})");
    connector
        .connect(server_name, stream)
        .await
        .map_err(classify_io_error)
}

/// Verifier used when certificate checks are disabled.
///
/// Handshake signatures are still verified.
#[derive(Debug)]
struct AcceptAnyCertificate(Arc<CryptoProvider>);

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.signature_verification_algorithms.supported_schemes()
    }
}
