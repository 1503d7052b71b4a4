//! TLS probing and certificate normalization.
//!
//! This module connects to one address at a time and captures the certificate
//! chain exactly as the server presents it:
//! - Trust verification is disabled (see [`verifier`]); the probe observes, it
//!   does not judge
//! - The target hostname is sent as SNI so multi-tenant servers pick the right chain
//! - A connect timeout and an overall handshake deadline bound every attempt
//! - Negotiated protocol version and cipher suite are kept for diagnostics
//!
//! Uses `tokio-rustls` for async TLS connections and `x509-parser` for certificate parsing.

mod extract;
mod verifier;

use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::{CertificateDer, ServerName};
use tokio::net::TcpStream;
use tokio_rustls::rustls::ClientConfig;
use tokio_rustls::TlsConnector;

use crate::error_handling::{InitializationError, ProbeError};
use crate::models::Certificate;

pub use extract::{normalize, normalize_at};
pub use verifier::AcceptAnyServerCert;

/// The ordered certificate chain presented by one server.
///
/// Order is the server's; it is never sorted or reassembled. Every entry is
/// known to parse as X.509.
#[derive(Debug, Clone)]
pub struct PeerChain {
    certificates: Vec<CertificateDer<'static>>,
    /// Negotiated protocol version, e.g. `TLSv1_3`
    pub protocol_version: Option<String>,
    /// Negotiated cipher suite
    pub cipher_suite: Option<String>,
}

impl PeerChain {
    /// Builds a chain from DER certificates presented by `addr`.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::NoPeerCertificates` for an empty chain and
    /// `ProbeError::MalformedCertificate` for the first entry that does not parse.
    pub fn from_der(
        addr: SocketAddr,
        certificates: Vec<CertificateDer<'static>>,
    ) -> Result<Self, ProbeError> {
        if certificates.is_empty() {
            return Err(ProbeError::NoPeerCertificates(addr));
        }

        for (index, der) in certificates.iter().enumerate() {
            if let Err(e) = x509_parser::parse_x509_certificate(der.as_ref()) {
                return Err(ProbeError::MalformedCertificate {
                    addr,
                    index,
                    reason: e.to_string(),
                });
            }
        }

        Ok(Self {
            certificates,
            protocol_version: None,
            cipher_suite: None,
        })
    }

    /// Attaches the negotiated session parameters.
    pub fn with_session(
        mut self,
        protocol_version: Option<String>,
        cipher_suite: Option<String>,
    ) -> Self {
        self.protocol_version = protocol_version;
        self.cipher_suite = cipher_suite;
        self
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    /// Raw DER certificates in presentation order.
    pub fn der(&self) -> &[CertificateDer<'static>] {
        &self.certificates
    }

    /// Normalizes every certificate in presentation order.
    pub fn normalize(&self) -> Vec<Certificate> {
        self.certificates
            .iter()
            .filter_map(|der| x509_parser::parse_x509_certificate(der.as_ref()).ok())
            .map(|(_, cert)| normalize(&cert))
            .collect()
    }
}

/// Something that can fetch the certificate chain served at an address.
///
/// The run fans out over this trait, so anything from a real TLS handshake to
/// a scripted test double can drive it.
pub trait CertificateProbe: Send + Sync + 'static {
    /// Performs exactly one handshake attempt against `address`.
    fn probe(
        &self,
        address: IpAddr,
    ) -> impl Future<Output = Result<PeerChain, ProbeError>> + Send;
}

/// Builds the rustls client configuration used by every probe.
///
/// Uses the `ring` provider, every protocol version rustls supports, and
/// [`AcceptAnyServerCert`] in place of WebPKI verification.
///
/// # Errors
///
/// Returns `InitializationError::TlsConfigError` if the provider rejects the
/// protocol versions.
pub fn build_client_config() -> Result<Arc<ClientConfig>, InitializationError> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());

    let config = ClientConfig::builder_with_provider(Arc::clone(&provider))
        .with_protocol_versions(rustls::ALL_VERSIONS)?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert::new(provider)))
        .with_no_client_auth();

    Ok(Arc::new(config))
}

/// TLS probe for one hostname and port.
pub struct TlsProbe {
    config: Arc<ClientConfig>,
    server_name: ServerName<'static>,
    port: u16,
    connect_timeout: Duration,
    handshake_timeout: Duration,
}

impl TlsProbe {
    /// Creates a probe that sends `host` as SNI and dials `port`.
    ///
    /// `handshake_timeout` is the overall deadline measured from the start of
    /// the TCP connect.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::InvalidServerName` if `host` is neither a
    /// DNS name nor an IP address, or a TLS configuration error.
    pub fn new(
        host: &str,
        port: u16,
        connect_timeout: Duration,
        handshake_timeout: Duration,
    ) -> Result<Self, InitializationError> {
        let server_name = ServerName::try_from(host.to_string())
            .map_err(|_| InitializationError::InvalidServerName(host.to_string()))?;

        Ok(Self {
            config: build_client_config()?,
            server_name,
            port,
            connect_timeout,
            handshake_timeout,
        })
    }

    async fn probe_address(&self, address: IpAddr) -> Result<PeerChain, ProbeError> {
        let addr = SocketAddr::new(address, self.port);
        let deadline = tokio::time::Instant::now() + self.handshake_timeout;
        let connect_timeout = self.connect_timeout.min(self.handshake_timeout);

        log::debug!("Connecting to {addr}");
        let sock = match tokio::time::timeout(connect_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(sock)) => sock,
            Ok(Err(source)) => return Err(ProbeError::Connect { addr, source }),
            Err(_) => {
                return Err(ProbeError::ConnectTimeout {
                    addr,
                    timeout_ms: connect_timeout.as_millis(),
                })
            }
        };

        let connector = TlsConnector::from(Arc::clone(&self.config));
        let tls_stream = match tokio::time::timeout_at(
            deadline,
            connector.connect(self.server_name.clone(), sock),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => return Err(ProbeError::Handshake { addr, source }),
            Err(_) => {
                return Err(ProbeError::HandshakeTimeout {
                    addr,
                    timeout_ms: self.handshake_timeout.as_millis(),
                })
            }
        };

        let (_, session) = tls_stream.get_ref();
        let protocol_version = session.protocol_version().map(|v| format!("{v:?}"));
        let cipher_suite = session
            .negotiated_cipher_suite()
            .map(|cs| format!("{:?}", cs.suite()));
        let certificates = session
            .peer_certificates()
            .map(|certs| certs.to_vec())
            .unwrap_or_default();

        let chain = PeerChain::from_der(addr, certificates)?;
        log::debug!(
            "{addr} presented {} certificate(s) over {}",
            chain.len(),
            protocol_version.as_deref().unwrap_or("unknown protocol")
        );
        // The stream is dropped here, closing the connection
        Ok(chain.with_session(protocol_version, cipher_suite))
    }
}

impl CertificateProbe for TlsProbe {
    fn probe(
        &self,
        address: IpAddr,
    ) -> impl Future<Output = Result<PeerChain, ProbeError>> + Send {
        self.probe_address(address)
    }
}
