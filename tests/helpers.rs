// Shared test helpers for certificate generation and loopback TLS servers.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use rcgen::{
    BasicConstraints, CertificateParams, CustomExtension, DistinguishedName, DnType, IsCa,
    KeyPair,
};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

use cert_audit::{CertificateProbe, PeerChain, ProbeError};

/// AIA extension OID (1.3.6.1.5.5.7.1.1).
const OID_AUTHORITY_INFO_ACCESS: &[u64] = &[1, 3, 6, 1, 5, 5, 7, 1, 1];

/// DER-encoded access method OIDs.
const CA_ISSUERS_METHOD: &[u8] = &[0x06, 0x08, 0x2b, 0x06, 0x01, 0x05, 0x05, 0x07, 0x30, 0x02];
const OCSP_METHOD: &[u8] = &[0x06, 0x08, 0x2b, 0x06, 0x01, 0x05, 0x05, 0x07, 0x30, 0x01];

/// A CA certificate and one leaf it signed.
pub struct TestChain {
    pub leaf: CertificateDer<'static>,
    pub ca: CertificateDer<'static>,
    pub leaf_key: PrivateKeyDer<'static>,
}

#[allow(dead_code)] // Not every test file uses every helper
impl TestChain {
    /// The chain in the order a server presents it: leaf first.
    pub fn presented(&self) -> Vec<CertificateDer<'static>> {
        vec![self.leaf.clone(), self.ca.clone()]
    }
}

/// Options for [`generate_chain`].
pub struct LeafOptions<'a> {
    pub common_name: &'a str,
    pub dns_names: &'a [&'a str],
    pub ca_issuer_urls: &'a [&'a str],
    pub expired: bool,
}

impl Default for LeafOptions<'_> {
    fn default() -> Self {
        Self {
            common_name: "leaf.test",
            dns_names: &["leaf.test"],
            ca_issuer_urls: &[],
            expired: false,
        }
    }
}

fn der_length(len: usize) -> Vec<u8> {
    if len < 0x80 {
        vec![len as u8]
    } else if len <= 0xff {
        vec![0x81, len as u8]
    } else {
        vec![0x82, (len >> 8) as u8, len as u8]
    }
}

fn der_tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    out.extend(der_length(content.len()));
    out.extend_from_slice(content);
    out
}

/// Encodes an AuthorityInfoAccess value with an OCSP entry followed by the
/// given CA-issuer URLs.
fn authority_info_access(ca_issuer_urls: &[&str]) -> Vec<u8> {
    let mut descriptions = Vec::new();

    let mut ocsp = OCSP_METHOD.to_vec();
    ocsp.extend(der_tlv(0x86, b"http://ocsp.ca.test"));
    descriptions.extend(der_tlv(0x30, &ocsp));

    for url in ca_issuer_urls {
        let mut description = CA_ISSUERS_METHOD.to_vec();
        description.extend(der_tlv(0x86, url.as_bytes()));
        descriptions.extend(der_tlv(0x30, &description));
    }

    der_tlv(0x30, &descriptions)
}

/// Generates a root CA and a leaf certificate signed by it.
pub fn generate_chain(options: LeafOptions<'_>) -> TestChain {
    let ca_key = KeyPair::generate().expect("generate CA key");
    let mut ca_params = CertificateParams::new(Vec::<String>::new()).expect("CA params");
    let mut ca_name = DistinguishedName::new();
    ca_name.push(DnType::CommonName, "Test Root CA");
    ca_name.push(DnType::OrganizationName, "Cert Audit Tests");
    ca_params.distinguished_name = ca_name;
    ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    ca_params.not_before = rcgen::date_time_ymd(2020, 1, 1);
    ca_params.not_after = rcgen::date_time_ymd(2040, 1, 1);
    let ca_cert = ca_params.self_signed(&ca_key).expect("self-sign CA");

    let leaf_key = KeyPair::generate().expect("generate leaf key");
    let names: Vec<String> = options.dns_names.iter().map(|n| n.to_string()).collect();
    let mut leaf_params = CertificateParams::new(names).expect("leaf params");
    let mut leaf_name = DistinguishedName::new();
    leaf_name.push(DnType::CommonName, options.common_name);
    leaf_params.distinguished_name = leaf_name;
    leaf_params.is_ca = IsCa::NoCa;
    if options.expired {
        leaf_params.not_before = rcgen::date_time_ymd(2020, 1, 1);
        leaf_params.not_after = rcgen::date_time_ymd(2021, 1, 1);
    } else {
        leaf_params.not_before = rcgen::date_time_ymd(2020, 1, 1);
        leaf_params.not_after = rcgen::date_time_ymd(2039, 1, 1);
    }
    if !options.ca_issuer_urls.is_empty() {
        leaf_params
            .custom_extensions
            .push(CustomExtension::from_oid_content(
                OID_AUTHORITY_INFO_ACCESS,
                authority_info_access(options.ca_issuer_urls),
            ));
    }
    let leaf_cert = leaf_params
        .signed_by(&leaf_key, &ca_cert, &ca_key)
        .expect("sign leaf");

    TestChain {
        leaf: leaf_cert.der().clone(),
        ca: ca_cert.der().clone(),
        leaf_key: PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(leaf_key.serialize_der())),
    }
}

/// Starts a loopback TLS server presenting `chain` and returns its address.
///
/// The server accepts connections until the test runtime shuts down.
#[allow(dead_code)]
pub async fn spawn_tls_server(
    chain: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
) -> SocketAddr {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = rustls::ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .expect("protocol versions")
        .with_no_client_auth()
        .with_single_cert(chain, key)
        .expect("server certificate");
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        loop {
            let Ok((sock, _)) = listener.accept().await else {
                break;
            };
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                // Handshake errors are expected when a client probes and hangs up
                let _ = acceptor.accept(sock).await;
            });
        }
    });

    addr
}

/// Returns a local port with nothing listening on it.
#[allow(dead_code)]
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    port
}

/// Scripted per-address behaviour for [`ScriptedProbe`].
#[allow(dead_code)]
#[derive(Clone)]
pub enum Script {
    /// Serve this chain after the given delay in milliseconds
    Serve(Vec<CertificateDer<'static>>, u64),
    /// Fail with a refused connection
    Refuse,
}

/// A probe that replays scripted chains instead of dialing the network.
#[allow(dead_code)]
pub struct ScriptedProbe {
    pub port: u16,
    pub scripts: std::collections::HashMap<IpAddr, Script>,
    pub in_flight: std::sync::atomic::AtomicUsize,
    pub max_in_flight: std::sync::atomic::AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedProbe {
    pub fn new(scripts: impl IntoIterator<Item = (IpAddr, Script)>) -> Self {
        Self {
            port: 443,
            scripts: scripts.into_iter().collect(),
            in_flight: Default::default(),
            max_in_flight: Default::default(),
        }
    }
}

impl CertificateProbe for ScriptedProbe {
    async fn probe(&self, address: IpAddr) -> Result<PeerChain, ProbeError> {
        use std::sync::atomic::Ordering;

        let addr = SocketAddr::new(address, self.port);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = match self.scripts.get(&address).cloned() {
            Some(Script::Serve(chain, delay_ms)) => {
                tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                PeerChain::from_der(addr, chain)
            }
            Some(Script::Refuse) | None => Err(ProbeError::Connect {
                addr,
                source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
            }),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
