//! cert_audit library: TLS certificate auditing across every address of a host
//!
//! This library resolves a hostname, performs one TLS handshake against each of
//! its addresses with trust verification disabled, and reports every distinct
//! leaf and CA certificate that was served, with its validity window and
//! remaining lifetime.
//!
//! # Example
//!
//! ```no_run
//! use cert_audit::{render_text, run_check, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     target: "https://example.com".to_string(),
//!     dns_server: "1.1.1.1".to_string(),
//!     ..Default::default()
//! };
//!
//! let report = run_check(config).await?;
//! println!("{}", render_text(&report));
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

mod collector;
pub mod config;
mod dns;
mod domain;
mod error_handling;
pub mod initialization;
mod models;
mod report;
mod run;
mod tls;
mod utils;

// Re-export public API
pub use collector::{CollectedCertificates, Collector, Offer};
pub use config::{Config, ConfigError, LogFormat, LogLevel, Opt, ReportFormat};
pub use dns::{collect_addresses, resolve_addresses};
pub use domain::parse_host;
pub use error_handling::{
    HostParseError, InitializationError, ProbeError, ProbeFailureKind, ProbeStats,
    ResolutionError,
};
pub use models::{Certificate, ChainRole, DistinguishedName};
pub use report::{render_json, render_text, CheckReport, ProbeFailure};
pub use run::{probe_addresses, run_check, ScanOutcome};
pub use tls::{
    build_client_config, normalize, normalize_at, AcceptAnyServerCert, CertificateProbe,
    PeerChain, TlsProbe,
};
pub use utils::days_remaining;
