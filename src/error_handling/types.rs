//! Error type definitions.
//!
//! This module defines all error types used throughout the application.

use std::net::{IpAddr, SocketAddr};

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error building the TLS client configuration.
    #[error("TLS client initialization error: {0}")]
    TlsConfigError(#[from] rustls::Error),

    /// The target host cannot be used as a TLS server name (SNI).
    #[error("invalid TLS server name '{0}'")]
    InvalidServerName(String),
}

/// Errors produced while extracting a hostname from user input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HostParseError {
    /// Input was empty or whitespace.
    #[error("target is empty")]
    Empty,

    /// Input could not be parsed as a URL even after adding a scheme.
    #[error("invalid target '{input}': {reason}")]
    Invalid {
        /// Original input
        input: String,
        /// Parser message
        reason: String,
    },

    /// URL parsed but carries no host component.
    #[error("target '{0}' has no host component")]
    MissingHost(String),
}

/// Errors produced while resolving the target hostname.
///
/// Every variant is fatal for a run: without addresses there is nothing to probe.
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// The resolver address given on the command line is not an IP or socket address.
    #[error("invalid DNS resolver address '{0}'")]
    InvalidResolver(String),

    /// The lookup itself failed (NXDOMAIN, timeout, refused).
    #[error("DNS lookup for {host} failed: {source}")]
    Lookup {
        /// Hostname queried
        host: String,
        /// Resolver error
        #[source]
        source: trust_dns_resolver::error::ResolveError,
    },

    /// The lookup succeeded but returned no addresses.
    #[error("no addresses found for {0}")]
    NoAddresses(String),
}

/// Per-address probe failure.
///
/// These are recoverable: the run records them and continues with the remaining
/// addresses.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// TCP connection was refused or failed.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        /// Dialed socket address
        addr: SocketAddr,
        /// I/O error
        #[source]
        source: std::io::Error,
    },

    /// TCP connection did not complete within the connect timeout.
    #[error("TCP connection timeout for {addr} ({timeout_ms}ms)")]
    ConnectTimeout {
        /// Dialed socket address
        addr: SocketAddr,
        /// Timeout applied
        timeout_ms: u128,
    },

    /// TLS negotiation failed.
    #[error("TLS handshake failed for {addr}: {source}")]
    Handshake {
        /// Dialed socket address
        addr: SocketAddr,
        /// I/O error wrapping the rustls failure
        #[source]
        source: std::io::Error,
    },

    /// The handshake did not complete before the overall deadline.
    #[error("TLS handshake timeout for {addr} ({timeout_ms}ms)")]
    HandshakeTimeout {
        /// Dialed socket address
        addr: SocketAddr,
        /// Deadline applied
        timeout_ms: u128,
    },

    /// The server completed the handshake without presenting certificates.
    #[error("{0} presented no certificates")]
    NoPeerCertificates(SocketAddr),

    /// A presented certificate could not be parsed as X.509.
    #[error("certificate {index} presented by {addr} is malformed: {reason}")]
    MalformedCertificate {
        /// Dialed socket address
        addr: SocketAddr,
        /// Position in the presented chain
        index: usize,
        /// Parser message
        reason: String,
    },

    /// The run deadline expired before this probe finished.
    #[error("probe of {0} cancelled by run deadline")]
    Cancelled(IpAddr),

    /// The probe task panicked or was aborted.
    #[error("probe task for {address} failed: {reason}")]
    Task {
        /// Address the task was probing
        address: IpAddr,
        /// Join error message
        reason: String,
    },
}

impl ProbeError {
    /// Returns the failure category used for statistics.
    pub fn kind(&self) -> ProbeFailureKind {
        match self {
            ProbeError::Connect { .. } => ProbeFailureKind::ConnectError,
            ProbeError::ConnectTimeout { .. } => ProbeFailureKind::ConnectTimeout,
            ProbeError::Handshake { .. } => ProbeFailureKind::HandshakeError,
            ProbeError::HandshakeTimeout { .. } => ProbeFailureKind::HandshakeTimeout,
            ProbeError::NoPeerCertificates(_) => ProbeFailureKind::NoPeerCertificates,
            ProbeError::MalformedCertificate { .. } => ProbeFailureKind::MalformedCertificate,
            ProbeError::Cancelled(_) => ProbeFailureKind::Cancelled,
            ProbeError::Task { .. } => ProbeFailureKind::TaskError,
        }
    }
}

/// Categories of per-address probe failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeFailureKind {
    ConnectError,
    ConnectTimeout,
    HandshakeError,
    HandshakeTimeout,
    NoPeerCertificates,
    MalformedCertificate,
    Cancelled,
    TaskError,
}

impl std::fmt::Display for ProbeFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProbeFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeFailureKind::ConnectError => "TCP connect error",
            ProbeFailureKind::ConnectTimeout => "TCP connect timeout",
            ProbeFailureKind::HandshakeError => "TLS handshake error",
            ProbeFailureKind::HandshakeTimeout => "TLS handshake timeout",
            ProbeFailureKind::NoPeerCertificates => "No peer certificates",
            ProbeFailureKind::MalformedCertificate => "Malformed certificate",
            ProbeFailureKind::Cancelled => "Cancelled by run deadline",
            ProbeFailureKind::TaskError => "Probe task error",
        }
    }
}
