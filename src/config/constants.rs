//! Configuration constants.
//!
//! Defaults for the command line and the network timeouts used by the probe
//! and the resolver.

/// Default TLS port probed on every resolved address.
pub const DEFAULT_PORT: u16 = 443;

/// Default DNS resolver queried for the target hostname.
pub const DEFAULT_DNS_SERVER: &str = "8.8.8.8";

/// Port used when the resolver address is given without one.
pub const DNS_PORT: u16 = 53;

// Network operation timeouts
/// DNS query timeout in seconds
pub const DNS_TIMEOUT_SECS: u64 = 5;
/// DNS query attempts before the lookup is reported as failed
pub const DNS_ATTEMPTS: usize = 2;
/// TCP connection timeout in milliseconds
pub const TCP_CONNECT_TIMEOUT_MS: u64 = 1000;
/// Overall deadline for connect plus TLS handshake, in seconds
///
/// Measured from the start of the connection attempt, so a slow connect eats
/// into the handshake budget.
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 6;

// Concurrency
/// Default number of simultaneous handshakes
pub const DEFAULT_CONCURRENCY: usize = 16;
/// Upper bound accepted for `--concurrency`
pub const MAX_CONCURRENCY: usize = 256;

/// OID of the AIA access method pointing at the issuing CA certificate.
pub const OID_AIA_CA_ISSUERS: &str = "1.3.6.1.5.5.7.48.2";
