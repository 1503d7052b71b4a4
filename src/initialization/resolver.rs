//! DNS resolver initialization.
//!
//! The resolver queries exactly the server given on the command line, never
//! the system configuration, so the address set reflects what that server
//! returns.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use trust_dns_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

use crate::config::{DNS_ATTEMPTS, DNS_PORT, DNS_TIMEOUT_SECS};
use crate::error_handling::ResolutionError;

/// Parses a resolver address given as `ip` or `ip:port`.
///
/// IPv6 resolvers with a port use the bracketed form (`[2001:4860::8888]:53`).
///
/// # Errors
///
/// Returns `ResolutionError::InvalidResolver` if the string is neither form.
pub fn parse_resolver_address(dns_server: &str) -> Result<SocketAddr, ResolutionError> {
    let trimmed = dns_server.trim();
    if let Ok(addr) = trimmed.parse::<SocketAddr>() {
        return Ok(addr);
    }
    trimmed
        .parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, DNS_PORT))
        .map_err(|_| ResolutionError::InvalidResolver(dns_server.to_string()))
}

/// Initializes a DNS resolver bound to a single nameserver.
///
/// Both UDP and TCP are configured for the nameserver so truncated answers can
/// be retried over TCP. `ndots` is set to 0 to prevent search domain appending.
///
/// # Errors
///
/// Returns `ResolutionError::InvalidResolver` if `dns_server` cannot be parsed.
pub fn init_resolver(dns_server: &str) -> Result<TokioAsyncResolver, ResolutionError> {
    let addr = parse_resolver_address(dns_server)?;

    let name_servers = NameServerConfigGroup::from_ips_clear(&[addr.ip()], addr.port(), true);
    let config = ResolverConfig::from_parts(None, vec![], name_servers);

    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(DNS_TIMEOUT_SECS);
    opts.attempts = DNS_ATTEMPTS;
    opts.ndots = 0;
    opts.use_hosts_file = false;

    log::debug!("DNS resolver configured for {addr}");
    Ok(TokioAsyncResolver::tokio(config, opts))
}
