//! Hostname extraction from user input.
//!
//! The target may be given as a bare hostname (`example.com`), a host with a
//! port or path (`example.com:8443/login`), or a full URL
//! (`https://user@example.com/path`). Only the host is kept: it is handed to the
//! resolver and used as the SNI name of every handshake.

use url::{Host, Url};

use crate::error_handling::HostParseError;

/// Extracts the hostname from a URL or bare host string.
///
/// A missing scheme is treated as `https://`. IPv6 literals are returned
/// without brackets, and DNS names are lowercased by the URL parser.
///
/// # Errors
///
/// Returns [`HostParseError`] if the input is empty, cannot be parsed, or has no
/// host component.
pub fn parse_host(input: &str) -> Result<String, HostParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(HostParseError::Empty);
    }

    let normalized = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&normalized).map_err(|e| HostParseError::Invalid {
        input: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    let host = match parsed.host() {
        Some(Host::Domain(domain)) => domain.trim_end_matches('.').to_string(),
        Some(Host::Ipv4(ip)) => ip.to_string(),
        Some(Host::Ipv6(ip)) => ip.to_string(),
        None => return Err(HostParseError::MissingHost(trimmed.to_string())),
    };

    if host.is_empty() {
        return Err(HostParseError::MissingHost(trimmed.to_string()));
    }

    Ok(host)
}
