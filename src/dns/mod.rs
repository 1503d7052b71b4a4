//! Address resolution for the target hostname.
//!
//! Produces the ordered, de-duplicated list of IPv4 and IPv6 addresses that
//! every probe is dialed against.

use std::collections::HashSet;
use std::net::IpAddr;

use trust_dns_resolver::TokioAsyncResolver;

use crate::error_handling::ResolutionError;

/// Resolves a hostname to all of its IP addresses.
///
/// IP literals are returned as-is without a query.
///
/// # Errors
///
/// Returns `ResolutionError::Lookup` if the query fails and
/// `ResolutionError::NoAddresses` if it succeeds with an empty answer.
pub async fn resolve_addresses(
    host: &str,
    resolver: &TokioAsyncResolver,
) -> Result<Vec<IpAddr>, ResolutionError> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        log::debug!("{host} is an IP literal, skipping DNS lookup");
        return Ok(vec![ip]);
    }

    let response = resolver
        .lookup_ip(host)
        .await
        .map_err(|source| ResolutionError::Lookup {
            host: host.to_string(),
            source,
        })?;

    let addresses = collect_addresses(host, response.iter())?;
    log::info!("Resolved {host} to {} address(es)", addresses.len());
    Ok(addresses)
}

/// De-duplicates addresses, keeping the first occurrence of each.
///
/// # Errors
///
/// Returns `ResolutionError::NoAddresses` if `addresses` is empty.
pub fn collect_addresses(
    host: &str,
    addresses: impl IntoIterator<Item = IpAddr>,
) -> Result<Vec<IpAddr>, ResolutionError> {
    let mut seen = HashSet::new();
    let unique: Vec<IpAddr> = addresses
        .into_iter()
        .filter(|ip| seen.insert(*ip))
        .collect();

    if unique.is_empty() {
        return Err(ResolutionError::NoAddresses(host.to_string()));
    }
    Ok(unique)
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
