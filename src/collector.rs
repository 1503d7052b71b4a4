//! Deduplicating certificate collector.
//!
//! Accumulates normalized certificates from every probed address and keeps
//! exactly one entry per certificate identity (raw signature bytes). The same
//! certificate served by many addresses is recorded once; two different
//! certificates that happen to share a common name are both kept.
//!
//! The collector is plain, synchronous state. Concurrent probe tasks share it
//! behind a mutex held by the run (see `crate::run`), and a whole chain is
//! offered under one lock acquisition.

use std::collections::HashSet;

use crate::models::{Certificate, ChainRole};

/// Outcome of offering one certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// First sighting; stored in the partition for its role.
    Recorded(ChainRole),
    /// Identity already seen; nothing changed.
    Duplicate,
}

/// The two result partitions, sorted for stable reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedCertificates {
    pub leaves: Vec<Certificate>,
    pub authorities: Vec<Certificate>,
}

impl CollectedCertificates {
    pub fn total(&self) -> usize {
        self.leaves.len() + self.authorities.len()
    }
}

/// Identity-keyed accumulator split into leaf and CA partitions.
#[derive(Debug, Default)]
pub struct Collector {
    seen: HashSet<Vec<u8>>,
    leaves: Vec<Certificate>,
    authorities: Vec<Certificate>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `certificate` unless its identity was already seen.
    ///
    /// The identity check, the `seen` insert and the partition push happen in
    /// one `&mut self` call, so callers holding the collector's lock get them
    /// atomically.
    pub fn offer(&mut self, certificate: Certificate) -> Offer {
        if self.seen.contains(&certificate.identity) {
            log::debug!(
                "Skipping already recorded certificate '{}'",
                certificate.common_name
            );
            return Offer::Duplicate;
        }
        self.seen.insert(certificate.identity.clone());

        let role = certificate.role();
        log::debug!(
            "Recorded {:?} certificate '{}'",
            role,
            certificate.common_name
        );
        match role {
            ChainRole::Authority => self.authorities.push(certificate),
            ChainRole::Leaf => self.leaves.push(certificate),
        }
        Offer::Recorded(role)
    }

    /// Offers every certificate of a chain in presentation order.
    ///
    /// Returns the number of newly recorded certificates.
    pub fn offer_chain(&mut self, chain: impl IntoIterator<Item = Certificate>) -> usize {
        chain
            .into_iter()
            .map(|certificate| self.offer(certificate))
            .filter(|offer| matches!(offer, Offer::Recorded(_)))
            .count()
    }

    /// Number of distinct identities recorded.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Returns both partitions sorted by common name, expiry, then identity.
    ///
    /// Sorting makes reports independent of the order in which concurrent
    /// probes completed.
    pub fn results(&self) -> CollectedCertificates {
        CollectedCertificates {
            leaves: sorted(&self.leaves),
            authorities: sorted(&self.authorities),
        }
    }

    /// Consumes the collector, returning the sorted partitions.
    pub fn into_results(self) -> CollectedCertificates {
        let mut leaves = self.leaves;
        let mut authorities = self.authorities;
        sort_certificates(&mut leaves);
        sort_certificates(&mut authorities);
        CollectedCertificates {
            leaves,
            authorities,
        }
    }
}

fn sorted(certificates: &[Certificate]) -> Vec<Certificate> {
    let mut out = certificates.to_vec();
    sort_certificates(&mut out);
    out
}

fn sort_certificates(certificates: &mut [Certificate]) {
    certificates.sort_by(|a, b| {
        a.common_name
            .cmp(&b.common_name)
            .then(a.not_after.cmp(&b.not_after))
            .then_with(|| a.identity.cmp(&b.identity))
    });
}
