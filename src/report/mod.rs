//! Run report and its renderers.
//!
//! [`CheckReport`] is the library's result type for one audit run. It is
//! rendered either as the human-readable text layout ([`render_text`]) or as a
//! single JSON document ([`render_json`]).

mod json;
mod text;

use std::net::IpAddr;

use crate::error_handling::{ProbeError, ProbeFailureKind};
use crate::models::Certificate;

pub use json::render_json;
pub use text::render_text;

/// One per-address failure, as listed in the report.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ProbeFailure {
    /// Address that was probed
    pub address: IpAddr,
    /// Failure category
    pub kind: ProbeFailureKind,
    /// Full error message
    pub message: String,
}

impl ProbeFailure {
    /// Builds the report entry for `error` raised while probing `address`.
    pub fn new(address: IpAddr, error: &ProbeError) -> Self {
        Self {
            address,
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Results of one certificate audit run.
#[derive(Debug, Clone)]
pub struct CheckReport {
    /// Hostname extracted from the target
    pub host: String,
    /// Port every address was dialed on
    pub port: u16,
    /// DNS resolver used for the lookup
    pub resolver: String,
    /// Every address that was attempted, in resolution order
    pub addresses: Vec<IpAddr>,
    /// Distinct leaf certificates, sorted
    pub leaves: Vec<Certificate>,
    /// Distinct CA certificates, sorted
    pub authorities: Vec<Certificate>,
    /// Per-address failures, in resolution order
    pub failures: Vec<ProbeFailure>,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

impl CheckReport {
    /// Number of addresses that returned a chain.
    pub fn successful(&self) -> usize {
        self.addresses.len().saturating_sub(self.failures.len())
    }

    /// Failure counts per kind, in first-seen order.
    pub fn failure_counts(&self) -> Vec<(ProbeFailureKind, usize)> {
        let mut counts: Vec<(ProbeFailureKind, usize)> = Vec::new();
        for failure in &self.failures {
            match counts.iter_mut().find(|(kind, _)| *kind == failure.kind) {
                Some((_, count)) => *count += 1,
                None => counts.push((failure.kind, 1)),
            }
        }
        counts
    }
}
