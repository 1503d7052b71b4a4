//! JSON report output.

use std::net::IpAddr;

use serde::Serialize;

use super::{CheckReport, ProbeFailure};
use crate::models::Certificate;

#[derive(Serialize)]
struct ReportView<'a> {
    host: &'a str,
    port: u16,
    resolver: &'a str,
    addresses: &'a [IpAddr],
    leaves: Vec<CertificateView<'a>>,
    authorities: Vec<CertificateView<'a>>,
    failures: &'a [ProbeFailure],
    elapsed_seconds: f64,
}

#[derive(Serialize)]
struct CertificateView<'a> {
    common_name: &'a str,
    subject: String,
    issuer: String,
    not_before: String,
    not_after: String,
    remaining_days: i64,
    expired: bool,
    signature_algorithm: &'a str,
    version: u32,
    dns_names: &'a [String],
    issuing_certificate_urls: &'a [String],
    is_ca: bool,
    identity: String,
}

impl<'a> From<&'a Certificate> for CertificateView<'a> {
    fn from(cert: &'a Certificate) -> Self {
        Self {
            common_name: &cert.common_name,
            subject: cert.subject.to_string(),
            issuer: cert.issuer.to_string(),
            not_before: cert.not_before.to_rfc3339(),
            not_after: cert.not_after.to_rfc3339(),
            remaining_days: cert.days_remaining(),
            expired: cert.is_expired(),
            signature_algorithm: &cert.signature_algorithm,
            version: cert.version,
            dns_names: &cert.dns_names,
            issuing_certificate_urls: &cert.issuing_certificate_urls,
            is_ca: cert.is_ca,
            identity: cert.identity_hex(),
        }
    }
}

/// Renders the report as a pretty-printed JSON document.
///
/// # Errors
///
/// Returns a `serde_json::Error` if serialization fails.
pub fn render_json(report: &CheckReport) -> Result<String, serde_json::Error> {
    let view = ReportView {
        host: &report.host,
        port: report.port,
        resolver: &report.resolver,
        addresses: &report.addresses,
        leaves: report.leaves.iter().map(CertificateView::from).collect(),
        authorities: report.authorities.iter().map(CertificateView::from).collect(),
        failures: &report.failures,
        elapsed_seconds: report.elapsed_seconds,
    };
    serde_json::to_string_pretty(&view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::ProbeFailureKind;
    use crate::models::DistinguishedName;
    use chrono::{TimeDelta, TimeZone, Utc};

    fn report() -> CheckReport {
        let leaf = Certificate {
            common_name: "example.com".to_string(),
            subject: DistinguishedName {
                attributes: vec![("CN".to_string(), "example.com".to_string())],
            },
            issuer: DistinguishedName {
                attributes: vec![("CN".to_string(), "Example CA".to_string())],
            },
            not_before: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            not_after: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            remaining: -TimeDelta::hours(50),
            signature_algorithm: "ECDSA-SHA256".to_string(),
            version: 3,
            dns_names: vec!["example.com".to_string()],
            issuing_certificate_urls: vec![],
            is_ca: false,
            identity: vec![0xde, 0xad, 0xbe, 0xef],
        };
        CheckReport {
            host: "example.com".to_string(),
            port: 8443,
            resolver: "1.1.1.1".to_string(),
            addresses: vec!["198.51.100.10".parse().unwrap(), "198.51.100.11".parse().unwrap()],
            leaves: vec![leaf],
            authorities: vec![],
            failures: vec![ProbeFailure {
                address: "198.51.100.11".parse().unwrap(),
                kind: ProbeFailureKind::HandshakeTimeout,
                message: "TLS handshake timeout for 198.51.100.11:8443 (6000ms)".to_string(),
            }],
            elapsed_seconds: 2.5,
        }
    }

    #[test]
    fn test_render_json_structure() {
        let json = render_json(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["host"], "example.com");
        assert_eq!(value["port"], 8443);
        assert_eq!(value["addresses"][1], "198.51.100.11");
        assert_eq!(value["authorities"].as_array().unwrap().len(), 0);
        assert_eq!(value["failures"][0]["kind"], "handshake_timeout");
        assert_eq!(value["failures"][0]["address"], "198.51.100.11");
    }

    #[test]
    fn test_render_json_certificate_fields() {
        let json = render_json(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let leaf = &value["leaves"][0];

        assert_eq!(leaf["identity"], "deadbeef");
        assert_eq!(leaf["not_after"], "2024-06-01T00:00:00+00:00");
        assert_eq!(leaf["remaining_days"], -2);
        assert_eq!(leaf["expired"], true);
        assert_eq!(leaf["subject"], "CN=example.com");
        assert_eq!(leaf["is_ca"], false);
    }
}
