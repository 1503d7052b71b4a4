//! Certificate data model.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

/// A distinguished name as an ordered list of attribute/value pairs.
///
/// Attributes keep the order in which they appear in the certificate. Known
/// attribute types use their short names (`CN`, `O`, `C`, ...); anything else
/// keeps its dotted OID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    pub attributes: Vec<(String, String)>,
}

impl DistinguishedName {
    /// Returns the first value of the given attribute type.
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the first common name, if any.
    pub fn common_name(&self) -> Option<&str> {
        self.get("CN")
    }
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .attributes
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// One X.509 certificate observed during a handshake.
///
/// Built once by normalization and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// Subject common name; empty when the subject has none.
    pub common_name: String,
    pub subject: DistinguishedName,
    pub issuer: DistinguishedName,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    /// `not_after - now` at normalization time. Negative once expired.
    pub remaining: TimeDelta,
    pub signature_algorithm: String,
    /// 1-based X.509 version (v3 certificates report 3).
    pub version: u32,
    /// Subject Alternative Name DNS entries, in certificate order.
    pub dns_names: Vec<String>,
    /// AIA CA-issuer URLs, in certificate order.
    pub issuing_certificate_urls: Vec<String>,
    /// Basic Constraints `cA` flag.
    pub is_ca: bool,
    /// Raw signature bytes; the deduplication key.
    pub identity: Vec<u8>,
}

/// Chain role of a certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainRole {
    /// End-entity certificate
    Leaf,
    /// Certificate authority (intermediate or root)
    Authority,
}

impl Certificate {
    /// Classifies the certificate by its Basic Constraints flag.
    pub fn role(&self) -> ChainRole {
        if self.is_ca {
            ChainRole::Authority
        } else {
            ChainRole::Leaf
        }
    }

    /// Remaining lifetime in whole days, truncated toward zero.
    pub fn days_remaining(&self) -> i64 {
        crate::utils::days_remaining(self.remaining.num_seconds() as f64 / 3600.0)
    }

    pub fn is_expired(&self) -> bool {
        self.remaining < TimeDelta::zero()
    }

    /// Lowercase hex of the identity bytes.
    pub fn identity_hex(&self) -> String {
        self.identity.iter().map(|b| format!("{b:02x}")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(is_ca: bool, remaining_hours: i64) -> Certificate {
        let now = Utc::now();
        Certificate {
            common_name: "example.com".to_string(),
            subject: DistinguishedName {
                attributes: vec![
                    ("CN".to_string(), "example.com".to_string()),
                    ("O".to_string(), "Example Inc".to_string()),
                ],
            },
            issuer: DistinguishedName::default(),
            not_before: now - TimeDelta::days(30),
            not_after: now + TimeDelta::hours(remaining_hours),
            remaining: TimeDelta::hours(remaining_hours),
            signature_algorithm: "ECDSA-SHA256".to_string(),
            version: 3,
            dns_names: vec![],
            issuing_certificate_urls: vec![],
            is_ca,
            identity: vec![0xde, 0xad, 0x01],
        }
    }

    #[test]
    fn test_distinguished_name_display_keeps_order() {
        let cert = sample(false, 24);
        assert_eq!(cert.subject.to_string(), "CN=example.com, O=Example Inc");
        assert_eq!(cert.subject.common_name(), Some("example.com"));
        assert_eq!(cert.issuer.common_name(), None);
        assert_eq!(cert.issuer.to_string(), "");
    }

    #[test]
    fn test_role_follows_ca_flag() {
        assert_eq!(sample(true, 24).role(), ChainRole::Authority);
        assert_eq!(sample(false, 24).role(), ChainRole::Leaf);
    }

    #[test]
    fn test_days_remaining_sign() {
        assert_eq!(sample(false, 24 * 10 + 5).days_remaining(), 10);
        let expired = sample(false, -(24 * 3) - 1);
        assert!(expired.is_expired());
        assert_eq!(expired.days_remaining(), -3);
        let just_expired = sample(false, -1);
        assert_eq!(just_expired.days_remaining(), 0);
    }

    #[test]
    fn test_identity_hex() {
        assert_eq!(sample(false, 1).identity_hex(), "dead01");
    }
}
