//! Certificate normalization.
//!
//! Maps a parsed X.509 certificate to the [`Certificate`] model. Normalization
//! is total: the chain was already parsed successfully when the probe accepted
//! it, and optional fields that are absent or undecodable become empty values.

use chrono::{DateTime, Utc};
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::{GeneralName, ParsedExtension};
use x509_parser::time::ASN1Time;
use x509_parser::x509::X509Name;

use crate::config::OID_AIA_CA_ISSUERS;
use crate::models::{Certificate, DistinguishedName};

/// Normalizes a certificate, computing `remaining` against the current time.
pub fn normalize(cert: &X509Certificate<'_>) -> Certificate {
    normalize_at(cert, Utc::now())
}

/// Normalizes a certificate, computing `remaining` against `now`.
pub fn normalize_at(cert: &X509Certificate<'_>, now: DateTime<Utc>) -> Certificate {
    let subject = extract_distinguished_name(cert.subject());
    let issuer = extract_distinguished_name(cert.issuer());
    let common_name = subject.common_name().unwrap_or_default().to_string();

    let not_before = asn1_time_to_datetime(cert.validity().not_before);
    let not_after = asn1_time_to_datetime(cert.validity().not_after);

    Certificate {
        common_name,
        subject,
        issuer,
        not_before,
        not_after,
        remaining: not_after - now,
        signature_algorithm: signature_algorithm_name(
            &cert.signature_algorithm.algorithm.to_id_string(),
        ),
        // X.509 version is 0-indexed on the wire
        version: cert.version().0 + 1,
        dns_names: extract_dns_names(cert),
        issuing_certificate_urls: extract_issuing_certificate_urls(cert),
        is_ca: cert.is_ca(),
        identity: cert.signature_value.data.to_vec(),
    }
}

/// Extracts the attributes of a distinguished name in certificate order.
///
/// Values that are not valid strings (e.g. BMPString with odd lengths) are
/// kept with an empty value.
pub(crate) fn extract_distinguished_name(name: &X509Name<'_>) -> DistinguishedName {
    let attributes = name
        .iter_attributes()
        .map(|attr| {
            let oid = attr.attr_type().to_id_string();
            let value = attr.as_str().map(str::to_string).unwrap_or_default();
            (attribute_short_name(&oid), value)
        })
        .collect();
    DistinguishedName { attributes }
}

fn attribute_short_name(oid: &str) -> String {
    match oid {
        "2.5.4.3" => "CN",
        "2.5.4.5" => "SERIALNUMBER",
        "2.5.4.6" => "C",
        "2.5.4.7" => "L",
        "2.5.4.8" => "ST",
        "2.5.4.9" => "STREET",
        "2.5.4.10" => "O",
        "2.5.4.11" => "OU",
        "2.5.4.17" => "POSTALCODE",
        "0.9.2342.19200300.100.1.25" => "DC",
        "1.2.840.113549.1.9.1" => "emailAddress",
        _ => oid,
    }
    .to_string()
}

/// Extracts Subject Alternative Name DNS entries in certificate order.
///
/// Other name types (IP addresses, emails, URIs) are not DNS names and are
/// skipped.
pub(crate) fn extract_dns_names(cert: &X509Certificate<'_>) -> Vec<String> {
    let mut names = Vec::new();

    for ext in cert.extensions() {
        if let ParsedExtension::SubjectAlternativeName(san) = ext.parsed_extension() {
            for general_name in &san.general_names {
                if let GeneralName::DNSName(dns_name) = general_name {
                    names.push(dns_name.to_string());
                }
            }
        }
    }

    names
}

/// Extracts the AIA CA-issuer URLs in certificate order.
///
/// OCSP responder entries share the extension and are skipped.
pub(crate) fn extract_issuing_certificate_urls(cert: &X509Certificate<'_>) -> Vec<String> {
    let mut urls = Vec::new();

    for ext in cert.extensions() {
        if let ParsedExtension::AuthorityInfoAccess(aia) = ext.parsed_extension() {
            for desc in &aia.accessdescs {
                if desc.access_method.to_id_string() != OID_AIA_CA_ISSUERS {
                    continue;
                }
                if let GeneralName::URI(uri) = &desc.access_location {
                    urls.push(uri.to_string());
                }
            }
        }
    }

    urls
}

/// Maps a signature algorithm OID to its conventional name.
///
/// Unknown algorithms keep their dotted OID.
pub(crate) fn signature_algorithm_name(oid: &str) -> String {
    match oid {
        "1.2.840.113549.1.1.2" => "MD2-RSA",
        "1.2.840.113549.1.1.4" => "MD5-RSA",
        "1.2.840.113549.1.1.5" => "SHA1-RSA",
        "1.2.840.113549.1.1.10" => "RSA-PSS",
        "1.2.840.113549.1.1.11" => "SHA256-RSA",
        "1.2.840.113549.1.1.12" => "SHA384-RSA",
        "1.2.840.113549.1.1.13" => "SHA512-RSA",
        "1.2.840.10040.4.3" => "DSA-SHA1",
        "2.16.840.1.101.3.4.3.2" => "DSA-SHA256",
        "1.2.840.10045.4.1" => "ECDSA-SHA1",
        "1.2.840.10045.4.3.2" => "ECDSA-SHA256",
        "1.2.840.10045.4.3.3" => "ECDSA-SHA384",
        "1.2.840.10045.4.3.4" => "ECDSA-SHA512",
        "1.3.101.112" => "Ed25519",
        "1.3.101.113" => "Ed448",
        _ => oid,
    }
    .to_string()
}

/// Converts an ASN.1 time to UTC. Out-of-range values fall back to the epoch.
fn asn1_time_to_datetime(time: ASN1Time) -> DateTime<Utc> {
    DateTime::from_timestamp(time.timestamp(), 0).unwrap_or_default()
}
