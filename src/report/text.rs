//! Human-readable report layout.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use super::CheckReport;
use crate::models::Certificate;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Renders the report as plain text.
///
/// Layout: header, one block per leaf certificate, the probed addresses, one
/// block per CA certificate, then a failure summary when any probe failed.
pub fn render_text(report: &CheckReport) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &CheckReport) -> std::fmt::Result {
    writeln!(
        out,
        "Checking Certificates: {} on port {}",
        report.host, report.port
    )?;
    writeln!(out)?;
    writeln!(out, "DNS Lookup on: {}", report.resolver)?;
    writeln!(out)?;

    writeln!(out, "Server Certificate:")?;
    for cert in &report.leaves {
        writeln!(out, "Common Name: {}", cert.common_name)?;
        write_details(out, cert)?;

        if !cert.dns_names.is_empty() {
            writeln!(out)?;
            writeln!(out, "DNS Names:")?;
            for name in &cert.dns_names {
                writeln!(out, "- {name}")?;
            }
        }
        write_issuing_urls(out, cert)?;
        writeln!(out)?;
    }

    writeln!(out)?;
    writeln!(out, "Server IP's:")?;
    for address in &report.addresses {
        writeln!(out, "* {address}")?;
    }

    writeln!(out)?;
    writeln!(out, "Certificate Authority:")?;
    writeln!(out)?;
    for cert in &report.authorities {
        writeln!(out, "{}", cert.common_name)?;
        write_details(out, cert)?;
        write_issuing_urls(out, cert)?;
        writeln!(out)?;
    }

    if !report.failures.is_empty() {
        writeln!(
            out,
            "Failed probes: {} of {}",
            report.failures.len(),
            report.addresses.len()
        )?;
        for (kind, count) in report.failure_counts() {
            writeln!(out, "- {kind}: {count}")?;
        }
    }

    Ok(())
}

fn write_details(out: &mut String, cert: &Certificate) -> std::fmt::Result {
    writeln!(out, "Issuer: {}", cert.issuer)?;
    writeln!(out, "Subject: {}", cert.subject)?;
    writeln!(out, "Signature Algorithm: {}", cert.signature_algorithm)?;
    writeln!(out, "Created: {}", format_time(cert.not_before))?;
    writeln!(out, "Expires: {}", format_time(cert.not_after))?;
    writeln!(out, "Expiration time: {} days", cert.days_remaining())?;
    writeln!(out, "Certificate Version: {}", cert.version)
}

fn write_issuing_urls(out: &mut String, cert: &Certificate) -> std::fmt::Result {
    if cert.issuing_certificate_urls.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "Issuing Certificate URL's:")?;
    for url in &cert.issuing_certificate_urls {
        writeln!(out, "- {url}")?;
    }
    Ok(())
}

fn format_time(time: DateTime<Utc>) -> String {
    time.format(TIME_FORMAT).to_string()
}
