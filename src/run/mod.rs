//! Audit run orchestration.
//!
//! Resolves the target, fans the TLS probe out over every address with
//! bounded concurrency, and folds the presented chains into one
//! deduplicated result.

mod task;

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::info;
use tokio::sync::Mutex;

use crate::collector::{CollectedCertificates, Collector};
use crate::config::Config;
use crate::dns::resolve_addresses;
use crate::domain::parse_host;
use crate::error_handling::{ProbeError, ProbeStats};
use crate::initialization::{init_resolver, init_semaphore};
use crate::report::{CheckReport, ProbeFailure};
use crate::tls::{CertificateProbe, TlsProbe};

use task::{process_address_task, record_failure, ProbeTaskParams};

/// Merged outcome of probing a set of addresses.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Distinct certificates, sorted
    pub certificates: CollectedCertificates,
    /// Per-address failures, in input order
    pub failures: Vec<ProbeFailure>,
    /// Number of addresses that returned a chain
    pub successful: usize,
}

/// Probes every address and merges the presented chains.
///
/// At most `concurrency` probes run at once. Each address is attempted exactly
/// once; a failure is recorded and never stops the other probes. When
/// `run_deadline` is set, probes still outstanding once it elapses are
/// cancelled and recorded as failures.
pub async fn probe_addresses<P: CertificateProbe>(
    probe: Arc<P>,
    addresses: &[IpAddr],
    concurrency: usize,
    run_deadline: Option<Duration>,
) -> ScanOutcome {
    let semaphore = init_semaphore(concurrency.max(1));
    let collector = Arc::new(Mutex::new(Collector::new()));
    let stats = Arc::new(ProbeStats::new());
    let deadline = run_deadline.map(|d| tokio::time::Instant::now() + d);

    let mut tasks = FuturesUnordered::new();
    for (index, &address) in addresses.iter().enumerate() {
        let handle = tokio::spawn(process_address_task(ProbeTaskParams {
            address,
            probe: Arc::clone(&probe),
            semaphore: Arc::clone(&semaphore),
            collector: Arc::clone(&collector),
            stats: Arc::clone(&stats),
            deadline,
        }));
        tasks.push(async move { (index, address, handle.await) });
    }

    let mut failures: Vec<(usize, ProbeFailure)> = Vec::new();
    while let Some((index, address, joined)) = tasks.next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => failures.push((index, ProbeFailure::new(address, &e))),
            Err(join_error) => {
                let e = ProbeError::Task {
                    address,
                    reason: join_error.to_string(),
                };
                record_failure(&stats, &e);
                failures.push((index, ProbeFailure::new(address, &e)));
            }
        }
    }
    failures.sort_by_key(|(index, _)| *index);

    stats.log_summary();

    // Every task has finished, so this is the only handle left
    let certificates = match Arc::try_unwrap(collector) {
        Ok(mutex) => mutex.into_inner().into_results(),
        Err(shared) => shared.lock().await.results(),
    };

    ScanOutcome {
        certificates,
        failures: failures.into_iter().map(|(_, failure)| failure).collect(),
        successful: stats.success_count(),
    }
}

/// Runs a certificate audit with the provided configuration.
///
/// This is the main entry point for the library: parse the target, resolve it
/// against the configured DNS server, probe every address, and return the
/// merged report.
///
/// # Errors
///
/// This function will return an error if:
/// - The configuration is invalid
/// - The target has no usable host
/// - The resolver cannot be built or the lookup fails or returns nothing
/// - The host cannot be used as a TLS server name
///
/// Per-address probe failures are not errors; they are listed in
/// [`CheckReport::failures`].
pub async fn run_check(config: Config) -> Result<CheckReport> {
    config.validate().context("Invalid configuration")?;

    let host = parse_host(&config.target).context("Failed to parse target")?;
    info!("Checking certificates for {host} on port {}", config.port);

    let resolver =
        init_resolver(&config.dns_server).context("Failed to initialize DNS resolver")?;
    let addresses = resolve_addresses(&host, &resolver)
        .await
        .with_context(|| format!("Failed to resolve {host} via {}", config.dns_server))?;

    let probe = TlsProbe::new(
        &host,
        config.port,
        config.connect_timeout,
        config.handshake_timeout,
    )
    .context("Failed to initialize TLS probe")?;

    let start_time = std::time::Instant::now();
    let outcome = probe_addresses(
        Arc::new(probe),
        &addresses,
        config.concurrency,
        config.run_deadline,
    )
    .await;

    Ok(CheckReport {
        host,
        port: config.port,
        resolver: config.dns_server,
        addresses,
        leaves: outcome.certificates.leaves,
        authorities: outcome.certificates.authorities,
        failures: outcome.failures,
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
    })
}
