//! Per-address task processing.
//!
//! This module contains the logic for probing a single address, including
//! success/failure/cancellation handling.

use std::net::IpAddr;
use std::sync::Arc;

use tokio::sync::{Mutex, Semaphore};
use tokio::time::Instant;

use crate::collector::Collector;
use crate::error_handling::{ProbeError, ProbeStats};
use crate::tls::CertificateProbe;

/// Everything one probe task needs.
pub(crate) struct ProbeTaskParams<P> {
    pub address: IpAddr,
    pub probe: Arc<P>,
    pub semaphore: Arc<Semaphore>,
    pub collector: Arc<Mutex<Collector>>,
    pub stats: Arc<ProbeStats>,
    pub deadline: Option<Instant>,
}

/// Probes one address and folds its chain into the shared collector.
///
/// This function is spawned as a Tokio task for each address. It handles:
/// - Waiting for a concurrency permit
/// - The probe itself, bounded by the optional run deadline
/// - Normalizing and offering the chain under a single collector lock
///
/// Failures are logged and counted here; the error is returned so the run
/// can list it in the report.
pub(crate) async fn process_address_task<P: CertificateProbe>(
    params: ProbeTaskParams<P>,
) -> Result<(), ProbeError> {
    let ProbeTaskParams {
        address,
        probe,
        semaphore,
        collector,
        stats,
        deadline,
    } = params;

    let work = async {
        // Hold permit until the connection is closed
        let _permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .map_err(|e| ProbeError::Task {
                address,
                reason: e.to_string(),
            })?;

        let chain = probe.probe(address).await?;
        let certificates = chain.normalize();

        let mut guard = collector.lock().await;
        let recorded = guard.offer_chain(certificates);
        drop(guard);

        log::info!(
            "{address}: {} certificate(s) presented, {recorded} new",
            chain.len()
        );
        Ok::<(), ProbeError>(())
    };

    let result = match deadline {
        Some(deadline) => match tokio::time::timeout_at(deadline, work).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Cancelled(address)),
        },
        None => work.await,
    };

    match &result {
        Ok(()) => stats.increment_success(),
        Err(e) => record_failure(&stats, e),
    }
    result
}

/// Logs a probe failure and updates the statistics.
pub(crate) fn record_failure(stats: &ProbeStats, error: &ProbeError) {
    stats.increment_failure(error.kind());
    log::warn!("{error}");
}
