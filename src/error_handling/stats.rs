//! Probe failure statistics.
//!
//! Thread-safe counters for per-address failures, shared across probe tasks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::ProbeFailureKind;

/// Thread-safe probe statistics tracker.
///
/// Every [`ProbeFailureKind`] is initialized to zero on creation, so lookups never
/// miss. Successful probes are counted separately.
pub struct ProbeStats {
    failures: HashMap<ProbeFailureKind, AtomicUsize>,
    successes: AtomicUsize,
}

impl ProbeStats {
    pub fn new() -> Self {
        let mut failures = HashMap::new();
        for kind in ProbeFailureKind::iter() {
            failures.insert(kind, AtomicUsize::new(0));
        }

        ProbeStats {
            failures,
            successes: AtomicUsize::new(0),
        }
    }

    /// Increment a failure counter.
    pub fn increment_failure(&self, kind: ProbeFailureKind) {
        if let Some(counter) = self.failures.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment failure counter for {:?} which is not in the map. \
                 This indicates a bug in ProbeStats initialization.",
                kind
            );
        }
    }

    /// Increment the success counter.
    pub fn increment_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_failure_count(&self, kind: ProbeFailureKind) -> usize {
        self.failures
            .get(&kind)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn success_count(&self) -> usize {
        self.successes.load(Ordering::Relaxed)
    }

    pub fn total_failures(&self) -> usize {
        self.failures
            .values()
            .map(|c| c.load(Ordering::Relaxed))
            .sum()
    }

    /// Non-zero failure counts, in declaration order of [`ProbeFailureKind`].
    pub fn failure_summary(&self) -> Vec<(ProbeFailureKind, usize)> {
        ProbeFailureKind::iter()
            .map(|kind| (kind, self.get_failure_count(kind)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    /// Logs the failure summary at info level.
    pub fn log_summary(&self) {
        log::info!(
            "Probe statistics: {} succeeded, {} failed",
            self.success_count(),
            self.total_failures()
        );
        for (kind, count) in self.failure_summary() {
            log::info!("   {}: {}", kind, count);
        }
    }
}

impl Default for ProbeStats {
    fn default() -> Self {
        Self::new()
    }
}
