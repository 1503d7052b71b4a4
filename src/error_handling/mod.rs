//! Error handling and probe statistics.
//!
//! This module provides:
//! - Error type definitions for initialization, host parsing, resolution and probing
//! - Failure categorization for per-address probe errors
//! - Thread-safe probe statistics
//!
//! Only host parsing and resolution errors abort a run. Probe errors are
//! recorded per address and the run carries on.

mod stats;
mod types;

// Re-export public API
pub use stats::ProbeStats;
pub use types::{
    HostParseError, InitializationError, ProbeError, ProbeFailureKind, ResolutionError,
};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_probe_stats_initialization() {
        let stats = ProbeStats::new();
        for kind in ProbeFailureKind::iter() {
            assert_eq!(stats.get_failure_count(kind), 0);
        }
        assert_eq!(stats.success_count(), 0);
        assert!(stats.failure_summary().is_empty());
    }

    #[test]
    fn test_probe_stats_increment() {
        let stats = ProbeStats::new();
        stats.increment_failure(ProbeFailureKind::ConnectTimeout);
        stats.increment_failure(ProbeFailureKind::ConnectTimeout);
        stats.increment_failure(ProbeFailureKind::HandshakeError);
        stats.increment_success();

        assert_eq!(stats.get_failure_count(ProbeFailureKind::ConnectTimeout), 2);
        assert_eq!(stats.total_failures(), 3);
        assert_eq!(stats.success_count(), 1);
        assert_eq!(
            stats.failure_summary(),
            vec![
                (ProbeFailureKind::ConnectTimeout, 2),
                (ProbeFailureKind::HandshakeError, 1)
            ]
        );
    }

    #[test]
    fn test_probe_stats_concurrent_increments() {
        use std::sync::Arc;

        let stats = Arc::new(ProbeStats::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = Arc::clone(&stats);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        stats.increment_failure(ProbeFailureKind::ConnectError);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(stats.get_failure_count(ProbeFailureKind::ConnectError), 800);
    }
}
