//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger
//! - DNS resolver bound to the configured nameserver
//! - Crypto provider for rustls
//! - Concurrency semaphore for probe tasks

mod logger;
mod resolver;

use std::sync::Arc;

use rustls::crypto::{ring::default_provider, CryptoProvider};
use tokio::sync::Semaphore;

// Re-export public API
pub use logger::init_logger_with;
pub use resolver::{init_resolver, parse_resolver_address};

/// Initializes a semaphore for controlling concurrency.
///
/// Each probe task holds one permit for the lifetime of its connection, so
/// `count` bounds the number of simultaneous handshakes.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count))
}

/// Initializes the crypto provider for TLS operations.
///
/// Installs the `ring` provider as the process default for `rustls`. The probe
/// builds its client configuration with an explicit provider as well, so this
/// only matters for code paths that rely on the process default.
pub fn init_crypto_provider() {
    // The return value is ignored because reinstalling the provider is harmless
    let _ = CryptoProvider::install_default(default_provider());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_semaphore_permits() {
        let semaphore = init_semaphore(2);
        let _a = semaphore.clone().acquire_owned().await.unwrap();
        let _b = semaphore.clone().acquire_owned().await.unwrap();
        assert_eq!(semaphore.available_permits(), 0);
        assert!(semaphore.clone().try_acquire_owned().is_err());
    }

    #[test]
    fn test_init_crypto_provider_is_idempotent() {
        init_crypto_provider();
        init_crypto_provider();
        assert!(CryptoProvider::get_default().is_some());
    }
}
