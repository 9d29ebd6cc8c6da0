//! Process-wide initialization.
//!
//! The library itself needs none of this; the binary (and embedding
//! applications that want the same setup) call these once at start-up.

mod logger;

use rustls::crypto::{ring::default_provider, CryptoProvider};

pub use logger::init_logger_with;

/// Initializes the crypto provider for TLS operations.
///
/// Installs `ring` as the process-wide `rustls` provider. Must run before
/// other code installs a different one; TLS connections made by this crate
/// fall back to `ring` either way.
pub fn init_crypto_provider() {
    // Already installed is fine.
    let _ = CryptoProvider::install_default(default_provider());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_crypto_provider_is_idempotent() {
        init_crypto_provider();
        init_crypto_provider();
        assert!(CryptoProvider::get_default().is_some());
    }
}
