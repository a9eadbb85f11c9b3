//! Vault client configuration.

use secrecy::SecretString;
use std::time::Duration;
use url::Url;

/// Vault client configuration.
///
/// Constructed once from validated startup configuration and owned by the
/// client for its whole lifetime. The token is held as a [`SecretString`] so
/// it never appears in Debug output.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Vault server base URL
    pub addr: Url,
    /// Vault client token
    pub token: SecretString,
    /// Per-call request timeout
    pub timeout: Duration,
}

impl VaultConfig {
    /// Create a new configuration with the default timeout.
    #[must_use]
    pub fn new(addr: Url, token: SecretString) -> Self {
        Self {
            addr,
            token,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the per-call request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
