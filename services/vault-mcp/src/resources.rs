//! Resource catalog.
//!
//! Two read-only, stably-addressed views of the backend. Listings render the
//! backend's key order as-is; nothing is re-sorted client-side.

use std::sync::Arc;

use tracing::debug;
use vault_mcp_client::{SecretStore, VaultError, VaultResult};

use crate::protocol::Resource;

/// Address of the secret-path listing.
pub const SECRETS_URI: &str = "vault://secrets";
/// Address of the policy listing.
pub const POLICIES_URI: &str = "vault://policies";

/// Read-only resource views over the backend.
pub struct Catalog {
    store: Arc<dyn SecretStore>,
}

impl Catalog {
    /// Build the catalog over the given backend handle.
    #[must_use]
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// Resource definitions for `resources/list`.
    #[must_use]
    pub fn resources(&self) -> Vec<Resource> {
        vec![
            Resource {
                uri: SECRETS_URI.to_string(),
                name: "Secret paths".to_string(),
                description: Some("Keys under the KV v2 metadata root".to_string()),
                mime_type: Some("application/json".to_string()),
            },
            Resource {
                uri: POLICIES_URI.to_string(),
                name: "ACL policies".to_string(),
                description: Some("Names of configured ACL policies".to_string()),
                mime_type: Some("application/json".to_string()),
            },
        ]
    }

    /// Read one resource by URI. `Ok(None)` means the URI is not ours.
    ///
    /// # Errors
    /// Only the policy listing can fail; see [`Self::policies_listing`].
    pub async fn read(&self, uri: &str) -> VaultResult<Option<String>> {
        match uri {
            SECRETS_URI => Ok(Some(self.secrets_listing().await)),
            POLICIES_URI => Ok(Some(self.policies_listing().await?)),
            _ => Ok(None),
        }
    }

    /// Secret-path listing under the KV metadata root.
    ///
    /// Degrades to an empty list on any backend error: Vault signals an
    /// empty root as not-found, and this fetch must never fail.
    async fn secrets_listing(&self) -> String {
        let keys = match self.store.list("").await {
            Ok(keys) => keys,
            Err(err) => {
                debug!(error = %err, "Secret listing degraded to empty");
                Vec::new()
            }
        };
        render_keys(&keys)
    }

    /// Policy listing. Backend errors propagate unchanged: a missing or
    /// failed policy list is operationally significant.
    async fn policies_listing(&self) -> Result<String, VaultError> {
        let names = self.store.list_policies().await?;
        Ok(render_keys(&names))
    }
}

fn render_keys(keys: &[String]) -> String {
    serde_json::to_string_pretty(keys).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_preserves_order() {
        let keys = vec!["b".to_string(), "a".to_string()];
        let rendered = render_keys(&keys);
        assert!(rendered.find('b') < rendered.find('a'));
    }

    #[test]
    fn render_of_empty_is_empty_array() {
        assert_eq!(render_keys(&[]), "[]");
    }
}
