//! Capability interface over the secret store backend.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::api::KvSecret;
use crate::error::VaultResult;

/// The backend operations the adapter needs, and nothing more.
///
/// [`crate::VaultClient`] implements this against a live Vault; integration
/// tests substitute an in-memory double without touching the dispatcher.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Write a secret at `secret/data/{path}`, returning the backend's write
    /// result (version metadata) verbatim.
    async fn write(&self, path: &str, data: &Map<String, Value>) -> VaultResult<Value>;

    /// Read the current version of the secret at `secret/data/{path}`.
    async fn read(&self, path: &str) -> VaultResult<KvSecret>;

    /// Soft-delete the latest version at `secret/data/{path}`. Prior versions
    /// remain recoverable until explicitly destroyed.
    async fn delete(&self, path: &str) -> VaultResult<()>;

    /// List keys under `secret/metadata/{path}`, in backend order.
    async fn list(&self, path: &str) -> VaultResult<Vec<String>>;

    /// Create or overwrite the named ACL policy.
    async fn add_policy(&self, name: &str, rules: &str) -> VaultResult<()>;

    /// List ACL policy names, in backend order.
    async fn list_policies(&self) -> VaultResult<Vec<String>>;
}
