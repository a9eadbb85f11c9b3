//! Vault wire types.
//!
//! Request/response JSON shapes are Vault's own and pass through largely
//! verbatim; only the wrappers the adapter actually consumes are typed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Vault KV v2 read response wrapper.
#[derive(Debug, Deserialize)]
pub struct KvResponse {
    /// The `data` envelope holding the secret and its metadata.
    pub data: KvData,
}

/// The `data` member of a KV v2 read response.
#[derive(Debug, Deserialize)]
pub struct KvData {
    /// The stored key-value map.
    pub data: Map<String, Value>,
    /// Version metadata for the returned secret.
    pub metadata: KvMetadata,
}

/// KV v2 version metadata.
#[derive(Debug, Deserialize)]
pub struct KvMetadata {
    /// RFC 3339 creation timestamp.
    pub created_time: String,
    /// RFC 3339 soft-deletion timestamp, empty while the version is live.
    #[serde(default)]
    pub deletion_time: String,
    /// Whether the version data has been destroyed.
    #[serde(default)]
    pub destroyed: bool,
    /// Monotonic version number.
    pub version: u32,
}

/// Vault LIST response wrapper (`?list=true`).
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    /// The `data` envelope holding the key listing.
    pub data: ListData,
}

/// The `data` member of a LIST response.
#[derive(Debug, Deserialize)]
pub struct ListData {
    /// Keys in backend order; directory entries keep their trailing slash.
    pub keys: Vec<String>,
}

/// A secret as handed to the adapter: the stored map plus its version.
///
/// The backend owns the secret; this value is never cached.
#[derive(Debug, Clone, Serialize)]
pub struct KvSecret {
    /// The stored key-value map.
    pub data: Map<String, Value>,
    /// KV v2 version of the returned secret.
    pub version: u32,
}
