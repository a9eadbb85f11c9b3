//! Vault HTTP client.

use async_trait::async_trait;
use reqwest::{Client, Method};
use secrecy::ExposeSecret;
use serde_json::{Map, Value, json};
use tracing::{debug, instrument};

use crate::api::{KvResponse, KvSecret, ListResponse};
use crate::config::VaultConfig;
use crate::error::{VaultError, VaultResult};
use crate::store::SecretStore;

/// HTTP client for Vault's KV v2 and ACL policy endpoints.
///
/// Holds no state beyond the immutable configuration and the connection
/// pool; every call is a single request with a bounded timeout. Transient
/// backend errors surface to the caller, which decides whether to retry.
pub struct VaultClient {
    config: VaultConfig,
    http: Client,
}

impl VaultClient {
    /// Create a new Vault client.
    ///
    /// # Errors
    /// Returns [`VaultError::Http`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: VaultConfig) -> VaultResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(VaultError::Http)?;

        Ok(Self { config, http })
    }

    /// Issue one request against `/v1/{path}`, mapping HTTP statuses onto
    /// the error taxonomy. Returns `None` for bodyless (204) successes.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> VaultResult<Option<Value>> {
        let url = format!(
            "{}/v1/{}",
            self.config.addr.as_str().trim_end_matches('/'),
            path
        );

        let mut request = self
            .http
            .request(method, &url)
            .header("X-Vault-Token", self.config.token.expose_secret());

        if let Some(b) = body {
            request = request.json(&b);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                VaultError::Timeout
            } else {
                VaultError::unavailable(e.to_string())
            }
        })?;

        let status = response.status();
        match status.as_u16() {
            404 => return Err(VaultError::not_found(path)),
            403 => return Err(VaultError::PermissionDenied(path.to_string())),
            429 => return Err(VaultError::RateLimited),
            204 => return Ok(None),
            _ if !status.is_success() => {
                let text = response.text().await.unwrap_or_default();
                return Err(VaultError::unavailable(format!("Status {status}: {text}")));
            }
            _ => {}
        }

        let value = response.json().await.map_err(VaultError::Http)?;
        Ok(Some(value))
    }
}

#[async_trait]
impl SecretStore for VaultClient {
    #[instrument(skip(self, data), fields(path))]
    async fn write(&self, path: &str, data: &Map<String, Value>) -> VaultResult<Value> {
        debug!(path, "Writing secret");

        let body = json!({ "data": data });
        let response = self
            .request(Method::POST, &format!("secret/data/{path}"), Some(body))
            .await?;

        // KV v2 answers a write with version metadata under "data".
        Ok(response
            .and_then(|v| v.get("data").cloned())
            .unwrap_or(Value::Null))
    }

    #[instrument(skip(self), fields(path))]
    async fn read(&self, path: &str) -> VaultResult<KvSecret> {
        debug!(path, "Reading secret");

        let value = self
            .request(Method::GET, &format!("secret/data/{path}"), None)
            .await?
            .ok_or_else(|| VaultError::unavailable("empty read response"))?;

        let response: KvResponse = serde_json::from_value(value)?;
        Ok(KvSecret {
            data: response.data.data,
            version: response.data.metadata.version,
        })
    }

    #[instrument(skip(self), fields(path))]
    async fn delete(&self, path: &str) -> VaultResult<()> {
        debug!(path, "Deleting secret");

        self.request(Method::DELETE, &format!("secret/data/{path}"), None)
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(path))]
    async fn list(&self, path: &str) -> VaultResult<Vec<String>> {
        debug!(path, "Listing secrets");

        let endpoint = if path.is_empty() {
            "secret/metadata?list=true".to_string()
        } else {
            format!("secret/metadata/{path}?list=true")
        };

        let value = self
            .request(Method::GET, &endpoint, None)
            .await?
            .ok_or_else(|| VaultError::unavailable("empty list response"))?;

        let response: ListResponse = serde_json::from_value(value)?;
        Ok(response.data.keys)
    }

    #[instrument(skip(self, rules), fields(name))]
    async fn add_policy(&self, name: &str, rules: &str) -> VaultResult<()> {
        debug!(name, "Writing policy");

        let body = json!({ "policy": rules });
        self.request(Method::PUT, &format!("sys/policies/acl/{name}"), Some(body))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_policies(&self) -> VaultResult<Vec<String>> {
        debug!("Listing policies");

        let value = self
            .request(Method::GET, "sys/policies/acl?list=true", None)
            .await?
            .ok_or_else(|| VaultError::unavailable("empty policy list response"))?;

        let response: ListResponse = serde_json::from_value(value)?;
        Ok(response.data.keys)
    }
}
