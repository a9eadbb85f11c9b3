//! Dispatcher and resource-catalog tests against in-memory backend doubles.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use vault_mcp::Dispatcher;
use vault_mcp::error::DispatchError;
use vault_mcp::resources::{Catalog, POLICIES_URI, SECRETS_URI};
use vault_mcp_client::api::KvSecret;
use vault_mcp_client::{SecretStore, VaultError, VaultResult};

/// Backend double tracking every call it receives.
#[derive(Default)]
struct InMemoryStore {
    secrets: Mutex<BTreeMap<String, (Map<String, Value>, u32)>>,
    policies: Mutex<BTreeMap<String, String>>,
    calls: Mutex<Vec<&'static str>>,
}

impl InMemoryStore {
    fn record(&self, op: &'static str) {
        self.calls.lock().unwrap().push(op);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecretStore for InMemoryStore {
    async fn write(&self, path: &str, data: &Map<String, Value>) -> VaultResult<Value> {
        self.record("write");
        let mut secrets = self.secrets.lock().unwrap();
        let version = secrets.get(path).map_or(1, |(_, v)| v + 1);
        secrets.insert(path.to_string(), (data.clone(), version));
        Ok(json!({ "version": version }))
    }

    async fn read(&self, path: &str) -> VaultResult<KvSecret> {
        self.record("read");
        let secrets = self.secrets.lock().unwrap();
        secrets
            .get(path)
            .map(|(data, version)| KvSecret {
                data: data.clone(),
                version: *version,
            })
            .ok_or_else(|| VaultError::not_found(path))
    }

    async fn delete(&self, path: &str) -> VaultResult<()> {
        self.record("delete");
        // Vault's soft delete tolerates paths that were never written.
        self.secrets.lock().unwrap().remove(path);
        Ok(())
    }

    async fn list(&self, _path: &str) -> VaultResult<Vec<String>> {
        self.record("list");
        let secrets = self.secrets.lock().unwrap();
        if secrets.is_empty() {
            return Err(VaultError::not_found("secret/metadata"));
        }
        Ok(secrets.keys().cloned().collect())
    }

    async fn add_policy(&self, name: &str, rules: &str) -> VaultResult<()> {
        self.record("add_policy");
        self.policies
            .lock()
            .unwrap()
            .insert(name.to_string(), rules.to_string());
        Ok(())
    }

    async fn list_policies(&self) -> VaultResult<Vec<String>> {
        self.record("list_policies");
        Ok(self.policies.lock().unwrap().keys().cloned().collect())
    }
}

/// Backend double that fails every operation the same way.
struct FailingStore {
    not_found: bool,
}

impl FailingStore {
    const fn not_found() -> Self {
        Self { not_found: true }
    }

    const fn unavailable() -> Self {
        Self { not_found: false }
    }

    fn fail(&self) -> VaultError {
        if self.not_found {
            VaultError::not_found("secret/metadata")
        } else {
            VaultError::unavailable("connection refused")
        }
    }
}

#[async_trait]
impl SecretStore for FailingStore {
    async fn write(&self, _path: &str, _data: &Map<String, Value>) -> VaultResult<Value> {
        Err(self.fail())
    }

    async fn read(&self, _path: &str) -> VaultResult<KvSecret> {
        Err(self.fail())
    }

    async fn delete(&self, _path: &str) -> VaultResult<()> {
        Err(self.fail())
    }

    async fn list(&self, _path: &str) -> VaultResult<Vec<String>> {
        Err(self.fail())
    }

    async fn add_policy(&self, _name: &str, _rules: &str) -> VaultResult<()> {
        Err(self.fail())
    }

    async fn list_policies(&self) -> VaultResult<Vec<String>> {
        Err(self.fail())
    }
}

fn args(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

#[tokio::test]
async fn create_then_read_roundtrip() {
    let store = Arc::new(InMemoryStore::default());
    let dispatcher = Dispatcher::new(store);

    let created = dispatcher
        .dispatch(
            "secret/create",
            &args(json!({"path": "apps/demo", "data": {"k": "v"}})),
        )
        .await
        .expect("create");
    assert_eq!(created["status"], json!("created"));
    assert_eq!(created["result"]["version"], json!(1));

    let read = dispatcher
        .dispatch("secret/read", &args(json!({"path": "apps/demo"})))
        .await
        .expect("read");
    assert_eq!(read["data"]["k"], json!("v"));
    assert_eq!(read["version"], json!(1));
}

#[tokio::test]
async fn handler_invoked_exactly_once() {
    let store = Arc::new(InMemoryStore::default());
    let dispatcher = Dispatcher::new(Arc::clone(&store) as Arc<dyn SecretStore>);

    dispatcher
        .dispatch(
            "secret/create",
            &args(json!({"path": "apps/demo", "data": {}})),
        )
        .await
        .expect("create");

    assert_eq!(store.calls(), vec!["write"]);
}

#[tokio::test]
async fn delete_at_unwritten_path_confirms() {
    let store = Arc::new(InMemoryStore::default());
    let dispatcher = Dispatcher::new(store);

    let outcome = dispatcher
        .dispatch("secret/delete", &args(json!({"path": "apps/never-written"})))
        .await
        .expect("soft delete is tolerant");

    assert_eq!(outcome["status"], json!("deleted"));
}

#[tokio::test]
async fn read_at_unwritten_path_is_command_failure() {
    let store = Arc::new(InMemoryStore::default());
    let dispatcher = Dispatcher::new(store);

    let err = dispatcher
        .dispatch("secret/read", &args(json!({"path": "apps/ghost"})))
        .await
        .expect_err("missing secret");

    assert!(matches!(err, DispatchError::CommandFailure(_)));
    assert!(err.to_string().contains("apps/ghost"));
}

#[tokio::test]
async fn policy_create_then_listed() {
    let store = Arc::new(InMemoryStore::default());
    let dispatcher = Dispatcher::new(Arc::clone(&store) as Arc<dyn SecretStore>);
    let catalog = Catalog::new(store);

    dispatcher
        .dispatch(
            "policy/create",
            &args(json!({
                "name": "ro",
                "policy": "path \"secret/data/*\" { capabilities = [\"read\"] }"
            })),
        )
        .await
        .expect("policy create");

    let listing = catalog
        .read(POLICIES_URI)
        .await
        .expect("policy listing")
        .expect("known uri");
    assert!(listing.contains("ro"));
}

#[tokio::test]
async fn unknown_command_never_touches_backend() {
    let store = Arc::new(InMemoryStore::default());
    let dispatcher = Dispatcher::new(Arc::clone(&store) as Arc<dyn SecretStore>);

    let err = dispatcher
        .dispatch("secret/destroy", &args(json!({"path": "apps/demo"})))
        .await
        .expect_err("unregistered command");

    assert!(matches!(err, DispatchError::UnknownCommand(_)));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn invalid_payload_enumerates_all_violations() {
    let store = Arc::new(InMemoryStore::default());
    let dispatcher = Dispatcher::new(Arc::clone(&store) as Arc<dyn SecretStore>);

    let err = dispatcher
        .dispatch("secret/create", &args(json!({"data": "not-a-map"})))
        .await
        .expect_err("two violations");

    match err {
        DispatchError::InvalidPayload { violations } => {
            assert_eq!(violations.len(), 2);
        }
        other => panic!("expected InvalidPayload, got {other:?}"),
    }
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn backend_error_embeds_diagnostic() {
    let dispatcher = Dispatcher::new(Arc::new(FailingStore::unavailable()));

    let err = dispatcher
        .dispatch(
            "secret/create",
            &args(json!({"path": "apps/demo", "data": {}})),
        )
        .await
        .expect_err("backend down");

    assert!(matches!(err, DispatchError::CommandFailure(_)));
    assert!(err.to_string().contains("connection refused"));
}

#[tokio::test]
async fn dispatcher_survives_failed_invocations() {
    let store = Arc::new(InMemoryStore::default());
    let dispatcher = Dispatcher::new(store);

    // A bad command and a bad payload, then a valid invocation.
    let _ = dispatcher.dispatch("secret/destroy", &args(json!({}))).await;
    let _ = dispatcher.dispatch("secret/create", &args(json!({}))).await;

    dispatcher
        .dispatch(
            "secret/create",
            &args(json!({"path": "apps/demo", "data": {"k": "v"}})),
        )
        .await
        .expect("dispatcher still serves after failures");
}

#[tokio::test]
async fn envelope_marks_failures_in_band() {
    let dispatcher = Dispatcher::new(Arc::new(InMemoryStore::default()));

    let ok = dispatcher
        .dispatch_tool(
            "secret/create",
            &args(json!({"path": "apps/demo", "data": {}})),
        )
        .await;
    assert!(!ok.is_error);
    assert_eq!(ok.content.len(), 1);

    let err = dispatcher.dispatch_tool("secret/destroy", &args(json!({}))).await;
    assert!(err.is_error);
    assert!(err.content[0].text.contains("unknown command"));
}

#[tokio::test]
async fn secrets_listing_degrades_to_empty_on_not_found() {
    let catalog = Catalog::new(Arc::new(FailingStore::not_found()));

    let listing = catalog
        .read(SECRETS_URI)
        .await
        .expect("listing never fails")
        .expect("known uri");

    assert_eq!(listing, "[]");
}

#[tokio::test]
async fn secrets_listing_degrades_to_empty_on_unavailable() {
    let catalog = Catalog::new(Arc::new(FailingStore::unavailable()));

    let listing = catalog
        .read(SECRETS_URI)
        .await
        .expect("listing never fails")
        .expect("known uri");

    assert_eq!(listing, "[]");
}

#[tokio::test]
async fn policies_listing_propagates_backend_error() {
    let catalog = Catalog::new(Arc::new(FailingStore::unavailable()));

    let err = catalog
        .read(POLICIES_URI)
        .await
        .expect_err("policy listing must surface failures");

    assert!(err.to_string().contains("connection refused"));
}

#[tokio::test]
async fn unknown_resource_is_not_ours() {
    let catalog = Catalog::new(Arc::new(InMemoryStore::default()));

    let result = catalog.read("vault://leases").await.expect("no backend call");
    assert!(result.is_none());
}
