//! Operation dispatcher.
//!
//! Routes one invocation at a time: resolve the name in the registry,
//! validate the payload against the command schema, invoke the handler,
//! normalize the outcome into the response envelope. Failures are isolated
//! per invocation; the registry and store handle are the only shared state
//! and both are read-only.

use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use vault_mcp_client::SecretStore;

use crate::error::DispatchError;
use crate::protocol::{InputSchema, ToolResult};
use crate::registry::{CommandKind, Registry};

/// Dispatches invocations against the registered command set.
pub struct Dispatcher {
    store: Arc<dyn SecretStore>,
    registry: Registry,
}

impl Dispatcher {
    /// Build a dispatcher over the given backend handle.
    #[must_use]
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self {
            store,
            registry: Registry::new(),
        }
    }

    /// The registered command set.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Dispatch one invocation and render it into the response envelope.
    ///
    /// All three per-invocation failure classes stay in-band as `isError`
    /// results; the process and later invocations are unaffected.
    pub async fn dispatch_tool(&self, name: &str, args: &Map<String, Value>) -> ToolResult {
        match self.dispatch(name, args).await {
            Ok(outcome) => ToolResult::success(render(&outcome)),
            Err(err) => ToolResult::error(err.to_string()),
        }
    }

    /// Dispatch one invocation, returning the raw structured outcome.
    ///
    /// # Errors
    /// `UnknownCommand` and `InvalidPayload` fail before the backend is
    /// touched; `CommandFailure` wraps a backend error verbatim.
    #[instrument(skip(self, args), fields(command = name, invocation_id = %Uuid::new_v4()))]
    pub async fn dispatch(
        &self,
        name: &str,
        args: &Map<String, Value>,
    ) -> Result<Value, DispatchError> {
        let Some(command) = self.registry.resolve(name) else {
            warn!("Unknown command");
            return Err(DispatchError::UnknownCommand(name.to_string()));
        };

        let violations = validate_payload(&command.schema, args);
        if !violations.is_empty() {
            warn!(count = violations.len(), "Payload rejected");
            return Err(DispatchError::InvalidPayload { violations });
        }

        let outcome = match command.kind {
            CommandKind::SecretCreate => self.secret_create(args).await?,
            CommandKind::SecretRead => self.secret_read(args).await?,
            CommandKind::SecretDelete => self.secret_delete(args).await?,
            CommandKind::PolicyCreate => self.policy_create(args).await?,
        };

        info!("Command completed");
        Ok(outcome)
    }

    async fn secret_create(&self, args: &Map<String, Value>) -> Result<Value, DispatchError> {
        let path = str_arg(args, "path");
        let data = obj_arg(args, "data");

        let result = self.store.write(path, &data).await?;
        Ok(json!({
            "status": "created",
            "path": path,
            "result": result,
        }))
    }

    async fn secret_read(&self, args: &Map<String, Value>) -> Result<Value, DispatchError> {
        let path = str_arg(args, "path");

        let secret = self.store.read(path).await?;
        Ok(json!({
            "path": path,
            "version": secret.version,
            "data": secret.data,
        }))
    }

    async fn secret_delete(&self, args: &Map<String, Value>) -> Result<Value, DispatchError> {
        let path = str_arg(args, "path");

        self.store.delete(path).await?;
        Ok(json!({
            "status": "deleted",
            "path": path,
        }))
    }

    async fn policy_create(&self, args: &Map<String, Value>) -> Result<Value, DispatchError> {
        let name = str_arg(args, "name");
        let policy = str_arg(args, "policy");

        self.store.add_policy(name, policy).await?;
        Ok(json!({
            "status": "created",
            "policy": name,
        }))
    }
}

/// Check a payload against a command schema, collecting every violation.
///
/// Required fields must be present; any declared field that is present must
/// match its declared type. Undeclared fields are tolerated.
#[must_use]
pub fn validate_payload(schema: &InputSchema, args: &Map<String, Value>) -> Vec<String> {
    let mut violations = Vec::new();

    for required in &schema.required {
        if !args.contains_key(required) {
            violations.push(format!("missing required field: {required}"));
        }
    }

    for (field, fragment) in &schema.properties {
        let Some(value) = args.get(field) else {
            continue;
        };
        let Some(expected) = fragment.get("type").and_then(Value::as_str) else {
            continue;
        };
        if !type_matches(expected, value) {
            violations.push(format!("field {field} must be of type {expected}"));
        }
    }

    violations
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "boolean" => value.is_boolean(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        _ => true,
    }
}

// Post-validation accessors: the schema has already guaranteed presence and
// type, so defaults here are unreachable.
fn str_arg<'a>(args: &'a Map<String, Value>, key: &str) -> &'a str {
    args.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn obj_arg(args: &Map<String, Value>, key: &str) -> Map<String, Value> {
    args.get(key)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

fn render(outcome: &Value) -> String {
    serde_json::to_string_pretty(outcome).unwrap_or_else(|_| outcome.to_string())
}
