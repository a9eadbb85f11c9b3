//! Command registry.
//!
//! Declares every invocable command: a namespaced name, a typed input
//! schema, and the handler discriminant the dispatcher routes on. The set is
//! fixed at construction and immutable for the life of the process.

use serde_json::{Value, json};

use crate::protocol::{InputSchema, Tool};

/// Handler discriminant for a registered command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Write a secret under the KV mount.
    SecretCreate,
    /// Read a secret's current version.
    SecretRead,
    /// Soft-delete a secret's latest version.
    SecretDelete,
    /// Create or overwrite an ACL policy.
    PolicyCreate,
}

/// One registered command: name, input contract, handler.
pub struct CommandDef {
    /// Namespaced command name; uniquely identifies one schema+handler pair.
    pub name: &'static str,
    /// What the command does, shown to the caller.
    pub description: &'static str,
    /// Handler discriminant.
    pub kind: CommandKind,
    /// Input contract the dispatcher enforces before any backend call.
    pub schema: InputSchema,
}

/// The immutable command set.
pub struct Registry {
    commands: Vec<CommandDef>,
}

fn command(
    name: &'static str,
    description: &'static str,
    kind: CommandKind,
    properties: Value,
    required: &[&str],
) -> CommandDef {
    let props = properties.as_object().cloned().unwrap_or_default();
    CommandDef {
        name,
        description,
        kind,
        schema: InputSchema {
            schema_type: "object".to_string(),
            properties: props,
            required: required.iter().map(ToString::to_string).collect(),
        },
    }
}

impl Registry {
    /// Build the command set.
    #[must_use]
    pub fn new() -> Self {
        let commands = vec![
            command(
                "secret/create",
                "Store a secret at the given path under the KV v2 mount. \
                 Overwrites create a new version; prior versions stay recoverable.",
                CommandKind::SecretCreate,
                json!({
                    "path": {"type": "string", "description": "Path under the KV mount, e.g. apps/demo"},
                    "data": {"type": "object", "description": "Key-value pairs to store"}
                }),
                &["path", "data"],
            ),
            command(
                "secret/read",
                "Read the current version of the secret at the given path.",
                CommandKind::SecretRead,
                json!({
                    "path": {"type": "string", "description": "Path under the KV mount"}
                }),
                &["path"],
            ),
            command(
                "secret/delete",
                "Soft-delete the latest version of the secret at the given path. \
                 Prior versions remain recoverable until destroyed.",
                CommandKind::SecretDelete,
                json!({
                    "path": {"type": "string", "description": "Path under the KV mount"}
                }),
                &["path"],
            ),
            command(
                "policy/create",
                "Create or overwrite a named ACL policy from HCL rule text.",
                CommandKind::PolicyCreate,
                json!({
                    "name": {"type": "string", "description": "Policy name"},
                    "policy": {"type": "string", "description": "HCL policy rules"}
                }),
                &["name", "policy"],
            ),
        ];

        Self { commands }
    }

    /// Resolve a command by exact name match.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&CommandDef> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Tool definitions for `tools/list`.
    #[must_use]
    pub fn tools(&self) -> Vec<Tool> {
        self.commands
            .iter()
            .map(|c| Tool {
                name: c.name.to_string(),
                description: c.description.to_string(),
                input_schema: c.schema.clone(),
            })
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
