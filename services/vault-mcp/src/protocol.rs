//! MCP protocol types.
//!
//! The Model Context Protocol frames messages as JSON-RPC 2.0; this module
//! holds the envelope types the server speaks, nothing more. Command
//! semantics live in the registry and dispatcher.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version marker, always "2.0".
    pub jsonrpc: String,
    /// Request id; absent for notifications.
    pub id: Option<Value>,
    /// Method name.
    pub method: String,
    /// Method parameters.
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version marker, always "2.0".
    pub jsonrpc: String,
    /// Id of the request being answered.
    pub id: Option<Value>,
    /// Result payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error payload on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Build a success response.
    #[must_use]
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Build an error response.
    #[must_use]
    pub fn error(id: Option<Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError { code, message }),
        }
    }
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Standard JSON-RPC error code.
    pub code: i32,
    /// Human-readable diagnostic.
    pub message: String,
}

/// Request could not be parsed as JSON.
pub const PARSE_ERROR: i32 = -32700;
/// Method is not part of the protocol surface.
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Params were missing or malformed.
pub const INVALID_PARAMS: i32 = -32602;
/// Server-side failure outside the in-band error envelope.
pub const INTERNAL_ERROR: i32 = -32603;

/// A command advertised through `tools/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// Namespaced command name, e.g. `secret/create`.
    pub name: String,
    /// What the command does.
    pub description: String,
    /// JSON Schema for the command payload.
    pub input_schema: InputSchema,
}

/// JSON Schema for a command payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSchema {
    /// Always "object".
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Per-field schema fragments keyed by field name.
    #[serde(default)]
    pub properties: serde_json::Map<String, Value>,
    /// Fields the payload must carry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

/// A single text content block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    /// Always "text".
    #[serde(rename = "type")]
    pub content_type: String,
    /// The rendered payload.
    pub text: String,
}

impl TextContent {
    /// Build a text content block.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            content_type: "text".to_string(),
            text: text.into(),
        }
    }
}

/// Response envelope for a command invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    /// A single text-bearing content block with the structured outcome.
    pub content: Vec<TextContent>,
    /// Whether the invocation failed; failures stay in-band.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    /// Wrap a successful outcome.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextContent::new(text)],
            is_error: false,
        }
    }

    /// Wrap a per-invocation failure.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextContent::new(text)],
            is_error: true,
        }
    }
}

/// A read-only resource advertised through `resources/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Stable resource address, e.g. `vault://secrets`.
    pub uri: String,
    /// Display name.
    pub name: String,
    /// What the resource exposes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// MIME type of the rendered contents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Contents of one resource read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextResourceContents {
    /// The resource address that was read.
    pub uri: String,
    /// MIME type of `text`.
    pub mime_type: String,
    /// Rendered contents.
    pub text: String,
}

/// A prompt advertised through `prompts/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    /// Prompt name.
    pub name: String,
    /// What the generated document is for.
    pub description: String,
    /// Declared arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<PromptArgument>,
}

/// One declared prompt argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptArgument {
    /// Argument name.
    pub name: String,
    /// What the argument means.
    pub description: String,
    /// Whether `prompts/get` must receive it.
    pub required: bool,
}

/// A generated prompt message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMessage {
    /// Message role, "user" for generated documents.
    pub role: String,
    /// Message body.
    pub content: TextContent,
}

/// Result of `prompts/get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPromptResult {
    /// What was generated.
    pub description: String,
    /// The generated messages.
    pub messages: Vec<PromptMessage>,
}

/// Server capability declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    /// Command surface.
    pub tools: ToolsCapability,
    /// Resource surface.
    pub resources: ResourcesCapability,
    /// Prompt surface.
    pub prompts: PromptsCapability,
}

/// Marker for the command surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsCapability {}

/// Resource surface options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesCapability {
    /// Change subscriptions are not offered.
    #[serde(default)]
    pub subscribe: bool,
}

/// Marker for the prompt surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptsCapability {}

/// Server identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

/// Result of `initialize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Protocol revision the server speaks.
    pub protocol_version: String,
    /// Declared capabilities.
    pub capabilities: ServerCapabilities,
    /// Server identity.
    pub server_info: ServerInfo,
}

/// Result of `tools/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResult {
    /// Every registered command.
    pub tools: Vec<Tool>,
}

/// Params of `tools/call`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolParams {
    /// Command name.
    pub name: String,
    /// Raw payload.
    #[serde(default)]
    pub arguments: serde_json::Map<String, Value>,
}

/// Result of `resources/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResourcesResult {
    /// Every addressable resource.
    pub resources: Vec<Resource>,
}

/// Params of `resources/read`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResourceParams {
    /// Resource address.
    pub uri: String,
}

/// Result of `resources/read`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResourceResult {
    /// Rendered contents.
    pub contents: Vec<TextResourceContents>,
}

/// Result of `prompts/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPromptsResult {
    /// Every prompt generator.
    pub prompts: Vec<Prompt>,
}

/// Params of `prompts/get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPromptParams {
    /// Prompt name.
    pub name: String,
    /// String-valued prompt arguments.
    #[serde(default)]
    pub arguments: HashMap<String, String>,
}
