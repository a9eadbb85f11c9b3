//! MCP server.
//!
//! Speaks JSON-RPC 2.0 over stdio: line-delimited requests on stdin,
//! responses on stdout, logs on stderr. Per-invocation command failures stay
//! in-band as `isError` envelopes; only protocol-level problems become
//! JSON-RPC errors.

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};
use vault_mcp_client::SecretStore;

use crate::dispatch::Dispatcher;
use crate::prompts::{GENERATE_POLICY, all_prompts, policy_document};
use crate::protocol::{
    CallToolParams, GetPromptParams, GetPromptResult, INTERNAL_ERROR, INVALID_PARAMS,
    InitializeResult, JsonRpcRequest, JsonRpcResponse, ListPromptsResult, ListResourcesResult,
    ListToolsResult, METHOD_NOT_FOUND, PARSE_ERROR, PromptMessage, PromptsCapability,
    ReadResourceParams, ReadResourceResult, ResourcesCapability, ServerCapabilities, ServerInfo,
    TextContent, TextResourceContents, ToolsCapability,
};
use crate::resources::Catalog;

/// MCP server over stdio.
pub struct McpServer {
    dispatcher: Dispatcher,
    catalog: Catalog,
    initialized: bool,
}

impl McpServer {
    /// Build the server over the given backend handle.
    #[must_use]
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self {
            dispatcher: Dispatcher::new(Arc::clone(&store)),
            catalog: Catalog::new(store),
            initialized: false,
        }
    }

    /// Run the server until the client disconnects (EOF on stdin).
    ///
    /// # Errors
    /// Only I/O failures on the stdio channel escape; everything else is
    /// answered in-band.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let mut reader = BufReader::new(stdin);

        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            if bytes_read == 0 {
                info!("Client disconnected");
                break;
            }

            let message = line.trim();
            if message.is_empty() {
                continue;
            }

            if let Some(response) = self.handle_message(message).await {
                let rendered = serde_json::to_string(&response)?;
                debug!("Sending: {}", rendered);
                stdout.write_all(rendered.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
        }

        Ok(())
    }

    /// Handle a single JSON-RPC message; notifications yield no response.
    async fn handle_message(&mut self, message: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(message) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                return Some(JsonRpcResponse::error(
                    None,
                    PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };

        let id = request.id.clone();

        if id.is_none() {
            self.handle_notification(&request.method);
            return None;
        }

        if !self.initialized && request.method != "initialize" {
            debug!("Request received before initialization handshake completed");
        }

        match self.handle_request(&request.method, request.params).await {
            Ok(value) => Some(JsonRpcResponse::success(id, value)),
            Err((code, message)) => Some(JsonRpcResponse::error(id, code, message)),
        }
    }

    fn handle_notification(&mut self, method: &str) {
        match method {
            "notifications/initialized" => {
                info!("Client initialized");
                self.initialized = true;
            }
            "notifications/cancelled" => {
                debug!("Request cancelled");
            }
            _ => {
                debug!("Unknown notification: {}", method);
            }
        }
    }

    async fn handle_request(
        &mut self,
        method: &str,
        params: Option<Value>,
    ) -> Result<Value, (i32, String)> {
        match method {
            "initialize" => self.handle_initialize(),
            "tools/list" => self.handle_list_tools(),
            "tools/call" => self.handle_call_tool(params).await,
            "resources/list" => self.handle_list_resources(),
            "resources/read" => self.handle_read_resource(params).await,
            "prompts/list" => self.handle_list_prompts(),
            "prompts/get" => self.handle_get_prompt(params),
            "ping" => Ok(json!({})),
            _ => {
                warn!("Unknown method: {}", method);
                Err((METHOD_NOT_FOUND, format!("Method not found: {method}")))
            }
        }
    }

    fn handle_initialize(&mut self) -> Result<Value, (i32, String)> {
        info!("Initializing MCP server");

        let result = InitializeResult {
            protocol_version: "2024-11-05".to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {},
                resources: ResourcesCapability { subscribe: false },
                prompts: PromptsCapability {},
            },
            server_info: ServerInfo {
                name: "vault-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        to_result(&result)
    }

    fn handle_list_tools(&self) -> Result<Value, (i32, String)> {
        let result = ListToolsResult {
            tools: self.dispatcher.registry().tools(),
        };
        to_result(&result)
    }

    async fn handle_call_tool(&self, params: Option<Value>) -> Result<Value, (i32, String)> {
        let params: CallToolParams = parse_params(params)?;

        info!("Calling command: {}", params.name);
        let result = self
            .dispatcher
            .dispatch_tool(&params.name, &params.arguments)
            .await;

        to_result(&result)
    }

    fn handle_list_resources(&self) -> Result<Value, (i32, String)> {
        let result = ListResourcesResult {
            resources: self.catalog.resources(),
        };
        to_result(&result)
    }

    async fn handle_read_resource(&self, params: Option<Value>) -> Result<Value, (i32, String)> {
        let params: ReadResourceParams = parse_params(params)?;

        match self.catalog.read(&params.uri).await {
            Ok(Some(text)) => to_result(&ReadResourceResult {
                contents: vec![TextResourceContents {
                    uri: params.uri,
                    mime_type: "application/json".to_string(),
                    text,
                }],
            }),
            Ok(None) => Err((INVALID_PARAMS, format!("Unknown resource: {}", params.uri))),
            // Policy-listing failures propagate to the caller unchanged.
            Err(e) => Err((INTERNAL_ERROR, e.to_string())),
        }
    }

    fn handle_list_prompts(&self) -> Result<Value, (i32, String)> {
        let result = ListPromptsResult {
            prompts: all_prompts(),
        };
        to_result(&result)
    }

    fn handle_get_prompt(&self, params: Option<Value>) -> Result<Value, (i32, String)> {
        let params: GetPromptParams = parse_params(params)?;

        if params.name != GENERATE_POLICY {
            return Err((INVALID_PARAMS, format!("Unknown prompt: {}", params.name)));
        }

        let path = params
            .arguments
            .get("path")
            .ok_or_else(|| (INVALID_PARAMS, "Missing argument: path".to_string()))?;
        let capabilities = params
            .arguments
            .get("capabilities")
            .ok_or_else(|| (INVALID_PARAMS, "Missing argument: capabilities".to_string()))?;

        let document = policy_document(path, capabilities);
        let rendered = serde_json::to_string_pretty(&document)
            .map_err(|e| (INTERNAL_ERROR, format!("Serialization error: {e}")))?;

        to_result(&GetPromptResult {
            description: format!("Policy document for {path}"),
            messages: vec![PromptMessage {
                role: "user".to_string(),
                content: TextContent::new(rendered),
            }],
        })
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(
    params: Option<Value>,
) -> Result<T, (i32, String)> {
    match params {
        Some(p) => {
            serde_json::from_value(p).map_err(|e| (INVALID_PARAMS, format!("Invalid params: {e}")))
        }
        None => Err((INVALID_PARAMS, "Missing params".to_string())),
    }
}

fn to_result<T: serde::Serialize>(value: &T) -> Result<Value, (i32, String)> {
    serde_json::to_value(value).map_err(|e| (INTERNAL_ERROR, format!("Serialization error: {e}")))
}
