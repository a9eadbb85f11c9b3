//! Vault MCP server entry point.
//!
//! Validates configuration once, builds the Vault client and the stdio
//! server, and runs until the client disconnects. Exit code 0 on normal
//! shutdown; 1 on invalid configuration or any unrecoverable startup
//! failure.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vault_mcp_client::{VaultClient, VaultConfig};

use vault_mcp::McpServer;
use vault_mcp::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Log to stderr; stdout carries the MCP protocol.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    };

    info!(
        addr = %config.vault_addr,
        port = config.port,
        "Starting Vault MCP server"
    );

    let vault_config = VaultConfig::new(config.vault_addr.clone(), config.vault_token.clone());
    let client = match VaultClient::new(vault_config) {
        Ok(client) => client,
        Err(err) => {
            error!("Failed to build Vault client: {err}");
            std::process::exit(1);
        }
    };

    let mut server = McpServer::new(Arc::new(client));
    server.run().await?;

    info!("Vault MCP server stopped");
    Ok(())
}
