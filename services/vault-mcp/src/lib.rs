//! Vault MCP Service
//!
//! Exposes the platform Vault (KV v2 secrets and ACL policies) to AI agents
//! via the Model Context Protocol: schema-validated commands, read-only
//! resources, and a policy prompt generator, served over stdio as
//! JSON-RPC 2.0.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod prompts;
pub mod protocol;
pub mod registry;
pub mod resources;
pub mod server;

pub use config::Config;
pub use dispatch::Dispatcher;
pub use server::McpServer;
