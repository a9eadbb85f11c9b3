//! HashiCorp Vault client for the Vault MCP adapter.
//!
//! Provides a typed KV v2 and ACL policy client behind the [`SecretStore`]
//! capability trait, so callers can substitute a test double without touching
//! the dispatch layer.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod store;

pub use client::VaultClient;
pub use config::VaultConfig;
pub use error::{VaultError, VaultResult};
pub use store::SecretStore;
