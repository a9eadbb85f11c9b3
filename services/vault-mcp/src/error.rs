//! Adapter error taxonomy.
//!
//! Every variant here is per-invocation and recoverable: the dispatcher
//! converts it into a typed response inside the protocol envelope and the
//! process continues. Startup failures live in [`crate::config`].

use thiserror::Error;
use vault_mcp_client::VaultError;

/// Errors raised while dispatching a single invocation.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The invocation named a command that is not in the registry.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The payload violated the command's input schema.
    #[error("invalid payload: {}", violations.join("; "))]
    InvalidPayload {
        /// Every offending field, not just the first.
        violations: Vec<String>,
    },

    /// The backend rejected or failed the operation.
    #[error("command failed: {0}")]
    CommandFailure(#[from] VaultError),
}
