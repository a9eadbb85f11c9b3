//! Prompt generator.
//!
//! A single pure generator that turns a path and a comma-separated
//! capability list into a policy document. No backend call; the output is
//! advisory and never applied directly.

use serde_json::{Value, json};

use crate::protocol::{Prompt, PromptArgument};

/// Name of the policy prompt.
pub const GENERATE_POLICY: &str = "generate-policy";

/// Prompt definitions for `prompts/list`.
#[must_use]
pub fn all_prompts() -> Vec<Prompt> {
    vec![Prompt {
        name: GENERATE_POLICY.to_string(),
        description: "Generate a policy document granting capabilities on a secret path"
            .to_string(),
        arguments: vec![
            PromptArgument {
                name: "path".to_string(),
                description: "Secret path the policy applies to".to_string(),
                required: true,
            },
            PromptArgument {
                name: "capabilities".to_string(),
                description: "Comma-separated capabilities, e.g. read,list".to_string(),
                required: true,
            },
        ],
    }]
}

/// Render a policy document granting `capabilities` on `path`.
///
/// Splits on commas and trims each token, preserving order and duplicates.
/// Tokens are not checked against Vault's capability vocabulary.
#[must_use]
pub fn policy_document(path: &str, capabilities: &str) -> Value {
    let caps: Vec<&str> = capabilities
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();

    json!({
        "path": {
            path: {
                "capabilities": caps,
            }
        }
    })
}
