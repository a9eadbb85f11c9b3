//! Startup configuration with validation.
//!
//! Connection parameters are validated exactly once; the resulting [`Config`]
//! is immutable and passed by ownership into the client constructor. Nothing
//! else in the process reads the environment.

use secrecy::SecretString;
use std::env;
use std::fmt;
use thiserror::Error;
use url::Url;

const DEFAULT_PORT: u16 = 3000;

/// Prefixes Vault issues tokens under: service, batch, and legacy tokens.
const TOKEN_PREFIXES: &[&str] = &["hvs.", "hvb.", "s."];

/// A single violated configuration field.
#[derive(Error, Debug)]
pub enum ConfigViolation {
    /// VAULT_ADDR was absent or empty
    #[error("VAULT_ADDR is required")]
    MissingAddr,

    /// VAULT_ADDR was not a well-formed URL
    #[error("Invalid URL for VAULT_ADDR: {reason}")]
    InvalidAddr {
        /// Parser diagnostic
        reason: String,
    },

    /// VAULT_TOKEN was absent or empty
    #[error("VAULT_TOKEN is required")]
    MissingToken,

    /// VAULT_TOKEN did not carry a Vault token prefix
    #[error("VAULT_TOKEN must start with one of: hvs., hvb., s.")]
    MalformedToken,

    /// MCP_PORT was not an integer in [1, 65535]
    #[error("Invalid MCP_PORT {value:?}: must be an integer between 1 and 65535")]
    InvalidPort {
        /// The rejected raw value
        value: String,
    },
}

/// Startup configuration failure.
///
/// Carries every violated field in one report so a misconfigured deployment
/// can be fixed in a single pass.
#[derive(Debug)]
pub struct ConfigError {
    violations: Vec<ConfigViolation>,
}

impl ConfigError {
    /// The individual violations, in field order.
    #[must_use]
    pub fn violations(&self) -> &[ConfigViolation] {
        &self.violations
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "invalid configuration: {joined}")
    }
}

impl std::error::Error for ConfigError {}

/// Immutable adapter configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Vault server base URL
    pub vault_addr: Url,
    /// Vault client token
    pub vault_token: SecretString,
    /// Listen port for TCP-binding transports; the stdio transport ignores it
    pub port: u16,
}

impl Config {
    /// Loads configuration from the environment with validation.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] enumerating every violated field.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let addr = env::var("VAULT_ADDR").ok();
        let token = env::var("VAULT_TOKEN").ok();
        let port = env::var("MCP_PORT").ok();

        Self::validate(addr.as_deref(), token.as_deref(), port.as_deref())
    }

    /// Validates the three raw inputs, reporting every violation at once.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] enumerating every violated field.
    pub fn validate(
        addr: Option<&str>,
        token: Option<&str>,
        port: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut violations = Vec::new();

        let vault_addr = match addr {
            None | Some("") => {
                violations.push(ConfigViolation::MissingAddr);
                None
            }
            Some(raw) => match Url::parse(raw) {
                Ok(url) => Some(url),
                Err(e) => {
                    violations.push(ConfigViolation::InvalidAddr {
                        reason: e.to_string(),
                    });
                    None
                }
            },
        };

        let vault_token = match token {
            None | Some("") => {
                violations.push(ConfigViolation::MissingToken);
                None
            }
            Some(raw) if !TOKEN_PREFIXES.iter().any(|p| raw.starts_with(p)) => {
                violations.push(ConfigViolation::MalformedToken);
                None
            }
            Some(raw) => Some(SecretString::from(raw.to_string())),
        };

        let port = match port {
            None | Some("") => Some(DEFAULT_PORT),
            Some(raw) => match raw.parse::<u16>() {
                Ok(p) if p >= 1 => Some(p),
                _ => {
                    violations.push(ConfigViolation::InvalidPort {
                        value: raw.to_string(),
                    });
                    None
                }
            },
        };

        match (vault_addr, vault_token, port) {
            (Some(vault_addr), Some(vault_token), Some(port)) if violations.is_empty() => {
                Ok(Self {
                    vault_addr,
                    vault_token,
                    port,
                })
            }
            _ => Err(ConfigError { violations }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_triple() {
        let config = Config::validate(
            Some("http://127.0.0.1:8200"),
            Some("hvs.abc123"),
            Some("4100"),
        )
        .expect("valid configuration");

        assert_eq!(config.vault_addr.as_str(), "http://127.0.0.1:8200/");
        assert_eq!(config.port, 4100);
    }

    #[test]
    fn port_defaults_when_absent() {
        let config = Config::validate(Some("http://127.0.0.1:8200"), Some("hvs.abc123"), None)
            .expect("valid configuration");

        assert_eq!(config.port, 3000);
    }

    #[test]
    fn legacy_token_prefix_accepted() {
        let result = Config::validate(Some("http://127.0.0.1:8200"), Some("s.abc123"), None);
        assert!(result.is_ok());
    }

    #[test]
    fn reports_every_violation_not_just_the_first() {
        let err = Config::validate(Some("not a url"), Some("plain-token"), Some("0"))
            .expect_err("three violations");

        assert_eq!(err.violations().len(), 3);
        assert!(matches!(
            err.violations()[0],
            ConfigViolation::InvalidAddr { .. }
        ));
        assert!(matches!(err.violations()[1], ConfigViolation::MalformedToken));
        assert!(matches!(
            err.violations()[2],
            ConfigViolation::InvalidPort { .. }
        ));
    }

    #[test]
    fn missing_required_fields_reported_together() {
        let err = Config::validate(None, None, None).expect_err("two violations");

        assert_eq!(err.violations().len(), 2);
        let rendered = err.to_string();
        assert!(rendered.contains("VAULT_ADDR"));
        assert!(rendered.contains("VAULT_TOKEN"));
    }

    #[test]
    fn port_out_of_range_rejected() {
        let err = Config::validate(Some("http://127.0.0.1:8200"), Some("hvs.abc"), Some("70000"))
            .expect_err("port overflow");

        assert!(matches!(
            err.violations()[0],
            ConfigViolation::InvalidPort { .. }
        ));
    }

    #[test]
    fn token_never_appears_in_debug_output() {
        let config = Config::validate(
            Some("http://127.0.0.1:8200"),
            Some("hvs.super-secret"),
            None,
        )
        .expect("valid configuration");

        let debug = format!("{config:?}");
        assert!(!debug.contains("hvs.super-secret"));
    }
}
