//! Broker configuration.
//!
//! Configuration is loaded from environment variables once at startup and
//! passed into the resolver at construction, so resolution behavior is
//! reproducible in tests without environment mutation. Secret-bearing
//! fields are redacted in Debug output.

use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default per-attempt issuer request timeout in seconds.
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 10;

/// Default broker instance ID prefix.
pub const DEFAULT_BROKER_ID_PREFIX: &str = "broker";

/// Documented placeholder for an unset production issuer URL.
///
/// Templated `.env` files ship with this literal; a value equal to it is
/// treated the same as an unset variable so a half-filled template does
/// not send token requests to a placeholder host.
pub const ISSUER_URL_PLACEHOLDER: &str = "<your-token-issuer-url>";

/// Broker configuration.
///
/// Loaded from environment variables with sensible defaults. The token
/// and sandbox identifier are redacted in Debug output to prevent
/// credential leakage.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// URL of the operator's own token issuer, if one is configured.
    /// The placeholder literal and the empty string both mean "absent".
    pub token_issuer_url: Option<String>,

    /// Statically provisioned media server URL for the offline/dev path.
    pub hardcoded_server_url: Option<String>,

    /// Statically provisioned token paired with `hardcoded_server_url`.
    pub hardcoded_token: Option<String>,

    /// Opaque identifier authorizing this broker to the cloud sandbox
    /// issuer. No secret key is involved; the identifier itself is the
    /// authorization.
    pub sandbox_id: Option<String>,

    /// Per-attempt issuer request timeout in seconds (default: 10).
    pub source_timeout_secs: u64,

    /// Unique identifier for this broker instance. Used for logging and
    /// debugging.
    pub broker_id: String,
}

/// Custom Debug implementation that redacts sensitive fields.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("token_issuer_url", &self.token_issuer_url)
            .field("hardcoded_server_url", &self.hardcoded_server_url)
            .field(
                "hardcoded_token",
                &self.hardcoded_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("sandbox_id", &self.sandbox_id.as_ref().map(|_| "[REDACTED]"))
            .field("source_timeout_secs", &self.source_timeout_secs)
            .field("broker_id", &self.broker_id)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid source timeout configuration: {0}")]
    InvalidSourceTimeout(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = optional(vars, "BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        // The placeholder literal from a templated .env means "not configured".
        let token_issuer_url =
            optional(vars, "TOKEN_ISSUER_URL").filter(|url| url != ISSUER_URL_PLACEHOLDER);

        let hardcoded_server_url = optional(vars, "HARDCODED_SERVER_URL");
        let hardcoded_token = optional(vars, "HARDCODED_TOKEN");
        let sandbox_id = optional(vars, "SANDBOX_ID");

        // Parse per-attempt timeout with validation
        let source_timeout_secs = if let Some(value_str) = vars.get("SOURCE_TIMEOUT_SECS") {
            let value: u64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidSourceTimeout(format!(
                    "SOURCE_TIMEOUT_SECS must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidSourceTimeout(
                    "SOURCE_TIMEOUT_SECS must be greater than 0".to_string(),
                ));
            }

            value
        } else {
            DEFAULT_SOURCE_TIMEOUT_SECS
        };

        // Generate broker instance ID
        let broker_id = optional(vars, "BROKER_ID").unwrap_or_else(|| {
            // Generate a unique ID based on hostname and UUID suffix
            let hostname = std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string());
            let uuid_suffix = uuid::Uuid::new_v4().to_string();
            let short_suffix = uuid_suffix.get(..8).unwrap_or("00000000");
            format!("{}-{}-{}", DEFAULT_BROKER_ID_PREFIX, hostname, short_suffix)
        });

        Ok(Config {
            bind_address,
            token_issuer_url,
            hardcoded_server_url,
            hardcoded_token,
            sandbox_id,
            source_timeout_secs,
            broker_id,
        })
    }
}

/// Read an optional variable, stripping one surrounding pair of matching
/// quotes. Values that are empty after stripping count as absent, so
/// `FOO=""` in a dotenv file behaves like an unset variable.
fn optional(vars: &HashMap<String, String>, key: &str) -> Option<String> {
    let raw = vars.get(key)?;
    let stripped = strip_quotes(raw.trim());
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

/// Strip a single surrounding pair of matching single or double quotes.
fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes.first();
        let last = bytes.last();
        if (first == Some(&b'"') && last == Some(&b'"'))
            || (first == Some(&b'\'') && last == Some(&b'\''))
        {
            return value.get(1..value.len() - 1).unwrap_or(value);
        }
    }
    value
}
