//! Credential sources and the resolution policy that orders them.
//!
//! Each source is one way of obtaining connection details for a
//! (room, participant) pair. The resolver composes them into an ordered
//! fallback chain encoding a trust/cost gradient: the operator's own
//! issuer first, a statically provisioned escape hatch second, the shared
//! cloud sandbox last.
//!
//! # Components
//!
//! - `production` - HTTP client for the configured production issuer
//! - `static_source` - statically provisioned server URL + token pair
//! - `sandbox` - HTTP client for the fixed cloud sandbox issuer

pub mod production;
pub mod sandbox;
pub mod static_source;

pub use production::ProductionSource;
pub use sandbox::SandboxSource;
pub use static_source::StaticSource;

use crate::config::Config;
use crate::errors::{BrokerError, ResolveError, SourceError};
use crate::models::ConnectionDetails;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Connect timeout for issuer requests in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// A capability that can produce connection details for a join request.
///
/// Implementations hold only read-only configuration and a cloned HTTP
/// client, so a source is safe to call concurrently for different
/// requests.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Attempt to produce connection details for the pair.
    ///
    /// # Errors
    ///
    /// - `SourceError::Unconfigured` if the source has nothing to work
    ///   with and should be skipped
    /// - `SourceError::Unreachable` on transport failure or timeout
    /// - `SourceError::Rejected` on a non-2xx issuer response
    /// - `SourceError::MalformedResponse` if the body cannot be parsed
    async fn issue(
        &self,
        room_name: &str,
        participant_name: &str,
    ) -> Result<ConnectionDetails, SourceError>;
}

/// Ordered fallback chain over credential sources.
///
/// The chain is data, not control flow: sources are tried strictly in
/// order, the first success wins, and only the last source's failure is
/// surfaced to the caller. Intermediate failures are logged and
/// swallowed, so a misconfigured or down production issuer degrades
/// gracefully as long as a later source can still succeed.
pub struct CredentialResolver {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl CredentialResolver {
    /// Build a resolver over an explicit source chain, in policy order.
    pub fn new(sources: Vec<Box<dyn CredentialSource>>) -> Self {
        Self { sources }
    }

    /// Build the default production -> static -> sandbox chain from
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns `BrokerError::Internal` if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, BrokerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.source_timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                error!(target: "broker.sources", error = %e, "Failed to build HTTP client");
                BrokerError::Internal
            })?;

        Ok(Self::new(vec![
            Box::new(ProductionSource::new(
                config.token_issuer_url.clone(),
                client.clone(),
            )),
            Box::new(StaticSource::new(
                config.hardcoded_server_url.clone(),
                config.hardcoded_token.clone(),
            )),
            Box::new(SandboxSource::new(config.sandbox_id.clone(), client)),
        ]))
    }

    /// Resolve connection details for a (room, participant) pair.
    ///
    /// Tries each source in order and returns the first success. The
    /// room and participant names are forwarded to the issuers
    /// unvalidated; rejecting a blank room is the remote issuer's call.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::NoSourceAvailable` carrying the last
    /// source's failure once the chain is exhausted.
    pub async fn resolve(
        &self,
        room_name: &str,
        participant_name: &str,
    ) -> Result<ConnectionDetails, ResolveError> {
        let mut last = SourceError::Unconfigured;

        for source in &self.sources {
            match source.issue(room_name, participant_name).await {
                Ok(details) => {
                    info!(
                        target: "broker.resolve",
                        source = source.name(),
                        room = %room_name,
                        participant = %participant_name,
                        "Issued connection details"
                    );
                    return Ok(details);
                }
                // Unconfigured just means "skip" - no failure to record
                Err(SourceError::Unconfigured) => {
                    debug!(
                        target: "broker.resolve",
                        source = source.name(),
                        "Source not configured, skipping"
                    );
                    last = SourceError::Unconfigured;
                }
                Err(e) => {
                    warn!(
                        target: "broker.resolve",
                        source = source.name(),
                        error = %e,
                        "Source attempt failed, falling through"
                    );
                    last = e;
                }
            }
        }

        Err(ResolveError::NoSourceAvailable { last })
    }
}

/// Parse an issuer response shared by the production and sandbox sources.
///
/// Any status in [200, 300) is success; the body must decode into all
/// four connection-detail fields, and the endpoint URL and token must be
/// non-empty. The distinction between `Rejected` and `MalformedResponse`
/// is diagnostic only.
pub(crate) async fn read_connection_details(
    source: &'static str,
    response: reqwest::Response,
) -> Result<ConnectionDetails, SourceError> {
    let status = response.status();

    if !status.is_success() {
        warn!(
            target: "broker.sources",
            source,
            status = %status,
            "Issuer rejected token request"
        );
        return Err(SourceError::Rejected {
            status: status.as_u16(),
        });
    }

    let details: ConnectionDetails = response.json().await.map_err(|e| {
        warn!(target: "broker.sources", source, error = %e, "Failed to parse issuer response");
        SourceError::MalformedResponse(e.to_string())
    })?;

    if details.server_url.is_empty() || details.participant_token.is_empty() {
        return Err(SourceError::MalformedResponse(
            "issuer returned empty serverUrl or participantToken".to_string(),
        ));
    }

    Ok(details)
}
