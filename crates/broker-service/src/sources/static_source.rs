//! Statically provisioned credential source.
//!
//! A pure configuration lookup for offline and dev use: no network call,
//! no side effects, no interesting failure surface. Viable only when
//! both the server URL and the token are configured; otherwise it is a
//! quiet fallthrough, never an error.

use super::CredentialSource;
use crate::errors::SourceError;
use crate::models::ConnectionDetails;
use async_trait::async_trait;

/// Credential source backed by a fixed server URL + token pair.
pub struct StaticSource {
    server_url: Option<String>,
    token: Option<String>,
}

impl StaticSource {
    /// Create a static source. Both values must be present for the
    /// source to be viable.
    pub fn new(server_url: Option<String>, token: Option<String>) -> Self {
        Self { server_url, token }
    }
}

#[async_trait]
impl CredentialSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn issue(
        &self,
        room_name: &str,
        participant_name: &str,
    ) -> Result<ConnectionDetails, SourceError> {
        match (self.server_url.as_ref(), self.token.as_ref()) {
            (Some(server_url), Some(token)) => Ok(ConnectionDetails {
                server_url: server_url.clone(),
                // Unlike the issuer-backed sources, the static path echoes
                // the request's names - there is no issuer to rewrite them.
                room_name: room_name.to_string(),
                participant_name: participant_name.to_string(),
                participant_token: token.clone(),
            }),
            _ => Err(SourceError::Unconfigured),
        }
    }
}
