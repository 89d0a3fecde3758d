//! Cloud sandbox issuer HTTP client.
//!
//! Last resort in the chain: a shared, rate-limited convenience issuer
//! not meant for production traffic. The endpoint URL is fixed. Requests
//! carry the room and participant as query parameters (no JSON body) and
//! authenticate with an `X-Sandbox-ID` header - the opaque identifier is
//! itself the authorization, no secret key is involved.

use super::{read_connection_details, CredentialSource};
use crate::errors::SourceError;
use crate::models::ConnectionDetails;
use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

/// Fixed sandbox issuer endpoint. Not operator-overridable.
pub const SANDBOX_ISSUER_URL: &str =
    "https://cloud-api.livekit.io/api/sandbox/connection-details";

/// Header carrying the opaque sandbox identifier.
const SANDBOX_ID_HEADER: &str = "X-Sandbox-ID";

/// Credential source backed by the fixed cloud sandbox issuer.
pub struct SandboxSource {
    /// Opaque identifier authorizing this broker, absent when not
    /// configured.
    sandbox_id: Option<String>,

    /// HTTP client with configured timeouts, shared across sources.
    client: Client,

    /// Issuer endpoint. Always `SANDBOX_ISSUER_URL` outside of tests.
    issuer_url: String,
}

impl SandboxSource {
    /// Create a sandbox source. An absent `sandbox_id` makes every
    /// `issue` call an `Unconfigured` skip.
    pub fn new(sandbox_id: Option<String>, client: Client) -> Self {
        Self {
            sandbox_id,
            client,
            issuer_url: SANDBOX_ISSUER_URL.to_string(),
        }
    }

    /// Test-only constructor pointing the source at a mock issuer.
    #[cfg(test)]
    pub(crate) fn with_issuer_url(
        sandbox_id: Option<String>,
        client: Client,
        issuer_url: String,
    ) -> Self {
        Self {
            sandbox_id,
            client,
            issuer_url,
        }
    }
}

#[async_trait]
impl CredentialSource for SandboxSource {
    fn name(&self) -> &'static str {
        "sandbox"
    }

    async fn issue(
        &self,
        room_name: &str,
        participant_name: &str,
    ) -> Result<ConnectionDetails, SourceError> {
        let sandbox_id = self
            .sandbox_id
            .as_deref()
            .ok_or(SourceError::Unconfigured)?;

        let response = self
            .client
            .post(&self.issuer_url)
            .query(&[
                ("roomName", room_name),
                ("participantName", participant_name),
            ])
            .header(SANDBOX_ID_HEADER, sandbox_id)
            .send()
            .await
            .map_err(|e| {
                warn!(target: "broker.sources", source = "sandbox", error = %e, "Issuer request failed");
                SourceError::Unreachable(e.to_string())
            })?;

        read_connection_details("sandbox", response).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client() -> Client {
        Client::builder()
            .timeout(std::time::Duration::from_secs(2))
            .build()
            .unwrap()
    }

    fn test_source(sandbox_id: Option<&str>, issuer_url: String) -> SandboxSource {
        SandboxSource::with_issuer_url(
            sandbox_id.map(str::to_string),
            test_client(),
            issuer_url,
        )
    }

    #[tokio::test]
    async fn test_unconfigured_source_skips() {
        let source = SandboxSource::new(None, test_client());

        let err = source.issue("standup", "alice").await.unwrap_err();
        assert!(matches!(err, SourceError::Unconfigured));
    }

    #[tokio::test]
    async fn test_request_uses_query_params_and_sandbox_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(query_param("roomName", "standup"))
            .and(query_param("participantName", "alice"))
            .and(header("X-Sandbox-ID", "sandbox-abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "serverUrl": "wss://sandbox.example.com",
                "roomName": "standup",
                "participantName": "alice",
                "participantToken": "aaa.bbb.ccc"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let source = test_source(Some("sandbox-abc123"), mock_server.uri());
        let details = source.issue("standup", "alice").await.unwrap();

        assert_eq!(details.server_url, "wss://sandbox.example.com");
        assert_eq!(details.participant_token, "aaa.bbb.ccc");
    }

    #[tokio::test]
    async fn test_rate_limited_sandbox_maps_to_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let source = test_source(Some("sandbox-abc123"), mock_server.uri());
        let err = source.issue("standup", "alice").await.unwrap_err();

        assert!(matches!(err, SourceError::Rejected { status: 429 }));
    }

    #[tokio::test]
    async fn test_malformed_body_maps_to_malformed_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "serverUrl": "wss://sandbox.example.com"
            })))
            .mount(&mock_server)
            .await;

        let source = test_source(Some("sandbox-abc123"), mock_server.uri());
        let err = source.issue("standup", "alice").await.unwrap_err();

        assert!(matches!(err, SourceError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_issuer_maps_to_unreachable() {
        let source = test_source(Some("sandbox-abc123"), "http://127.0.0.1:1".to_string());

        let err = source.issue("standup", "alice").await.unwrap_err();
        assert!(matches!(err, SourceError::Unreachable(_)));
    }
}
