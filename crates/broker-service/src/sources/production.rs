//! Production issuer HTTP client.
//!
//! Calls the operator's own token endpoint: `POST {issuer_url}/token`
//! with a JSON body carrying the room and participant names. Preferred
//! over every other source because the operator controls it end to end.
//!
//! # Security
//!
//! - The broker holds no signing secrets; the remote issuer does the minting
//! - Timeouts prevent hanging connections
//! - Errors are logged server-side; the resolver decides what callers see

use super::{read_connection_details, CredentialSource};
use crate::errors::SourceError;
use crate::models::{ConnectionDetails, TokenRequest};
use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

/// Credential source backed by a configured remote issuer.
pub struct ProductionSource {
    /// Base URL of the issuer, absent when not configured.
    issuer_url: Option<String>,

    /// HTTP client with configured timeouts, shared across sources.
    client: Client,
}

impl ProductionSource {
    /// Create a production source. An absent `issuer_url` makes every
    /// `issue` call an `Unconfigured` skip.
    pub fn new(issuer_url: Option<String>, client: Client) -> Self {
        Self { issuer_url, client }
    }
}

#[async_trait]
impl CredentialSource for ProductionSource {
    fn name(&self) -> &'static str {
        "production"
    }

    async fn issue(
        &self,
        room_name: &str,
        participant_name: &str,
    ) -> Result<ConnectionDetails, SourceError> {
        let issuer_url = self
            .issuer_url
            .as_deref()
            .ok_or(SourceError::Unconfigured)?;

        let url = format!("{}/token", issuer_url.trim_end_matches('/'));

        // Room and participant names are forwarded verbatim, blank or not.
        // Rejecting them is the issuer's validation responsibility.
        let request = TokenRequest {
            room_name: room_name.to_string(),
            participant_name: participant_name.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(target: "broker.sources", source = "production", error = %e, "Issuer request failed");
                SourceError::Unreachable(e.to_string())
            })?;

        read_connection_details("production", response).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client() -> Client {
        Client::builder()
            .timeout(std::time::Duration::from_secs(2))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_unconfigured_source_skips() {
        let source = ProductionSource::new(None, test_client());

        let err = source.issue("standup", "alice").await.unwrap_err();
        assert!(matches!(err, SourceError::Unconfigured));
    }

    #[tokio::test]
    async fn test_success_returns_response_fields_verbatim() {
        let mock_server = MockServer::start().await;

        // The issuer may legitimately rewrite names; the broker must echo
        // the response, not the request.
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(serde_json::json!({
                "roomName": "standup",
                "participantName": "alice"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "serverUrl": "wss://media.example.com",
                "roomName": "standup-rewritten",
                "participantName": "alice-1",
                "participantToken": "aaa.bbb.ccc"
            })))
            .mount(&mock_server)
            .await;

        let source = ProductionSource::new(Some(mock_server.uri()), test_client());
        let details = source.issue("standup", "alice").await.unwrap();

        assert_eq!(details.server_url, "wss://media.example.com");
        assert_eq!(details.room_name, "standup-rewritten");
        assert_eq!(details.participant_name, "alice-1");
        assert_eq!(details.participant_token, "aaa.bbb.ccc");
    }

    #[tokio::test]
    async fn test_trailing_slash_in_issuer_url_is_tolerated() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "serverUrl": "wss://media.example.com",
                "roomName": "standup",
                "participantName": "alice",
                "participantToken": "a.b.c"
            })))
            .mount(&mock_server)
            .await;

        let source = ProductionSource::new(Some(format!("{}/", mock_server.uri())), test_client());
        let details = source.issue("standup", "alice").await.unwrap();

        assert_eq!(details.participant_token, "a.b.c");
    }

    #[tokio::test]
    async fn test_server_error_maps_to_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let source = ProductionSource::new(Some(mock_server.uri()), test_client());
        let err = source.issue("standup", "alice").await.unwrap_err();

        assert!(matches!(err, SourceError::Rejected { status: 500 }));
    }

    #[tokio::test]
    async fn test_empty_room_is_forwarded_and_rejection_propagated() {
        let mock_server = MockServer::start().await;

        // The broker does not pre-validate the room name; the issuer's 400
        // is the rejection.
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_json(serde_json::json!({
                "roomName": "",
                "participantName": "test-user"
            })))
            .respond_with(ResponseTemplate::new(400))
            .mount(&mock_server)
            .await;

        let source = ProductionSource::new(Some(mock_server.uri()), test_client());
        let err = source.issue("", "test-user").await.unwrap_err();

        assert!(matches!(err, SourceError::Rejected { status: 400 }));
    }

    #[tokio::test]
    async fn test_missing_field_maps_to_malformed_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "serverUrl": "wss://media.example.com",
                "roomName": "standup",
                "participantName": "alice"
            })))
            .mount(&mock_server)
            .await;

        let source = ProductionSource::new(Some(mock_server.uri()), test_client());
        let err = source.issue("standup", "alice").await.unwrap_err();

        assert!(matches!(err, SourceError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_non_json_body_maps_to_malformed_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let source = ProductionSource::new(Some(mock_server.uri()), test_client());
        let err = source.issue("standup", "alice").await.unwrap_err();

        assert!(matches!(err, SourceError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_empty_token_in_body_maps_to_malformed_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "serverUrl": "wss://media.example.com",
                "roomName": "standup",
                "participantName": "alice",
                "participantToken": ""
            })))
            .mount(&mock_server)
            .await;

        let source = ProductionSource::new(Some(mock_server.uri()), test_client());
        let err = source.issue("standup", "alice").await.unwrap_err();

        assert!(matches!(err, SourceError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_issuer_maps_to_unreachable() {
        // Nothing listens on this port.
        let source = ProductionSource::new(Some("http://127.0.0.1:1".to_string()), test_client());

        let err = source.issue("standup", "alice").await.unwrap_err();
        assert!(matches!(err, SourceError::Unreachable(_)));
    }
}
