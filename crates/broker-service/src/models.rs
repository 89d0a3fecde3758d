//! Broker data models.
//!
//! Wire field names are camelCase to match the issuer protocol exactly:
//! `serverUrl`, `roomName`, `participantName`, `participantToken`.

use serde::{Deserialize, Serialize};

/// Everything a media client needs to join a session.
///
/// Constructed fresh per request and owned solely by the caller; never
/// cached, never mutated after construction. All four fields are present
/// on success — deserialization of an issuer response fails if any is
/// missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDetails {
    /// The media server endpoint the client must connect to.
    pub server_url: String,

    /// Room name, echoing the request unless the issuer rewrote it.
    pub room_name: String,

    /// Participant identity, echoing the request unless the issuer
    /// rewrote it.
    pub participant_name: String,

    /// Signed credential scoped to this room/participant pair. A
    /// three-segment JWT on the issuer paths; opaque on the static path.
    pub participant_token: String,
}

/// Request body for `POST /token`.
///
/// Unknown fields are tolerated; older clients send extras the broker
/// does not use.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    /// Requested room name. Forwarded to the issuer unvalidated; a blank
    /// room is the remote issuer's rejection to make.
    pub room_name: String,

    /// Requested participant identity.
    pub participant_name: String,
}

/// Query parameters for the legacy `GET /getToken` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyTokenQuery {
    /// Room name, defaulting to "my-room" when omitted.
    pub room: Option<String>,

    /// Participant name, defaulting to "anonymous" when omitted.
    pub participant: Option<String>,
}

/// Health check response.
///
/// Returned by the `/health` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service health status ("healthy").
    pub status: String,
}
