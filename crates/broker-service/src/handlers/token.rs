//! Token issuance handlers.
//!
//! `issue_token` is the broker's primary operation: forward the request's
//! room/participant pair to the resolver and return whatever credential
//! the fallback chain produced. Clients see either a populated credential
//! or a single terminal error - never which intermediate sources were
//! tried.

use crate::errors::BrokerError;
use crate::models::{ConnectionDetails, LegacyTokenQuery, TokenRequest};
use crate::routes::AppState;
use axum::extract::{Query, State};
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

/// Default room name for the legacy endpoint.
const LEGACY_DEFAULT_ROOM: &str = "my-room";

/// Default participant name for the legacy endpoint.
const LEGACY_DEFAULT_PARTICIPANT: &str = "anonymous";

/// Handler for `POST /token`.
///
/// ## Errors
///
/// Returns 503 when every credential source has been exhausted.
#[instrument(
    skip(state, request),
    name = "broker.token.issue",
    fields(room = %request.room_name, participant = %request.participant_name)
)]
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<ConnectionDetails>, BrokerError> {
    let details = state
        .resolver
        .resolve(&request.room_name, &request.participant_name)
        .await?;

    Ok(Json(details))
}

/// Handler for the legacy `GET /getToken` endpoint.
///
/// Kept for backward compatibility with older clients: room and
/// participant arrive as query parameters with defaults, and the response
/// is the bare participant token as plain text.
#[instrument(skip(state, query), name = "broker.token.legacy")]
pub async fn legacy_token(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LegacyTokenQuery>,
) -> Result<String, BrokerError> {
    let room = query.room.unwrap_or_else(|| LEGACY_DEFAULT_ROOM.to_string());
    let participant = query
        .participant
        .unwrap_or_else(|| LEGACY_DEFAULT_PARTICIPANT.to_string());

    let details = state.resolver.resolve(&room, &participant).await?;

    Ok(details.participant_token)
}
