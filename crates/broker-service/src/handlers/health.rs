//! Health check handler.

use crate::models::HealthResponse;
use axum::Json;
use tracing::instrument;

/// Health check handler.
///
/// Always reports healthy without touching the resolver - the broker has
/// no local dependencies whose failure would make it unable to serve.
///
/// ## Example Response
///
/// ```json
/// {"status": "healthy"}
/// ```
#[instrument(name = "broker.health.check")]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_reports_healthy() {
        let Json(response) = health_check().await;
        assert_eq!(response.status, "healthy");
    }
}
