use axum::{extract::State, http::StatusCode, response::Json, Router};
use serde_json::json;
use std::sync::Arc;
use crate::AppState;

pub mod clients;
pub mod meetings;
pub mod notifications;
pub mod reminders;

pub use meetings::meeting_routes;
pub use notifications::notification_routes;

/// Client CRUD plus the per-client reminder endpoints
pub fn client_routes() -> Router<Arc<AppState>> {
    clients::client_routes().merge(reminders::reminder_routes())
}

pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.meetings.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({"status": "healthy", "service": "meetsync-api", "store": "ok"})),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "unhealthy", "service": "meetsync-api", "store": "unavailable"})),
            )
        }
    }
}
