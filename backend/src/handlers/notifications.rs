use axum::{extract::State, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::notifications::OutboundEmail;
use crate::{ApiError, ApiResult, AppState};

/// Free-form email composed by the dashboard
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationRequest {
    pub client_email: Option<String>,
    pub client_name: Option<String>,
    pub email_subject: Option<String>,
    pub email_body: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationResponse {
    pub success: bool,
    pub message_id: String,
    pub message: String,
}

pub fn notification_routes() -> Router<Arc<AppState>> {
    Router::new().route("/send", post(send_notification))
}

fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

async fn send_notification(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SendNotificationRequest>,
) -> ApiResult<Json<SendNotificationResponse>> {
    let (Some(to), Some(_name), Some(subject), Some(html)) = (
        filled(&payload.client_email),
        filled(&payload.client_name),
        filled(&payload.email_subject),
        filled(&payload.email_body),
    ) else {
        return Err(ApiError::bad_request("Missing required fields"));
    };

    let sent = state
        .sender
        .send(&OutboundEmail {
            to: to.trim().to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        })
        .await?;

    Ok(Json(SendNotificationResponse {
        success: true,
        message_id: sent.id,
        message: "Email sent successfully".to_string(),
    }))
}
