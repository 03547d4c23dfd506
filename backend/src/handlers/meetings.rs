use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use chrono::{DateTime, Utc};
use meetsync_shared::{Meeting, MeetingStatus};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::store::{NewMeeting, StoreError};
use crate::validation::{self, Validator, CREATABLE_MEETING_STATUSES};
use crate::{ApiError, ApiResult, AppError, AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct MeetingCreate {
    pub title: String,
    pub description: Option<String>,
    pub client_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: Option<String>,
    pub meeting_type: Option<String>,
    pub location: Option<String>,
}

pub fn meeting_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", post(create_meeting))
}

async fn create_meeting(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MeetingCreate>,
) -> ApiResult<(StatusCode, Json<Meeting>)> {
    Validator::new()
        .required_string(&payload.title, "title")
        .max_length(&Some(payload.title.clone()), "title", 200)
        .time_range(&payload.start_time, &payload.end_time, "end_time")
        .one_of(&payload.status, "status", CREATABLE_MEETING_STATUSES)
        .finish()?;

    if state.clients.get_client(payload.client_id).await?.is_none() {
        return Err(ApiError::validation_single("client_id", "Client does not exist"));
    }

    let status = match payload.status.as_deref() {
        Some(s) => s.parse::<MeetingStatus>().map_err(ApiError::bad_request)?,
        None => MeetingStatus::Scheduled,
    };

    let new_meeting = NewMeeting {
        title: payload.title.trim().to_string(),
        description: validation::string::optional(&payload.description),
        client_id: payload.client_id,
        start_time: payload.start_time,
        end_time: payload.end_time,
        status,
        meeting_type: validation::string::optional(&payload.meeting_type),
        location: validation::string::optional(&payload.location),
    };

    match state.meetings.create_meeting(new_meeting).await {
        Ok(meeting) => {
            tracing::info!(
                "Meeting {} scheduled for client {} at {}",
                meeting.id,
                meeting.client_id,
                meeting.start_time
            );
            Ok((StatusCode::CREATED, Json(meeting)))
        }
        Err(StoreError::Constraint(msg)) => Err(AppError::ValidationError {
            details: [("end_time".to_string(), vec![msg])].into_iter().collect(),
        }),
        Err(e) => Err(e.into()),
    }
}
