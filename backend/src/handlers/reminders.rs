//! Reminder endpoints
//!
//! `GET` renders the reminder without sending it, `POST` sends it to the
//! client's email address. `now` may be pinned through the query string.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use meetsync_shared::NotificationPayload;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::clients::load_client;
use crate::reminders::ReminderDelivery;
use crate::{ApiResult, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ReminderQuery {
    pub now: Option<DateTime<Utc>>,
}

pub fn reminder_routes() -> Router<Arc<AppState>> {
    Router::new().route("/:id/reminder", get(preview_reminder).post(send_reminder))
}

async fn preview_reminder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReminderQuery>,
) -> ApiResult<Json<NotificationPayload>> {
    let client = load_client(&state, id).await?;
    let now = query.now.unwrap_or_else(Utc::now);

    let payload = state.reminders.compose(&client, now).await?;
    Ok(Json(payload))
}

async fn send_reminder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReminderQuery>,
) -> ApiResult<Json<ReminderDelivery>> {
    let client = load_client(&state, id).await?;
    let now = query.now.unwrap_or_else(Utc::now);

    let delivery = state.reminders.send(&client, now).await?;
    Ok(Json(delivery))
}
