use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use meetsync_shared::{Client, ClientStatus, Meeting};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::store::{ClientFilter, ClientSort, NewClient, StoreError};
use crate::validation::{self, Validator, CLIENT_SORTS, CLIENT_STATUSES};
use crate::{ApiError, ApiResult, AppError, AppState};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ClientCreate {
    #[validate(length(max = 200, message = "name must be 200 characters or less"))]
    pub name: String,
    pub company: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClientListQuery {
    pub status: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub limit: Option<i64>,
    pub now: Option<DateTime<Utc>>,
}

pub fn client_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route("/:id", get(get_client))
        .route("/:id/meetings/upcoming", get(upcoming_meetings))
}

/// Load a client or fail with 404
pub async fn load_client(state: &AppState, id: Uuid) -> ApiResult<Client> {
    state
        .clients
        .get_client(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Client"))
}

async fn create_client(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ClientCreate>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    let name = payload.name.trim().to_string();
    let email = validation::email::normalize(&payload.email);

    Validator::from_derive(payload.validate())
        .required_string(&name, "name")
        .error_if(email.is_none(), "email", "Invalid email format")
        .max_length(&payload.notes, "notes", 5000)
        .one_of(&payload.status, "status", CLIENT_STATUSES)
        .finish()?;

    let status = match payload.status.as_deref() {
        Some(s) => s.parse::<ClientStatus>().map_err(ApiError::bad_request)?,
        None => ClientStatus::Active,
    };

    let new_client = NewClient {
        name,
        company: validation::string::optional(&payload.company),
        email: email.unwrap_or_default(),
        phone: validation::string::optional(&payload.phone),
        status,
        notes: validation::string::optional(&payload.notes),
    };

    match state.clients.create_client(new_client).await {
        Ok(client) => {
            tracing::info!("Client {} created", client.id);
            Ok((StatusCode::CREATED, Json(client)))
        }
        Err(StoreError::Constraint(msg)) => Err(AppError::Conflict(msg)),
        Err(e) => Err(e.into()),
    }
}

async fn list_clients(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ClientListQuery>,
) -> ApiResult<Json<Vec<Client>>> {
    Validator::new()
        .one_of(&params.status, "status", CLIENT_STATUSES)
        .one_of(&params.sort, "sort", CLIENT_SORTS)
        .finish()?;

    let status = params
        .status
        .as_deref()
        .map(str::parse::<ClientStatus>)
        .transpose()
        .map_err(ApiError::bad_request)?;
    let sort = match params.sort.as_deref().map(str::trim) {
        Some(s) if s.eq_ignore_ascii_case("name") => ClientSort::Name,
        _ => ClientSort::Newest,
    };

    let clients = state.clients.list_clients(ClientFilter { status, sort }).await?;
    Ok(Json(clients))
}

async fn get_client(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Client>> {
    Ok(Json(load_client(&state, id).await?))
}

async fn upcoming_meetings(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<UpcomingQuery>,
) -> ApiResult<Json<Vec<Meeting>>> {
    let client = load_client(&state, id).await?;
    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let now = params.now.unwrap_or_else(Utc::now);

    let meetings = state
        .meetings
        .upcoming_meetings_for_client(client.id, now, limit)
        .await?;

    Ok(Json(meetings))
}
