//! Standardized error handling for the MeetSync API
//!
//! Every handler error is converted into the same JSON envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::notifications::SendError;
use crate::reminders::ReminderError;
use crate::store::StoreError;

/// Standard API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code (e.g., "VALIDATION_ERROR", "NOT_FOUND", "NO_UPCOMING_MEETING")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Vec<String>>>,
    /// ISO 8601 timestamp
    pub timestamp: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> AppError {
        AppError::NotFound(message.into())
    }

    /// Create a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> AppError {
        AppError::BadRequest(message.into())
    }

    /// Create a validation error with a single field error
    pub fn validation_single(field: impl Into<String>, message: impl Into<String>) -> AppError {
        let mut details = HashMap::new();
        details.insert(field.into(), vec![message.into()]);
        AppError::ValidationError { details }
    }
}

/// Application error type that can be converted to HTTP responses
#[derive(Debug)]
pub enum AppError {
    // Resource errors
    NotFound(String),
    Conflict(String),
    NoUpcomingMeeting,

    // Validation errors
    ValidationError { details: HashMap<String, Vec<String>> },
    BadRequest(String),

    // Server errors
    InternalError(String),
    DatabaseError(String),
    ExternalServiceError { service: String, message: String },
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) | Self::NoUpcomingMeeting => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InternalError(_) | Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ExternalServiceError { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Get the error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::NoUpcomingMeeting => "NO_UPCOMING_MEETING",
            Self::ValidationError { .. } => "VALIDATION_ERROR",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::InternalError(_) => "INTERNAL_ERROR",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::ExternalServiceError { .. } => "EXTERNAL_SERVICE_ERROR",
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::NotFound(resource) => format!("{} not found", resource),
            Self::Conflict(msg) => msg.clone(),
            Self::NoUpcomingMeeting => "Client has no upcoming meetings".to_string(),
            Self::ValidationError { .. } => "Validation failed".to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            Self::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                "A database error occurred".to_string()
            }
            Self::ExternalServiceError { service, message } => {
                tracing::error!("External service error ({}): {}", service, message);
                message.clone()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut error = ApiError::new(self.error_code(), self.message());

        if let Self::ValidationError { details } = &self {
            error.details = Some(details.clone());
        }

        (status, Json(error)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::DatabaseError(err.to_string())
    }
}

impl From<SendError> for AppError {
    fn from(err: SendError) -> Self {
        Self::ExternalServiceError {
            service: "notification".to_string(),
            message: err.user_message(),
        }
    }
}

impl From<ReminderError> for AppError {
    fn from(err: ReminderError) -> Self {
        match err {
            ReminderError::NoUpcomingMeeting => Self::NoUpcomingMeeting,
            ReminderError::StoreQueryFailed(e) => Self::DatabaseError(e.to_string()),
            ReminderError::SendFailed(e) => e.into(),
            ReminderError::SendInProgress => {
                Self::Conflict("A reminder for this client is already being sent".to_string())
            }
            ReminderError::InvalidMeetingTime { .. } => Self::InternalError(err.to_string()),
        }
    }
}

/// Result type alias for handlers
pub type ApiResult<T> = Result<T, AppError>;

/// Helper to add multiple validation errors
pub struct ValidationBuilder {
    details: HashMap<String, Vec<String>>,
}

impl ValidationBuilder {
    pub fn new() -> Self {
        Self {
            details: HashMap::new(),
        }
    }

    pub fn error(mut self, field: &str, message: &str) -> Self {
        self.details
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
        self
    }

    /// Fold `validator` derive output into the builder
    pub fn from_validator(errors: &validator::ValidationErrors) -> Self {
        let mut builder = Self::new();
        for (field, field_errors) in errors.field_errors() {
            for e in field_errors {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                builder = builder.error(field.as_ref(), &message);
            }
        }
        builder
    }

    pub fn build(self) -> Option<AppError> {
        if self.details.is_empty() {
            None
        } else {
            Some(AppError::ValidationError {
                details: self.details,
            })
        }
    }
}

impl Default for ValidationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
