//! Request validation for the MeetSync API
//!
//! Form fields arrive the way the dashboard sends them: blank strings mean
//! "not provided", and every failure is reported per field.

use chrono::{DateTime, Utc};
use crate::error::{AppError, ValidationBuilder};

/// Validation result type
pub type ValidationResult<T> = Result<T, AppError>;

/// String helpers
pub mod string {
    /// Trim an optional form field, treating blank input as absent
    pub fn optional(value: &Option<String>) -> Option<String> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// Email validation
pub mod email {
    /// Normalized address, or `None` when the format is unusable
    pub fn normalize(value: &str) -> Option<String> {
        let email = value.trim().to_lowercase();

        let (local, domain) = email.split_once('@')?;
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return None;
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return None;
        }

        Some(email)
    }
}

/// Validator builder for request bodies
pub struct Validator {
    builder: ValidationBuilder,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            builder: ValidationBuilder::new(),
        }
    }

    /// Start from errors already collected by `validator` derives
    pub fn from_derive(result: Result<(), validator::ValidationErrors>) -> Self {
        match result {
            Ok(()) => Self::new(),
            Err(errors) => Self {
                builder: ValidationBuilder::from_validator(&errors),
            },
        }
    }

    /// Add error for a field
    pub fn error(mut self, field: &str, message: &str) -> Self {
        self.builder = self.builder.error(field, message);
        self
    }

    /// Add error if condition is true
    pub fn error_if(self, condition: bool, field: &str, message: &str) -> Self {
        if condition {
            self.error(field, message)
        } else {
            self
        }
    }

    /// Validate required string
    pub fn required_string(self, value: &str, field: &str) -> Self {
        if value.trim().is_empty() {
            self.error(field, &format!("{} is required", field))
        } else {
            self
        }
    }

    /// Validate max length
    pub fn max_length(self, value: &Option<String>, field: &str, max: usize) -> Self {
        match value {
            Some(s) if s.chars().count() > max => {
                self.error(field, &format!("{} must be {} characters or less", field, max))
            }
            _ => self,
        }
    }

    /// Validate that `end` falls strictly after `start`
    pub fn time_range(self, start: &DateTime<Utc>, end: &DateTime<Utc>, end_field: &str) -> Self {
        self.error_if(end <= start, end_field, "End time must be after start time")
    }

    /// Validate value is one of allowed options
    pub fn one_of(self, value: &Option<String>, field: &str, allowed: &[&str]) -> Self {
        match value {
            Some(v) if !allowed.iter().any(|a| a.eq_ignore_ascii_case(v.trim())) => self.error(
                field,
                &format!("{} must be one of: {}", field, allowed.join(", ")),
            ),
            _ => self,
        }
    }

    /// Finish validation, returning error if any
    pub fn finish(self) -> ValidationResult<()> {
        match self.builder.build() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Statuses a meeting may be created with
pub const CREATABLE_MEETING_STATUSES: &[&str] = &["scheduled", "confirmed"];

/// Client statuses
pub const CLIENT_STATUSES: &[&str] = &["active", "inactive"];

/// Client list orderings
pub const CLIENT_SORTS: &[&str] = &["newest", "name"];
