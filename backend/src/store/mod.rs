//! Persistence seams for clients and meetings
//!
//! Handlers and the reminder service only see these traits, so the backing
//! store (PostgreSQL or in-memory) is chosen once at startup.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use meetsync_shared::{Client, ClientStatus, Meeting, MeetingStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Constraint violated: {0}")]
    Constraint(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.constraint().is_some() => {
                Self::Constraint(db.message().to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub company: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub status: ClientStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMeeting {
    pub title: String,
    pub description: Option<String>,
    pub client_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: MeetingStatus,
    pub meeting_type: Option<String>,
    pub location: Option<String>,
}

impl NewMeeting {
    /// End must be strictly after start
    pub fn check_times(&self) -> StoreResult<()> {
        if self.end_time <= self.start_time {
            return Err(StoreError::Constraint(
                "End time must be after start time".to_string(),
            ));
        }
        Ok(())
    }
}

/// Ordering for client listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClientSort {
    /// Most recently created first
    #[default]
    Newest,
    /// Alphabetical, as used by the meeting scheduler's client picker
    Name,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClientFilter {
    pub status: Option<ClientStatus>,
    pub sort: ClientSort,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn create_client(&self, client: NewClient) -> StoreResult<Client>;

    async fn get_client(&self, id: Uuid) -> StoreResult<Option<Client>>;

    async fn list_clients(&self, filter: ClientFilter) -> StoreResult<Vec<Client>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeetingStore: Send + Sync {
    async fn create_meeting(&self, meeting: NewMeeting) -> StoreResult<Meeting>;

    /// Earliest meeting for the client starting at or after `now`.
    ///
    /// Equal start times resolve to the meeting that was stored first.
    async fn next_meeting_for_client(
        &self,
        client_id: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Meeting>>;

    /// Meetings starting at or after `now`, ascending, same ordering as
    /// [`MeetingStore::next_meeting_for_client`].
    async fn upcoming_meetings_for_client(
        &self,
        client_id: Uuid,
        now: DateTime<Utc>,
        limit: i64,
    ) -> StoreResult<Vec<Meeting>>;

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
