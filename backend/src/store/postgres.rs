use async_trait::async_trait;
use chrono::{DateTime, Utc};
use meetsync_shared::{Client, Meeting};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ClientFilter, ClientSort, ClientStore, MeetingStore, NewClient, NewMeeting, StoreResult};

const CLIENT_COLUMNS: &str =
    "id, name, company, email, phone, status, notes, created_at, updated_at";

const MEETING_COLUMNS: &str = "id, title, description, client_id, start_time, end_time, \
     status, meeting_type, location, created_at";

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientStore for PgStore {
    async fn create_client(&self, client: NewClient) -> StoreResult<Client> {
        let sql = format!(
            "INSERT INTO clients (id, name, company, email, phone, status, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            CLIENT_COLUMNS
        );

        let created = sqlx::query_as::<_, Client>(&sql)
            .bind(Uuid::new_v4())
            .bind(&client.name)
            .bind(&client.company)
            .bind(&client.email)
            .bind(&client.phone)
            .bind(client.status)
            .bind(&client.notes)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn get_client(&self, id: Uuid) -> StoreResult<Option<Client>> {
        let sql = format!("SELECT {} FROM clients WHERE id = $1", CLIENT_COLUMNS);

        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    async fn list_clients(&self, filter: ClientFilter) -> StoreResult<Vec<Client>> {
        let order = match filter.sort {
            ClientSort::Newest => "created_at DESC, id",
            ClientSort::Name => "name ASC, id",
        };
        let sql = format!(
            "SELECT {} FROM clients
             WHERE ($1::client_status IS NULL OR status = $1)
             ORDER BY {}",
            CLIENT_COLUMNS, order
        );

        let clients = sqlx::query_as::<_, Client>(&sql)
            .bind(filter.status)
            .fetch_all(&self.pool)
            .await?;

        Ok(clients)
    }
}

#[async_trait]
impl MeetingStore for PgStore {
    async fn create_meeting(&self, meeting: NewMeeting) -> StoreResult<Meeting> {
        meeting.check_times()?;

        let sql = format!(
            "INSERT INTO meetings (id, title, description, client_id, start_time, end_time,
                                   status, meeting_type, location)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {}",
            MEETING_COLUMNS
        );

        let created = sqlx::query_as::<_, Meeting>(&sql)
            .bind(Uuid::new_v4())
            .bind(&meeting.title)
            .bind(&meeting.description)
            .bind(meeting.client_id)
            .bind(meeting.start_time)
            .bind(meeting.end_time)
            .bind(meeting.status)
            .bind(&meeting.meeting_type)
            .bind(&meeting.location)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn next_meeting_for_client(
        &self,
        client_id: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Meeting>> {
        // seq is the insertion counter; it makes equal start times deterministic
        let sql = format!(
            "SELECT {} FROM meetings
             WHERE client_id = $1 AND start_time >= $2
             ORDER BY start_time ASC, seq ASC
             LIMIT 1",
            MEETING_COLUMNS
        );

        let meeting = sqlx::query_as::<_, Meeting>(&sql)
            .bind(client_id)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;

        Ok(meeting)
    }

    async fn upcoming_meetings_for_client(
        &self,
        client_id: Uuid,
        now: DateTime<Utc>,
        limit: i64,
    ) -> StoreResult<Vec<Meeting>> {
        let sql = format!(
            "SELECT {} FROM meetings
             WHERE client_id = $1 AND start_time >= $2
             ORDER BY start_time ASC, seq ASC
             LIMIT $3",
            MEETING_COLUMNS
        );

        let meetings = sqlx::query_as::<_, Meeting>(&sql)
            .bind(client_id)
            .bind(now)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(meetings)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
