use async_trait::async_trait;
use chrono::{DateTime, Utc};
use meetsync_shared::{Client, Meeting};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ClientFilter, ClientSort, ClientStore, MeetingStore, NewClient, NewMeeting, StoreError, StoreResult};

/// Process-local store, used when no database is configured and in tests.
///
/// Rows are kept in insertion order, which is what breaks start-time ties.
#[derive(Debug, Default)]
pub struct MemoryStore {
    clients: RwLock<Vec<Client>>,
    meetings: RwLock<Vec<Meeting>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn upcoming(&self, client_id: Uuid, now: DateTime<Utc>) -> Vec<Meeting> {
        let meetings = self.meetings.read().await;
        let mut upcoming: Vec<Meeting> = meetings
            .iter()
            .filter(|m| m.client_id == client_id && m.start_time >= now)
            .cloned()
            .collect();
        // stable, so insertion order survives among equal start times
        upcoming.sort_by_key(|m| m.start_time);
        upcoming
    }
}

#[async_trait]
impl ClientStore for MemoryStore {
    async fn create_client(&self, client: NewClient) -> StoreResult<Client> {
        let mut clients = self.clients.write().await;
        if clients.iter().any(|c| c.email.eq_ignore_ascii_case(&client.email)) {
            return Err(StoreError::Constraint(format!(
                "A client with email {} already exists",
                client.email
            )));
        }

        let created = Client {
            id: Uuid::new_v4(),
            name: client.name,
            company: client.company,
            email: client.email,
            phone: client.phone,
            status: client.status,
            notes: client.notes,
            created_at: Utc::now(),
            updated_at: None,
        };
        clients.push(created.clone());
        Ok(created)
    }

    async fn get_client(&self, id: Uuid) -> StoreResult<Option<Client>> {
        let clients = self.clients.read().await;
        Ok(clients.iter().find(|c| c.id == id).cloned())
    }

    async fn list_clients(&self, filter: ClientFilter) -> StoreResult<Vec<Client>> {
        let clients = self.clients.read().await;
        // newest first; reversing insertion order settles equal timestamps
        let mut listed: Vec<Client> = clients
            .iter()
            .rev()
            .filter(|c| filter.status.is_none_or(|status| c.status == status))
            .cloned()
            .collect();
        match filter.sort {
            ClientSort::Newest => listed.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            ClientSort::Name => listed.sort_by_key(|c| c.name.to_lowercase()),
        }
        Ok(listed)
    }
}

#[async_trait]
impl MeetingStore for MemoryStore {
    async fn create_meeting(&self, meeting: NewMeeting) -> StoreResult<Meeting> {
        meeting.check_times()?;

        let created = Meeting {
            id: Uuid::new_v4(),
            title: meeting.title,
            description: meeting.description,
            client_id: meeting.client_id,
            start_time: meeting.start_time,
            end_time: meeting.end_time,
            status: meeting.status,
            meeting_type: meeting.meeting_type,
            location: meeting.location,
            created_at: Utc::now(),
        };
        self.meetings.write().await.push(created.clone());
        Ok(created)
    }

    async fn next_meeting_for_client(
        &self,
        client_id: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Meeting>> {
        Ok(self.upcoming(client_id, now).await.into_iter().next())
    }

    async fn upcoming_meetings_for_client(
        &self,
        client_id: Uuid,
        now: DateTime<Utc>,
        limit: i64,
    ) -> StoreResult<Vec<Meeting>> {
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        let mut upcoming = self.upcoming(client_id, now).await;
        upcoming.truncate(limit);
        Ok(upcoming)
    }
}
