use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use meetsync_shared::{Client, NotificationPayload};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use super::{compose_reminder, ReminderError};
use crate::notifications::{NotificationSender, OutboundEmail, SendError};
use crate::store::MeetingStore;

/// Result of a delivered reminder
#[derive(Debug, Clone, Serialize)]
pub struct ReminderDelivery {
    pub message_id: String,
    pub payload: NotificationPayload,
}

/// Looks up a client's next meeting, composes the reminder and sends it.
///
/// At most one send per client is outstanding; a second request while one is
/// in flight gets [`ReminderError::SendInProgress`].
pub struct ReminderService {
    meetings: Arc<dyn MeetingStore>,
    sender: Arc<dyn NotificationSender>,
    timezone: Tz,
    send_timeout: Duration,
    in_flight: Mutex<HashSet<Uuid>>,
}

/// Removes the client from the in-flight set when dropped
struct InFlightGuard<'a> {
    in_flight: &'a Mutex<HashSet<Uuid>>,
    client_id: Uuid,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        set.remove(&self.client_id);
    }
}

impl ReminderService {
    pub fn new(
        meetings: Arc<dyn MeetingStore>,
        sender: Arc<dyn NotificationSender>,
        timezone: Tz,
        send_timeout: Duration,
    ) -> Self {
        Self {
            meetings,
            sender,
            timezone,
            send_timeout,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Compose the reminder for `client`'s next meeting without sending it
    pub async fn compose(
        &self,
        client: &Client,
        now: DateTime<Utc>,
    ) -> Result<NotificationPayload, ReminderError> {
        let next = self
            .meetings
            .next_meeting_for_client(client.id, now)
            .await
            .map_err(ReminderError::StoreQueryFailed)?;

        compose_reminder(client, next.as_ref(), now, self.timezone)
    }

    /// Compose and deliver the reminder to the client's email address
    pub async fn send(
        &self,
        client: &Client,
        now: DateTime<Utc>,
    ) -> Result<ReminderDelivery, ReminderError> {
        let _guard = self.begin(client.id)?;

        let payload = self.compose(client, now).await?;

        let email = OutboundEmail {
            to: client.email.clone(),
            subject: payload.subject.clone(),
            html: payload.body.clone(),
        };

        let sent = match tokio::time::timeout(self.send_timeout, self.sender.send(&email)).await {
            Ok(result) => result,
            Err(_) => Err(SendError::Timeout),
        }
        .map_err(|e| {
            warn!("Reminder for client {} not delivered: {}", client.id, e);
            ReminderError::SendFailed(e)
        })?;

        info!(
            "Reminder sent to {} for client {} ({} days, {})",
            client.email, client.id, payload.days_until, payload.urgency_tier
        );

        Ok(ReminderDelivery {
            message_id: sent.id,
            payload,
        })
    }

    fn begin(&self, client_id: Uuid) -> Result<InFlightGuard<'_>, ReminderError> {
        let mut set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !set.insert(client_id) {
            return Err(ReminderError::SendInProgress);
        }
        Ok(InFlightGuard {
            in_flight: &self.in_flight,
            client_id,
        })
    }
}
