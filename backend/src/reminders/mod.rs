//! Meeting reminder workflow
//!
//! `composer` turns a client and their next meeting into a
//! [`NotificationPayload`](meetsync_shared::NotificationPayload) without side
//! effects; `service` wires it to the meeting store and the notification
//! sender.

use chrono::{DateTime, Utc};

use crate::notifications::SendError;
use crate::store::StoreError;

pub mod composer;
pub mod service;
pub mod template;

pub use composer::{compose_reminder, days_until, subject_line, urgency_for};
pub use service::{ReminderDelivery, ReminderService};

#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    #[error("Client has no upcoming meetings")]
    NoUpcomingMeeting,
    #[error("Meeting lookup failed: {0}")]
    StoreQueryFailed(#[source] StoreError),
    #[error("Sending reminder failed: {0}")]
    SendFailed(#[source] SendError),
    #[error("A reminder for this client is already being sent")]
    SendInProgress,
    #[error("Next meeting starts at {start_time}, before the reference time {now}")]
    InvalidMeetingTime {
        start_time: DateTime<Utc>,
        now: DateTime<Utc>,
    },
}
