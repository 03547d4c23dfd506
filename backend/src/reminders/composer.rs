use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use meetsync_shared::{Client, Meeting, NotificationPayload, UrgencyTier};

use super::template::{self, ReminderView};
use super::ReminderError;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Whole days until `start`, rounded up: 1ms ahead counts as one day.
pub fn days_until(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (start - now).num_milliseconds();
    let days = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) == 0 {
        days
    } else {
        days + 1
    }
}

pub fn urgency_for(days_until: i64) -> UrgencyTier {
    if days_until <= 1 {
        UrgencyTier::Urgent
    } else if days_until <= 3 {
        UrgencyTier::Soon
    } else {
        UrgencyTier::Normal
    }
}

pub fn subject_line(title: &str, days_until: i64) -> String {
    let unit = if days_until == 1 { "Day" } else { "Days" };
    format!("Meeting Reminder: {} - {} {} to Go!", title, days_until, unit)
}

/// Build the reminder for `client`'s next meeting.
///
/// `next_meeting` is the first row of the client's meetings starting at or
/// after `now`. A meeting that starts before `now` means the caller broke
/// that contract and is rejected rather than clamped.
pub fn compose_reminder(
    client: &Client,
    next_meeting: Option<&Meeting>,
    now: DateTime<Utc>,
    tz: Tz,
) -> Result<NotificationPayload, ReminderError> {
    let meeting = next_meeting.ok_or(ReminderError::NoUpcomingMeeting)?;

    if meeting.start_time < now {
        return Err(ReminderError::InvalidMeetingTime {
            start_time: meeting.start_time,
            now,
        });
    }

    let days = days_until(meeting.start_time, now);
    let urgency = urgency_for(days);

    let body = template::render_body(&ReminderView {
        client_name: &client.name,
        meeting,
        days_until: days,
        urgency,
        tz,
    });

    Ok(NotificationPayload {
        subject: subject_line(&meeting.title, days),
        body,
        urgency_tier: urgency,
        days_until: days,
    })
}
