use chrono::Duration;
use chrono_tz::Tz;
use meetsync_shared::{Meeting, UrgencyTier};

pub struct ReminderView<'a> {
    pub client_name: &'a str,
    pub meeting: &'a Meeting,
    pub days_until: i64,
    pub urgency: UrgencyTier,
    pub tz: Tz,
}

struct Palette {
    accent: &'static str,
    background: &'static str,
    icon: &'static str,
}

fn palette(urgency: UrgencyTier) -> Palette {
    match urgency {
        UrgencyTier::Urgent => Palette {
            accent: "#dc2626",
            background: "#fef2f2",
            icon: "🚨",
        },
        UrgencyTier::Soon => Palette {
            accent: "#d97706",
            background: "#fffbeb",
            icon: "⏰",
        },
        UrgencyTier::Normal => Palette {
            accent: "#2563eb",
            background: "#eff6ff",
            icon: "📅",
        },
    }
}

fn countdown_text(days_until: i64) -> String {
    match days_until {
        0 => "Your meeting is today!".to_string(),
        1 => "Your meeting is tomorrow!".to_string(),
        n => format!("Your meeting is in {} days.", n),
    }
}

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Compact meeting length, e.g. "45m", "1h", "1h 30m"
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    let (hours, rest) = (minutes / 60, minutes % 60);
    match (hours, rest) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

fn detail_line(label: &str, value: &str) -> String {
    format!(
        "<p><strong>{}:</strong> {}</p>\n",
        label,
        escape_html(value)
    )
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn render_body(view: &ReminderView<'_>) -> String {
    let meeting = view.meeting;
    let colors = palette(view.urgency);
    let start = meeting.start_time.with_timezone(&view.tz);

    let date = start.format("%A, %B %-d, %Y").to_string();
    let time = start.format("%-I:%M %p %Z").to_string();

    let mut details = String::new();
    details.push_str(&detail_line("Date", &date));
    details.push_str(&detail_line("Time", &time));
    details.push_str(&detail_line("Duration", &format_duration(meeting.duration())));
    if let Some(location) = present(&meeting.location) {
        details.push_str(&detail_line("Location", location));
    }
    if let Some(meeting_type) = present(&meeting.meeting_type) {
        details.push_str(&detail_line("Type", meeting_type));
    }

    let description = present(&meeting.description)
        .map(|d| {
            format!(
                "<div class=\"notes\"><h4>Agenda</h4><p>{}</p></div>\n",
                escape_html(d)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <style>
        body {{ font-family: Arial, sans-serif; margin: 0; padding: 20px; background-color: #f5f5f5; }}
        .container {{ max-width: 600px; margin: 0 auto; background: white; border-radius: 8px; overflow: hidden; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }}
        .header {{ background: {accent}; color: white; padding: 20px; text-align: center; }}
        .content {{ padding: 30px; }}
        .countdown {{ background: {background}; border: 2px solid {accent}; color: {accent}; padding: 20px; border-radius: 8px; text-align: center; margin: 20px 0; }}
        .countdown .days {{ font-size: 42px; font-weight: bold; }}
        .details {{ background: #f8fafc; border-left: 4px solid {accent}; padding: 15px; margin: 20px 0; }}
        .notes {{ background: #fefce8; border: 1px solid #facc15; padding: 15px; border-radius: 6px; margin: 20px 0; }}
        .footer {{ background: #f8fafc; padding: 20px; text-align: center; color: #666; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>{icon} Meeting Reminder</h1>
        </div>
        <div class="content">
            <p>Hello {client_name},</p>
            <p>This is a friendly reminder about your upcoming meeting.</p>
            <div class="countdown urgency-{urgency}">
                <div class="days">{days}</div>
                <p>{countdown}</p>
            </div>
            <div class="details">
                <h3>{title}</h3>
{details}            </div>
{description}            <p>We look forward to seeing you.</p>
            <p>Best regards,<br>The MeetSync Team</p>
        </div>
        <div class="footer">
            <p>This is an automated message. Please do not reply directly to this email.</p>
        </div>
    </div>
</body>
</html>
"#,
        accent = colors.accent,
        background = colors.background,
        icon = colors.icon,
        client_name = escape_html(view.client_name),
        urgency = view.urgency.as_str(),
        days = view.days_until,
        countdown = countdown_text(view.days_until),
        title = escape_html(&meeting.title),
        details = details,
        description = description,
    )
}
