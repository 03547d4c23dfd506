mod api_notifications;
mod api_reminders;
mod store_postgres;
