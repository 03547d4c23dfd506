use axum::{
    http::Method,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod database;
mod error;
mod handlers;
mod notifications;
mod reminders;
mod store;
mod validation;

pub use error::{ApiError, ApiResult, AppError};

use notifications::NotificationSender;
use reminders::ReminderService;
use store::{ClientStore, MeetingStore, MemoryStore, PgStore};


pub struct AppState {
    pub clients: Arc<dyn ClientStore>,
    pub meetings: Arc<dyn MeetingStore>,
    pub sender: Arc<dyn NotificationSender>,
    pub reminders: ReminderService,
}

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(|| async { "MeetSync API v0.1.0" }))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1/clients", handlers::client_routes())
        .nest("/api/v1/meetings", handlers::meeting_routes())
        .nest("/api/v1/notifications", handlers::notification_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env()?;

    let (clients, meetings) = match &config.database_url {
        Some(database_url) => {
            let db_pool = database::create_pool(database_url).await?;
            database::migrate(&db_pool).await?;
            let store = Arc::new(PgStore::new(db_pool));
            (
                store.clone() as Arc<dyn ClientStore>,
                store as Arc<dyn MeetingStore>,
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store, data is lost on restart");
            let store = Arc::new(MemoryStore::new());
            (
                store.clone() as Arc<dyn ClientStore>,
                store as Arc<dyn MeetingStore>,
            )
        }
    };

    let sender = notifications::sender_from_config(&config)?;
    let reminders = ReminderService::new(
        meetings.clone(),
        sender.clone(),
        config.reminder_timezone,
        config.notifications.timeout(),
    );

    let app_state = Arc::new(AppState {
        clients,
        meetings,
        sender,
        reminders,
    });

    let listener = tokio::net::TcpListener::bind(&config.server_addr).await?;
    tracing::info!(
        "Server running on {} (reminders rendered in {})",
        config.server_addr,
        config.reminder_timezone
    );

    axum::serve(listener, app(app_state)).await?;

    Ok(())
}
