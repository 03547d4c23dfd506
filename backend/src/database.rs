use sqlx::{migrate::MigrateDatabase, postgres::PgPoolOptions, PgPool, Postgres};
use std::time::Duration;

/// Database pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Maximum time to wait for a connection
    pub acquire_timeout: Duration,
    /// Maximum idle time before a connection is closed
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(600),      // 10 minutes
        }
    }
}

impl PoolConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(n) = env_number("DB_MAX_CONNECTIONS") {
            config.max_connections = n as u32;
        }
        if let Some(n) = env_number("DB_MIN_CONNECTIONS") {
            config.min_connections = n as u32;
        }
        if let Some(n) = env_number("DB_ACQUIRE_TIMEOUT") {
            config.acquire_timeout = Duration::from_secs(n);
        }
        if let Some(n) = env_number("DB_IDLE_TIMEOUT") {
            config.idle_timeout = Duration::from_secs(n);
        }

        config
    }
}

fn env_number(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Create a database connection pool, creating the database if needed
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let config = PoolConfig::from_env();

    if !Postgres::database_exists(database_url).await? {
        Postgres::create_database(database_url).await?;
        tracing::info!("Database created successfully");
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .test_before_acquire(true)
        .connect(database_url)
        .await?;

    tracing::info!(
        "Database pool created: max={}, min={}, acquire_timeout={}s",
        config.max_connections,
        config.min_connections,
        config.acquire_timeout.as_secs()
    );

    Ok(pool)
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}
