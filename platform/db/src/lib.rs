//! Connection settings and pool setup shared by the server and the test suite.

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use thiserror::Error;
use tracing::{debug, info};

/// Shared pool alias. sea-orm's connection wraps an sqlx pool.
pub type DbPool = DatabaseConnection;

const DEFAULT_URL_KEY: &str = "DATABASE_URL";
const MAX_CONNECTIONS_KEY: &str = "DATABASE_MAX_CONNECTIONS";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing (set {0})")]
    MissingUrl(String),
    #[error("invalid {key}: {value}")]
    InvalidSetting { key: &'static str, value: String },
    #[error(transparent)]
    Database(#[from] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

/// Environment-driven connection settings.
#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    url: Option<String>,
    env_key: String,
    max_connections: u32,
    connect_timeout: Duration,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            env_key: DEFAULT_URL_KEY.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl DatabaseSettings {
    /// Settings with an explicit url, bypassing the environment.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Read `DATABASE_URL` and `DATABASE_MAX_CONNECTIONS`.
    pub fn from_env() -> DbResult<Self> {
        let mut settings = Self::default();
        settings.url = std::env::var(&settings.env_key).ok();
        if let Ok(raw) = std::env::var(MAX_CONNECTIONS_KEY) {
            settings.max_connections = parse_max_connections(&raw)?;
        }
        Ok(settings)
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn database_url(&self) -> DbResult<&str> {
        self.url
            .as_deref()
            .ok_or_else(|| DbError::MissingUrl(self.env_key.clone()))
    }

    fn connect_options(&self) -> DbResult<ConnectOptions> {
        let url = self.database_url()?;
        let mut opts = ConnectOptions::new(url.to_string());
        // Each in-memory SQLite connection is its own database.
        let max = if url.contains(":memory:") || url.contains("mode=memory") {
            1
        } else {
            self.max_connections
        };
        opts.max_connections(max)
            .connect_timeout(self.connect_timeout)
            .sqlx_logging(false);
        Ok(opts)
    }
}

fn parse_max_connections(raw: &str) -> DbResult<u32> {
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(DbError::InvalidSetting {
            key: MAX_CONNECTIONS_KEY,
            value: raw.to_string(),
        }),
    }
}

/// Open a pool for the configured url.
pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    let opts = settings.connect_options()?;
    debug!(max_connections = settings.max_connections, "opening database pool");
    let pool = Database::connect(opts).await?;
    info!(backend = ?pool.get_database_backend(), "database pool ready");
    Ok(pool)
}

/// Cheap liveness probe used by the health endpoint.
pub async fn ping(pool: &DbPool) -> bool {
    let backend = pool.get_database_backend();
    pool.execute(Statement::from_string(backend, "SELECT 1".to_string()))
        .await
        .is_ok()
}
