use crate::error::DbError;
use crate::memory::InMemoryWatchlistStore;
use crate::repository::{DbRepository, WatchlistStore};
use configuration::{StoreBackend, StoreSettings};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::env;
use std::sync::Arc;
use std::time::Duration;

/// Establishes a connection pool to the hosted PostgreSQL database.
///
/// The connection string is taken from the `DATABASE_URL` environment variable (a `.env`
/// file is honoured) and falls back to `store.database_url` from the configuration.
pub async fn connect(settings: &StoreSettings) -> Result<PgPool, DbError> {
    // A missing .env file is fine; the URL may come from the config file instead.
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL")
        .ok()
        .or_else(|| settings.database_url.clone())
        .ok_or_else(|| {
            DbError::ConnectionConfigError(
                "DATABASE_URL or store.database_url must be set.".to_string(),
            )
        })?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect(&database_url)
        .await?;

    tracing::info!(max_connections = settings.max_connections, "Connected to the watchlist database.");
    Ok(pool)
}

/// Applies the embedded migrations so the `watchlist` table exists.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Opens the configured watchlist store. The Postgres backend is migrated before use.
pub async fn open_store(settings: &StoreSettings) -> Result<Arc<dyn WatchlistStore>, DbError> {
    match settings.backend {
        StoreBackend::Postgres => {
            let pool = connect(settings).await?;
            run_migrations(&pool).await?;
            Ok(Arc::new(DbRepository::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory watchlist store; changes are lost on exit.");
            Ok(Arc::new(InMemoryWatchlistStore::new()))
        }
    }
}
