use crate::DbError;
use async_trait::async_trait;
use core_types::WatchlistEntry;
use sqlx::postgres::PgPool;

/// The narrow interface the watchlist needs from a persistent store.
///
/// Implementations are the hosted database ([`DbRepository`]) and the process-local
/// [`InMemoryWatchlistStore`](crate::InMemoryWatchlistStore); tests inject their own.
#[async_trait]
pub trait WatchlistStore: Send + Sync {
    /// All entries, ordered by `id` ascending.
    async fn list_all(&self) -> Result<Vec<WatchlistEntry>, DbError>;

    /// Inserts `code` and returns the stored entry.
    async fn insert(&self, code: &str) -> Result<WatchlistEntry, DbError>;

    /// Deletes the entry whose code matches exactly. Returns the number of rows removed;
    /// zero is not an error.
    async fn delete_by_code(&self, code: &str) -> Result<u64, DbError>;
}

/// The `DbRepository` provides the watchlist operations on top of the PostgreSQL pool.
/// It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WatchlistStore for DbRepository {
    async fn list_all(&self) -> Result<Vec<WatchlistEntry>, DbError> {
        let entries = sqlx::query_as::<_, WatchlistEntry>(
            "SELECT id, code, created_at FROM watchlist ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    async fn insert(&self, code: &str) -> Result<WatchlistEntry, DbError> {
        let entry = sqlx::query_as::<_, WatchlistEntry>(
            r#"
            INSERT INTO watchlist (code)
            VALUES ($1)
            RETURNING id, code, created_at
            "#,
        )
        .bind(code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                DbError::DuplicateCode(code.to_string())
            }
            other => other.into(),
        })?;

        tracing::debug!(id = entry.id, code = %entry.code, "Inserted watchlist entry.");
        Ok(entry)
    }

    async fn delete_by_code(&self, code: &str) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM watchlist WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
