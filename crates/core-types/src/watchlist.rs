use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single stock code on the watchlist, as stored in the `watchlist` table.
///
/// `id` is assigned by the store and gives the stable display order.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub id: i64,
    pub code: String,
    pub created_at: DateTime<Utc>,
}
