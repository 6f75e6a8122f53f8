use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchlistError {
    #[error("Failed to read the watchlist from the store: {0}")]
    StoreRead(#[source] database::DbError),

    #[error("Failed to update '{code}' in the watchlist store: {source}")]
    StoreWrite {
        code: String,
        #[source]
        source: database::DbError,
    },
}
