use thiserror::Error;

/// Errors that end a session: without a dataset or watchlist there is nothing to show.
///
/// Recoverable problems (bad range, empty view, failed watchlist write) never surface here;
/// they become notices on the returned view.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] dataset::DatasetError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("Watchlist error: {0}")]
    Watchlist(#[from] watchlist::WatchlistError),
}
