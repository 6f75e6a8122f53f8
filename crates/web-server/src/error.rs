use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dashboard::DashboardError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Dashboard error: {0}")]
    Dashboard(#[from] DashboardError),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Dashboard(DashboardError::Dataset(dataset_err)) => {
                tracing::error!(error = ?dataset_err, "Dataset error.");
                (StatusCode::SERVICE_UNAVAILABLE, dataset_err.to_string())
            }
            AppError::Dashboard(DashboardError::Watchlist(watchlist_err)) => {
                tracing::error!(error = ?watchlist_err, "Watchlist error.");
                (
                    StatusCode::BAD_GATEWAY,
                    "The watchlist store could not be reached".to_string(),
                )
            }
            AppError::Dashboard(dashboard_err) => {
                tracing::error!(error = ?dashboard_err, "Dashboard error.");
                (StatusCode::INTERNAL_SERVER_ERROR, dashboard_err.to_string())
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
