use crate::{AppState, error::AppError};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use core_types::{WatchlistEntry, YearRange};
use dashboard::DashboardView;
use events::{DashboardEvent, Notice};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub start: Option<i32>,
    pub end: Option<i32>,
    pub show_profit: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AddCodeRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct WatchlistResponse {
    pub entries: Vec<WatchlistEntry>,
    pub notices: Vec<Notice>,
}

impl From<DashboardView> for WatchlistResponse {
    fn from(view: DashboardView) -> Self {
        Self {
            entries: view.watchlist,
            notices: view.notices,
        }
    }
}

/// # GET /api/dashboard
/// Moves the controls to the requested position and returns the recomputed view.
/// A missing `start`/`end` keeps the current edge of the range.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>, AppError> {
    let mut session = state.session.lock().await;

    let mut pending = Vec::new();
    if query.start.is_some() || query.end.is_some() {
        let current = session.range();
        pending.push(DashboardEvent::SetRange(YearRange {
            start: query.start.unwrap_or(current.start),
            end: query.end.unwrap_or(current.end),
        }));
    }
    if let Some(show) = query.show_profit {
        pending.push(DashboardEvent::ToggleProfit(show));
    }

    let mut notices = Vec::new();
    let mut view = None;
    for event in pending {
        let next = session.handle(event).await?;
        notices.extend(next.notices.iter().cloned());
        view = Some(next);
    }

    let mut view = view.unwrap_or_else(|| session.view());
    view.notices = notices;
    Ok(Json(view))
}

/// # POST /api/events
/// Applies one event in its tagged JSON form, e.g. `{"type": "Reload"}`.
pub async fn post_event(
    State(state): State<Arc<AppState>>,
    Json(event): Json<DashboardEvent>,
) -> Result<Json<DashboardView>, AppError> {
    let view = state.session.lock().await.handle(event).await?;
    Ok(Json(view))
}

/// # GET /api/watchlist
pub async fn get_watchlist(State(state): State<Arc<AppState>>) -> Json<Vec<WatchlistEntry>> {
    let session = state.session.lock().await;
    Json(session.watchlist().entries().to_vec())
}

/// # POST /api/watchlist
/// A rejected write comes back as an error notice with the unchanged list.
pub async fn add_to_watchlist(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddCodeRequest>,
) -> Result<Json<WatchlistResponse>, AppError> {
    if request.code.trim().is_empty() {
        return Err(AppError::BadRequest("code must not be empty".to_string()));
    }
    let view = state
        .session
        .lock()
        .await
        .handle(DashboardEvent::AddCode(request.code))
        .await?;
    Ok(Json(view.into()))
}

/// # DELETE /api/watchlist/:code
pub async fn remove_from_watchlist(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<WatchlistResponse>, AppError> {
    let view = state
        .session
        .lock()
        .await
        .handle(DashboardEvent::RemoveCode(code))
        .await?;
    Ok(Json(view.into()))
}
