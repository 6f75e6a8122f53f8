use axum::{
    Router,
    routing::{delete, get, post},
};
use configuration::Config;
use dashboard::DashboardSession;
use dataset::DatasetProvider;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
///
/// This is a single-viewer server: every client drives the same session, so a range set
/// by one request is what the next request sees. The mutex applies events one at a time.
pub struct AppState {
    pub session: Mutex<DashboardSession>,
}

impl AppState {
    pub fn new(session: DashboardSession) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }
}

/// Builds the application routes over an existing session.
pub fn app_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/events", post(handlers::post_event))
        .route(
            "/api/watchlist",
            get(handlers::get_watchlist).post(handlers::add_to_watchlist),
        )
        .route("/api/watchlist/:code", delete(handlers::remove_from_watchlist))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
///
/// Tracing must already be initialized by the caller.
pub async fn run_server(config: Config, addr: SocketAddr) -> anyhow::Result<()> {
    let store = database::open_store(&config.store).await?;
    let provider = DatasetProvider::from_settings(&config.data_source);
    let session = DashboardSession::start(config.dashboard, provider, store).await?;

    let app = app_router(Arc::new(AppState::new(session)));

    tracing::info!("Web server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
