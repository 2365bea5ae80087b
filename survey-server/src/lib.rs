//! survey-server library - survey response collection and export
//!
//! Accepts survey submissions as JSON, stores them through a
//! `ResponseStore`, and exports everything as CSV.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod store;

use store::ResponseStore;

/// Largest accepted submission body
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Response persistence
    pub store: Arc<dyn ResponseStore>,
    /// Folder served for any path not matched by a route
    pub static_dir: PathBuf,
}

impl AppState {
    /// Create new application state
    pub fn new(store: Arc<dyn ResponseStore>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            static_dir: static_dir.into(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let static_files = ServeDir::new(&state.static_dir);

    let api = Router::new()
        .route("/api/responses", post(api::submit_response).get(api::export_csv))
        .route("/api/responses.csv", get(api::export_csv))
        .route("/api/responses.json", get(api::export_json))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
