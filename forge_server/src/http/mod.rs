pub mod error;
pub mod handlers;

pub use error::ApiError;

use crate::config::ServerConfig;
use crate::jobs::DynJobStore;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub jobs: DynJobStore,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/tools/upload", post(handlers::upload_evidence))
        .route("/tools/tsk/{job_id}/fls", post(handlers::run_tsk_fls))
        .route(
            "/tools/volatility/{job_id}/pslist",
            post(handlers::run_volatility_pslist),
        )
        .route("/health", get(handlers::health))
        // Evidence files are disk and memory images; the default multipart
        // body cap is far too small for them.
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}
