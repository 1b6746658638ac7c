pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::resume::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route("/api/v1/resumes/generate", post(handlers::handle_generate))
        .route("/api/v1/resumes/match", post(handlers::handle_match))
        .route("/api/v1/resumes/analyze", post(handlers::handle_analyze))
        .with_state(state)
}
