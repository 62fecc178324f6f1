pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::generation::handlers;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound("No such endpoint".to_string())
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/status", get(health::status_handler))
        // Resume API
        .route(
            "/api/v1/resumes/enhance",
            post(handlers::handle_enhance_upload),
        )
        .route(
            "/api/v1/resumes/enhance/text",
            post(handlers::handle_enhance_text),
        )
        .route("/api/v1/resumes/refine", post(handlers::handle_refine))
        .route(
            "/api/v1/resumes/suggestions",
            post(handlers::handle_suggestions),
        )
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
