pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analyses::handlers as analyses;
use crate::ingest::handlers as ingest;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Analyses API
        .route("/api/v1/analyses", post(analyses::handle_create_analysis))
        .route(
            "/api/v1/analyses/text",
            post(analyses::handle_create_text_analysis),
        )
        .route("/api/v1/analyses/:id", get(analyses::handle_get_analysis))
        .route(
            "/api/v1/analyses/:id/resumes/:resume_id",
            get(analyses::handle_get_resume_detail),
        )
        // Job-description API
        .route("/api/v1/jd/fetch", post(ingest::handle_fetch_jd))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
