//! Axum route handlers for job-description fetching.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::ingest::jd_fetch::FetchOutcome;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FetchJdRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct FetchJdResponse {
    pub outcome: FetchOutcome,
    /// The fetched description, or a fixed failure message for display.
    pub display_text: String,
}

/// POST /api/v1/jd/fetch
///
/// Fetches a job description from LinkedIn, Indeed or Lever. Fetch failures
/// are reported in `outcome`, not as HTTP errors.
pub async fn handle_fetch_jd(
    State(state): State<AppState>,
    Json(request): Json<FetchJdRequest>,
) -> Result<Json<FetchJdResponse>, AppError> {
    let url = request.url.trim();
    if url.is_empty() {
        return Err(AppError::Validation("url cannot be empty".to_string()));
    }

    let outcome = state.fetcher.fetch(url).await;
    let display_text = outcome.display_text().to_string();

    Ok(Json(FetchJdResponse {
        outcome,
        display_text,
    }))
}
