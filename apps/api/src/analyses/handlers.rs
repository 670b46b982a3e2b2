//! Axum route handlers for the Analyses API.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analyses::store::Analysis;
use crate::errors::AppError;
use crate::ingest::pdf::extract_text_from_pdf;
use crate::matching::highlight::{
    all_skills, compare_skills, highlight_skills, shared_skills, CategoryComparison,
};
use crate::matching::orchestrator::MatchResult;
use crate::matching::ranker::{rank_resumes, RankedEntry, ResumeInput};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TextAnalysisRequest {
    pub jd_text: String,
    pub resumes: Vec<ResumeInput>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub best: Option<RankedEntry>,
    pub results: Vec<RankedEntry>,
}

impl From<&Analysis> for AnalysisResponse {
    fn from(analysis: &Analysis) -> Self {
        Self {
            analysis_id: analysis.id,
            created_at: analysis.created_at,
            best: analysis.ranked.best().cloned(),
            results: analysis.ranked.entries.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResumeDetailResponse {
    pub resume_id: String,
    pub rank: usize,
    pub result: MatchResult,
    pub skill_comparison: BTreeMap<String, CategoryComparison>,
    /// HTML fragment of the job description with skills marked.
    pub highlighted_jd: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyses
///
/// Multipart upload: one or more `resume` PDF parts and a `jd_text` part.
pub async fn handle_create_analysis(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut jd_text = String::new();
    let mut uploads: Vec<(String, Bytes)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::UnprocessableEntity(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "jd_text" => {
                jd_text = field.text().await.map_err(|e| {
                    AppError::UnprocessableEntity(format!("Unreadable jd_text: {e}"))
                })?;
            }
            "resume" => {
                let file_name = field
                    .file_name()
                    .map(String::from)
                    .unwrap_or_else(|| format!("resume-{}.pdf", uploads.len() + 1));
                let data = field.bytes().await.map_err(|e| {
                    AppError::UnprocessableEntity(format!("Unreadable resume upload: {e}"))
                })?;
                uploads.push((file_name, data));
            }
            other => warn!("Ignoring unexpected multipart field '{other}'"),
        }
    }

    validate_inputs(&jd_text, uploads.iter().map(|(name, _)| name.as_str()))?;

    let timeout = Duration::from_secs(state.config.pdf_extract_timeout_secs);
    let resumes = extract_resumes(uploads, timeout, extract_text_from_pdf).await;

    run_analysis(&state, jd_text, resumes).await
}

/// POST /api/v1/analyses/text
///
/// Same as the upload endpoint, with resume text supplied directly.
pub async fn handle_create_text_analysis(
    State(state): State<AppState>,
    Json(request): Json<TextAnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    validate_inputs(
        &request.jd_text,
        request.resumes.iter().map(|r| r.resume_id.as_str()),
    )?;
    run_analysis(&state, request.jd_text, request.resumes).await
}

/// GET /api/v1/analyses/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(analysis_id): Path<Uuid>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let analysis = find_analysis(&state, analysis_id).await?;
    Ok(Json(AnalysisResponse::from(analysis.as_ref())))
}

/// GET /api/v1/analyses/:id/resumes/:resume_id
///
/// Skill comparison and highlighted job description for one ranked resume.
pub async fn handle_get_resume_detail(
    State(state): State<AppState>,
    Path((analysis_id, resume_id)): Path<(Uuid, String)>,
) -> Result<Json<ResumeDetailResponse>, AppError> {
    let analysis = find_analysis(&state, analysis_id).await?;
    let entry = analysis.ranked.get(&resume_id).ok_or_else(|| {
        AppError::NotFound(format!(
            "Resume '{resume_id}' not found in analysis {analysis_id}"
        ))
    })?;

    let result = &entry.result;
    let highlighted_jd = highlight_skills(
        &analysis.jd_text,
        &shared_skills(&result.resume_skills, &result.jd_skills),
        &all_skills(&result.jd_skills),
    );

    Ok(Json(ResumeDetailResponse {
        resume_id: entry.resume_id.clone(),
        rank: entry.rank,
        skill_comparison: compare_skills(&result.resume_skills, &result.jd_skills),
        result: result.clone(),
        highlighted_jd,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn validate_inputs<'a>(
    jd_text: &str,
    resume_ids: impl Iterator<Item = &'a str>,
) -> Result<(), AppError> {
    if jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".to_string()));
    }

    let mut seen = std::collections::BTreeSet::new();
    for id in resume_ids {
        if id.trim().is_empty() {
            return Err(AppError::Validation(
                "resume_id cannot be empty".to_string(),
            ));
        }
        if !seen.insert(id) {
            return Err(AppError::Validation(format!("duplicate resume '{id}'")));
        }
    }
    if seen.is_empty() {
        return Err(AppError::Validation(
            "at least one resume is required".to_string(),
        ));
    }
    Ok(())
}

/// Extracts every upload concurrently, each on its own blocking task with its
/// own deadline. Extractions that fail or time out score as empty resumes.
/// Output keeps upload order.
async fn extract_resumes(
    uploads: Vec<(String, Bytes)>,
    timeout: Duration,
    extract: fn(&[u8]) -> String,
) -> Vec<ResumeInput> {
    let mut resumes: Vec<ResumeInput> = uploads
        .iter()
        .map(|(resume_id, _)| ResumeInput {
            resume_id: resume_id.clone(),
            text: String::new(),
        })
        .collect();

    let mut tasks = JoinSet::new();
    for (index, (resume_id, data)) in uploads.into_iter().enumerate() {
        tasks.spawn(async move {
            let job = tokio::task::spawn_blocking(move || extract(&data));
            // A timed-out blocking task keeps its thread until it returns; only the wait is dropped.
            let text = match tokio::time::timeout(timeout, job).await {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => {
                    warn!("PDF extraction task for '{resume_id}' failed: {e}");
                    String::new()
                }
                Err(_) => {
                    warn!("PDF extraction for '{resume_id}' timed out after {timeout:?}");
                    String::new()
                }
            };
            if text.is_empty() {
                warn!("No extractable text in '{resume_id}'; scoring as empty resume");
            }
            (index, text)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, text)) => resumes[index].text = text,
            Err(e) => warn!("PDF extraction task failed to join: {e}"),
        }
    }
    resumes
}

async fn run_analysis(
    state: &AppState,
    jd_text: String,
    resumes: Vec<ResumeInput>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let taxonomy = Arc::clone(&state.taxonomy);
    let weights = Arc::clone(&state.weights);
    let jd = jd_text.clone();

    let ranked =
        tokio::task::spawn_blocking(move || rank_resumes(&resumes, &jd, &taxonomy, &weights))
            .await
            .map_err(|e| AppError::Internal(anyhow!("Ranking task failed: {e}")))?;

    let analysis = state.analyses.insert(Analysis::new(jd_text, ranked)).await;
    info!(
        analysis_id = %analysis.id,
        resumes = analysis.ranked.len(),
        best_score = analysis.ranked.best().map(|b| b.result.final_score),
        "Analysis complete"
    );

    Ok(Json(AnalysisResponse::from(analysis.as_ref())))
}

async fn find_analysis(state: &AppState, analysis_id: Uuid) -> Result<Arc<Analysis>, AppError> {
    state
        .analyses
        .get(analysis_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Analysis {analysis_id} not found")))
}
