//! Axum route handlers for the Jobs API.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::jobs::explain::explain_match;
use crate::matching::ranking::{rank_jobs_cancellable, RankingError, ScoredJob};
use crate::matching::{Embedding, SkillSet};
use crate::models::job::StoredJob;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Every field is optional on the wire so an absent one is reported as
/// `MISSING_FIELD` rather than a generic body rejection.
#[derive(Debug, Deserialize)]
pub struct RankJobsRequest {
    pub resume_text: Option<String>,
    pub embedding: Option<Embedding>,
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct RankJobsResponse {
    pub ranked_jobs: Vec<ScoredJob>,
}

#[derive(Debug, Deserialize)]
pub struct ExplainMatchRequest {
    pub resume_text: Option<String>,
    pub job_title: Option<String>,
    pub job_desc: Option<String>,
    pub score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ExplainMatchResponse {
    pub explanation: String,
}

/// A validated ranking request.
struct ResumeInput {
    text: String,
    embedding: Embedding,
    skills: SkillSet,
}

impl RankJobsRequest {
    fn validate(self) -> Result<ResumeInput, AppError> {
        let text = self
            .resume_text
            .filter(|t| !t.trim().is_empty())
            .ok_or(AppError::MissingField("resume_text"))?;
        let embedding = self
            .embedding
            .filter(|e| !e.is_empty())
            .ok_or(AppError::MissingField("embedding"))?;
        let skills = self.skills.ok_or(AppError::MissingField("skills"))?;

        Ok(ResumeInput {
            text,
            embedding,
            skills: skills.into_iter().collect(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/rank
///
/// Ranks the whole job catalog against an already-parsed résumé and returns
/// the best-fit jobs, best first.
pub async fn handle_rank_jobs(
    State(state): State<AppState>,
    Json(request): Json<RankJobsRequest>,
) -> Result<Json<RankJobsResponse>, AppError> {
    let input = request.validate()?;

    let catalog = state.jobs.fetch_all().await?;
    let catalog_size = catalog.len();

    let cancel = Arc::new(AtomicBool::new(false));
    let ranked_jobs =
        rank_with_deadline(catalog, input, state.config.rank_timeout_ms, cancel).await?;

    info!(
        catalog_size,
        returned = ranked_jobs.len(),
        top_score = ranked_jobs.first().map(|j| j.score),
        "Ranked jobs"
    );
    Ok(Json(RankJobsResponse { ranked_jobs }))
}

/// Runs the ranking pass on the blocking pool. If it outlives the deadline
/// `cancel` is set and the request fails; no partial list escapes.
async fn rank_with_deadline(
    catalog: Vec<StoredJob>,
    input: ResumeInput,
    timeout_ms: u64,
    cancel: Arc<AtomicBool>,
) -> Result<Vec<ScoredJob>, AppError> {
    let flag = Arc::clone(&cancel);

    let task = tokio::task::spawn_blocking(move || {
        rank_jobs_cancellable(
            &catalog,
            &input.text,
            &input.embedding,
            &input.skills,
            &flag,
        )
    });

    match tokio::time::timeout(Duration::from_millis(timeout_ms), task).await {
        Ok(Ok(ranked)) => Ok(ranked?),
        Ok(Err(join_error)) => Err(RankingError::Aborted(join_error.to_string()).into()),
        Err(_) => {
            cancel.store(true, Ordering::Relaxed);
            Err(AppError::RankingTimeout(timeout_ms))
        }
    }
}

/// POST /api/v1/jobs/explain
///
/// Returns a natural-language explanation of one résumé/job fit.
pub async fn handle_explain_match(
    State(state): State<AppState>,
    Json(request): Json<ExplainMatchRequest>,
) -> Result<Json<ExplainMatchResponse>, AppError> {
    let resume_text = request
        .resume_text
        .filter(|t| !t.trim().is_empty())
        .ok_or(AppError::MissingField("resume_text"))?;
    let job_title = request
        .job_title
        .filter(|t| !t.trim().is_empty())
        .ok_or(AppError::MissingField("job_title"))?;
    let score = request.score.ok_or(AppError::MissingField("score"))?;
    let job_desc = request.job_desc.unwrap_or_default();

    let explanation = explain_match(
        state.chat.as_ref(),
        &resume_text,
        &job_title,
        &job_desc,
        score,
    )
    .await?;

    Ok(Json(ExplainMatchResponse { explanation }))
}
