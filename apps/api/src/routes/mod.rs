pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::ingestion;
use crate::jobs;
use crate::resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Résumé API
        .route(
            "/api/v1/resumes/upload",
            post(resume::handlers::handle_upload_resume),
        )
        // Jobs API
        .route("/api/v1/jobs/rank", post(jobs::handlers::handle_rank_jobs))
        .route(
            "/api/v1/jobs/explain",
            post(jobs::handlers::handle_explain_match),
        )
        // Admin
        .route(
            "/api/v1/admin/ingest-jobs",
            post(ingestion::handlers::handle_ingest_jobs),
        )
        .with_state(state)
}
