use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::ingestion::run_ingestion;
use crate::state::AppState;

/// POST /api/v1/admin/ingest-jobs
///
/// Starts one ingestion run in the background and returns immediately.
pub async fn handle_ingest_jobs(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    tokio::spawn(async move {
        run_ingestion(&state).await;
    });
    (
        StatusCode::ACCEPTED,
        Json(json!({ "status": "Scraping started in background" })),
    )
}
