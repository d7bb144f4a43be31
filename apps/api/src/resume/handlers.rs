use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::matching::{Embedding, SkillSet};
use crate::state::AppState;

/// Everything a client needs to call the ranking endpoint afterwards.
#[derive(Debug, Serialize)]
pub struct UploadResumeResponse {
    pub resume_text: String,
    pub skills: SkillSet,
    pub embedding: Embedding,
}

/// POST /api/v1/resumes/upload
///
/// Multipart form with a single PDF in the `file` field.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResumeResponse>, AppError> {
    let mut document = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?;
            document = Some(bytes);
            break;
        }
    }
    let document = document
        .filter(|d| !d.is_empty())
        .ok_or(AppError::MissingField("file"))?;

    let parsed = state.resume_parser.parse(document).await?;
    let embedding = state
        .embedder
        .embed(&parsed.text)
        .await
        .map_err(|e| AppError::Llm(format!("Resume embedding failed: {e}")))?;

    info!(
        skills = parsed.skills.len(),
        dimensions = embedding.len(),
        "Resume uploaded"
    );
    Ok(Json(UploadResumeResponse {
        resume_text: parsed.text,
        skills: parsed.skills,
        embedding,
    }))
}
