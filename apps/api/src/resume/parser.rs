//! Résumé Parser: pulls plain text out of an uploaded PDF and asks the chat
//! model for the candidate's skills.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::prompts::{truncate_chars, PLAIN_TEXT_INSTRUCTION};
use crate::llm_client::ChatModel;
use crate::matching::SkillSet;
use crate::resume::prompts::{
    SKILL_EXTRACTION_PROMPT_TEMPLATE, SKILL_EXTRACTION_SYSTEM, SKILL_PROMPT_MAX_CHARS,
};

/// Text and skills extracted from one résumé.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResume {
    pub text: String,
    pub skills: SkillSet,
}

/// Document/skill extraction service.
#[async_trait]
pub trait ResumeParser: Send + Sync {
    async fn parse(&self, document: Bytes) -> Result<ParsedResume, AppError>;
}

/// PDF text via `pdf-extract`, skills via the chat model.
pub struct LlmResumeParser {
    chat: Arc<dyn ChatModel>,
}

impl LlmResumeParser {
    pub fn new(chat: Arc<dyn ChatModel>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl ResumeParser for LlmResumeParser {
    async fn parse(&self, document: Bytes) -> Result<ParsedResume, AppError> {
        let text = extract_pdf_text(document).await?;
        let skills = extract_skills(&text, self.chat.as_ref()).await?;
        info!(
            chars = text.len(),
            skills = skills.len(),
            "Parsed resume"
        );
        Ok(ParsedResume { text, skills })
    }
}

/// Extracts the text layer of a PDF on the blocking pool.
/// A panic inside the extractor is reported as a parse failure.
pub async fn extract_pdf_text(document: Bytes) -> Result<String, AppError> {
    let extracted = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&document).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| AppError::Parse(format!("Resume parsing failed: PDF reader crashed: {e}")))?
    .map_err(|e| AppError::Parse(format!("Resume parsing failed: {e}")))?;

    let text = extracted.trim().to_string();
    if text.is_empty() {
        return Err(AppError::Parse(
            "Resume parsing failed: no extractable text".to_string(),
        ));
    }
    Ok(text)
}

/// Asks the chat model for the résumé's skills.
pub async fn extract_skills(text: &str, chat: &dyn ChatModel) -> Result<SkillSet, AppError> {
    let prompt = SKILL_EXTRACTION_PROMPT_TEMPLATE
        .replace("{resume_text}", truncate_chars(text, SKILL_PROMPT_MAX_CHARS));
    let system = format!("{SKILL_EXTRACTION_SYSTEM} {PLAIN_TEXT_INSTRUCTION}");

    let reply = chat
        .complete(&prompt, &system)
        .await
        .map_err(|e| AppError::Parse(format!("Resume parsing failed: {e}")))?;

    let skills = parse_skill_list(&reply);
    debug!(?skills, "Extracted skills");
    Ok(skills)
}

/// Splits a model reply like `"Python, SQL\n- Docker"` into skills.
pub fn parse_skill_list(reply: &str) -> SkillSet {
    reply
        .split([',', '\n', ';'])
        .map(strip_list_marker)
        .map(|s| s.trim_end_matches('.').trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Drops a leading `-`, `*`, `•` or `1.` / `1)` list marker.
fn strip_list_marker(item: &str) -> &str {
    let item = item.trim();
    if let Some(rest) = item.strip_prefix(['-', '*', '•']) {
        return rest.trim_start();
    }
    let digits = item.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        if let Some(rest) = item[digits..].strip_prefix(['.', ')']) {
            return rest.trim_start();
        }
    }
    item
}
