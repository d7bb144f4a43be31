//! Match Explanation: free-text reasoning about one résumé/job pair.
//! Downstream of ranking; never feeds back into scores.

use tracing::debug;

use crate::errors::AppError;
use crate::jobs::prompts::{
    EXPLANATION_PROMPT_TEMPLATE, EXPLANATION_RESUME_MAX_CHARS, EXPLANATION_SYSTEM,
};
use crate::llm_client::prompts::{truncate_chars, PLAIN_TEXT_INSTRUCTION};
use crate::llm_client::ChatModel;

pub async fn explain_match(
    chat: &dyn ChatModel,
    resume_text: &str,
    job_title: &str,
    job_desc: &str,
    score: f64,
) -> Result<String, AppError> {
    let prompt = build_explanation_prompt(resume_text, job_title, job_desc, score);
    let system = format!("{EXPLANATION_SYSTEM} {PLAIN_TEXT_INSTRUCTION}");

    let explanation = chat
        .complete(&prompt, &system)
        .await
        .map_err(|e| AppError::Llm(format!("Explain match failed: {e}")))?;

    debug!(job_title, chars = explanation.len(), "Generated match explanation");
    Ok(explanation.trim().to_string())
}

fn build_explanation_prompt(resume_text: &str, job_title: &str, job_desc: &str, score: f64) -> String {
    EXPLANATION_PROMPT_TEMPLATE
        .replace("{resume_text}", truncate_chars(resume_text, EXPLANATION_RESUME_MAX_CHARS))
        .replace("{job_title}", job_title)
        .replace("{job_desc}", job_desc)
        .replace("{score}", &score.to_string())
}
