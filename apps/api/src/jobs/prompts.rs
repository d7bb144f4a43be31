// Prompt constants for match explanations.

/// At most this many characters of résumé text go into an explanation prompt.
pub const EXPLANATION_RESUME_MAX_CHARS: usize = 1000;

pub const EXPLANATION_SYSTEM: &str = "You are a candid career coach. \
    Given a candidate summary, a job and a numeric fit score between -1 and 1, \
    explain the fit in a few short paragraphs and give concrete steps that would \
    improve the candidate's callback chances. Do not invent experience the \
    candidate does not have.";

/// Replace: {resume_text}, {job_title}, {job_desc}, {score}
pub const EXPLANATION_PROMPT_TEMPLATE: &str = "Candidate: {resume_text}
Job: {job_title}
Description: {job_desc}
Fit score: {score}.
Explain why this is a good fit and how to improve callback chances.";
