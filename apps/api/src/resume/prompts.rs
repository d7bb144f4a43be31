// Prompt constants for résumé skill extraction.

/// At most this many characters of résumé text are sent for skill extraction.
pub const SKILL_PROMPT_MAX_CHARS: usize = 4000;

pub const SKILL_EXTRACTION_SYSTEM: &str = "You are a technical recruiter who reads resumes \
    and lists the candidate's concrete skills: languages, frameworks, tools, platforms \
    and domain expertise. Answer with the skills only, as one comma-separated line.";

/// Replace `{resume_text}` before sending.
pub const SKILL_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract key skills as a list from this resume text.
Return ONLY a comma-separated list, for example: Python, SQL, Docker, Machine Learning

RESUME TEXT:
{resume_text}"#;
