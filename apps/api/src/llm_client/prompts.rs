// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Appended to system prompts whose answer is shown or parsed verbatim.
pub const PLAIN_TEXT_INSTRUCTION: &str = "Respond in plain text. \
    Do NOT use markdown headings or code fences. \
    Do NOT include apologies or preambles.";

/// Returns at most the first `max_chars` characters of `text`,
/// cut on a character boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
