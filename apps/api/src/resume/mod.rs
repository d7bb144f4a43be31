// Résumé upload: PDF text extraction, skill extraction and embedding.

pub mod handlers;
pub mod parser;
pub mod prompts;
