use std::sync::Arc;

use crate::config::Config;
use crate::jobs::store::JobStore;
use crate::llm_client::embeddings::Embedder;
use crate::llm_client::ChatModel;
use crate::resume::parser::ResumeParser;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every external collaborator is a trait object built once in `main`;
/// tests build the same state from fakes.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<dyn JobStore>,
    pub chat: Arc<dyn ChatModel>,
    pub embedder: Arc<dyn Embedder>,
    pub resume_parser: Arc<dyn ResumeParser>,
    /// Plain HTTP client for the job listings feed.
    pub http: reqwest::Client,
    pub config: Config,
}
