//! Fakes for the injected collaborators, shared by unit and router tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use serde_json::{json, Value};

use crate::config::{Config, DEFAULT_JOBS_FEED_URL};
use crate::errors::AppError;
use crate::jobs::store::JobStore;
use crate::llm_client::embeddings::Embedder;
use crate::llm_client::{ChatModel, LlmError};
use crate::matching::Embedding;
use crate::models::job::{NewJob, StoredJob};
use crate::resume::parser::{ParsedResume, ResumeParser};
use crate::state::AppState;

pub fn stored_job(id: i64, title: &str, skills: Value, embedding: Value) -> StoredJob {
    StoredJob {
        id,
        title: title.to_string(),
        company: format!("Company {id}"),
        description: format!("{title} description"),
        remote: true,
        skills,
        embedding,
        created_at: Utc::now(),
    }
}

/// Chat model with a canned reply (or a canned failure) that records prompts.
pub struct FakeChat {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl FakeChat {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for FakeChat {
    async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().ok_or(LlmError::Api {
            status: 503,
            message: "model unavailable".to_string(),
        })
    }
}

/// Embedder returning one fixed vector and recording its inputs.
pub struct FakeEmbedder {
    vector: Option<Embedding>,
    inputs: Mutex<Vec<String>>,
}

impl FakeEmbedder {
    pub fn returning(vector: Embedding) -> Self {
        Self {
            vector: Some(vector),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            vector: None,
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, LlmError> {
        self.inputs.lock().unwrap().push(text.to_string());
        self.vector.clone().ok_or(LlmError::EmptyContent)
    }
}

/// Résumé parser with a canned result; `None` fails as an unreadable PDF.
pub struct FakeResumeParser {
    parsed: Option<ParsedResume>,
}

impl FakeResumeParser {
    pub fn returning(text: &str, skills: &[&str]) -> Self {
        Self {
            parsed: Some(ParsedResume {
                text: text.to_string(),
                skills: skills.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }

    pub fn failing() -> Self {
        Self { parsed: None }
    }
}

#[async_trait]
impl ResumeParser for FakeResumeParser {
    async fn parse(&self, _document: Bytes) -> Result<ParsedResume, AppError> {
        self.parsed
            .clone()
            .ok_or_else(|| AppError::Parse("Resume parsing failed: not a PDF".to_string()))
    }
}

/// Job store backed by a vector; ids are assigned in insertion order.
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: Mutex<Vec<StoredJob>>,
}

impl InMemoryJobStore {
    pub fn with_jobs(jobs: Vec<StoredJob>) -> Self {
        Self {
            jobs: Mutex::new(jobs),
        }
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn fetch_all(&self) -> Result<Vec<StoredJob>, AppError> {
        Ok(self.jobs.lock().unwrap().clone())
    }

    async fn exists(&self, title: &str, company: &str) -> Result<bool, AppError> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .any(|j| j.title == title && j.company == company))
    }

    async fn insert(&self, job: &NewJob) -> Result<i64, AppError> {
        let mut jobs = self.jobs.lock().unwrap();
        let id = jobs.iter().map(|j| j.id).max().unwrap_or(0) + 1;
        jobs.push(StoredJob {
            id,
            title: job.title.clone(),
            company: job.company.clone(),
            description: job.description.clone(),
            remote: job.remote,
            skills: json!(job.skills),
            embedding: json!(job.embedding),
            created_at: Utc::now(),
        });
        Ok(id)
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/unused".to_string(),
        openai_api_key: "test".to_string(),
        groq_api_key: "test".to_string(),
        jobs_feed_url: DEFAULT_JOBS_FEED_URL.to_string(),
        ingest_interval_hours: 0,
        rank_timeout_ms: 5_000,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

/// State wired entirely to fakes: empty catalog, working chat/embedder/parser.
pub fn test_state() -> AppState {
    AppState {
        jobs: Arc::new(InMemoryJobStore::default()),
        chat: Arc::new(FakeChat::replying("Strong overlap on Python.")),
        embedder: Arc::new(FakeEmbedder::returning(vec![1.0, 0.0])),
        resume_parser: Arc::new(FakeResumeParser::returning("Python developer", &["Python"])),
        http: reqwest::Client::new(),
        config: test_config(),
    }
}
