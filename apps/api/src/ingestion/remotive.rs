//! Remotive job feed: fetch and normalize listings into `NewJob`s.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::ingestion::IngestError;
use crate::llm_client::embeddings::Embedder;
use crate::models::job::NewJob;

const FEED_TIMEOUT: Duration = Duration::from_secs(10);

/// Location value that marks a listing as open to anyone, anywhere.
const WORLDWIDE: &str = "Worldwide";

/// One listing as served by the feed. Fields the feed omits default to empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemotiveJob {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub candidate_required_location: String,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// GET the feed and return its listings.
pub async fn fetch_jobs(http: &Client, url: &str) -> Result<Vec<RemotiveJob>, IngestError> {
    let body: Value = http
        .get(url)
        .timeout(FEED_TIMEOUT)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    parse_feed(body)
}

/// Pulls the `jobs` array out of a feed body.
pub fn parse_feed(body: Value) -> Result<Vec<RemotiveJob>, IngestError> {
    let Some(jobs) = body.get("jobs").filter(|j| j.is_array()) else {
        return Err(IngestError::UnexpectedResponse(
            "feed body has no `jobs` array".to_string(),
        ));
    };
    serde_json::from_value(jobs.clone())
        .map_err(|e| IngestError::UnexpectedResponse(format!("malformed listing: {e}")))
}

/// Maps a listing to a storable job, embedding its title, description and type.
pub async fn normalize_job(job: RemotiveJob, embedder: &dyn Embedder) -> Result<NewJob, IngestError> {
    let embedding_input = format!("{} {} {}", job.title, job.description, job.job_type);
    let embedding = embedder.embed(&embedding_input).await?;

    Ok(NewJob {
        remote: job.candidate_required_location == WORLDWIDE,
        title: job.title,
        company: job.company_name,
        description: job.description,
        skills: job.tags,
        embedding,
    })
}
