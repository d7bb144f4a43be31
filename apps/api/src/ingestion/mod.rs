// Job ingestion: pull listings from the feed, skip ones already stored,
// embed and insert the rest. Runs on a schedule and on demand.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::errors::AppError;
use crate::jobs::store::JobStore;
use crate::llm_client::embeddings::Embedder;
use crate::llm_client::LlmError;
use crate::state::AppState;

pub mod handlers;
pub mod remotive;

use remotive::{fetch_jobs, normalize_job, RemotiveJob};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("fetching job feed failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("unexpected job feed response: {0}")]
    UnexpectedResponse(String),

    #[error("embedding job failed: {0}")]
    Embedding(#[from] LlmError),

    #[error("job store failed: {0}")]
    Store(#[from] AppError),
}

/// Counts from one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub fetched: usize,
    pub inserted: usize,
    pub skipped: usize,
}

/// Fetches the feed at `url` and stores every listing not already present.
pub async fn ingest_jobs(
    http: &Client,
    url: &str,
    embedder: &dyn Embedder,
    store: &dyn JobStore,
) -> Result<IngestReport, IngestError> {
    let listings = fetch_jobs(http, url).await?;
    info!(count = listings.len(), "Fetched job feed");
    ingest_listings(listings, embedder, store).await
}

/// Stores listings whose `(title, company)` is new, in feed order.
/// Duplicates are skipped before they are embedded.
pub async fn ingest_listings(
    listings: Vec<RemotiveJob>,
    embedder: &dyn Embedder,
    store: &dyn JobStore,
) -> Result<IngestReport, IngestError> {
    let mut report = IngestReport {
        fetched: listings.len(),
        ..Default::default()
    };
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for listing in listings {
        if listing.title.trim().is_empty() {
            warn!(company = %listing.company_name, "Skipping listing without a title");
            report.skipped += 1;
            continue;
        }

        let key = (listing.title.clone(), listing.company_name.clone());
        if seen.contains(&key) || store.exists(&key.0, &key.1).await? {
            debug!(title = %key.0, company = %key.1, "Skipping duplicate job");
            report.skipped += 1;
            continue;
        }

        let job = normalize_job(listing, embedder).await?;
        store.insert(&job).await?;
        seen.insert(key);
        report.inserted += 1;
    }

    info!(
        fetched = report.fetched,
        inserted = report.inserted,
        skipped = report.skipped,
        "Job ingestion finished"
    );
    Ok(report)
}

/// Runs one ingestion pass with the collaborators in `state`, logging the outcome.
pub async fn run_ingestion(state: &AppState) -> Option<IngestReport> {
    match ingest_jobs(
        &state.http,
        &state.config.jobs_feed_url,
        state.embedder.as_ref(),
        state.jobs.as_ref(),
    )
    .await
    {
        Ok(report) => Some(report),
        Err(e) => {
            error!("Job ingestion failed: {e}");
            None
        }
    }
}

/// Longest supported gap between scheduled runs (one year).
const MAX_INGEST_INTERVAL_HOURS: u64 = 24 * 365;

/// Scheduler period for `hours`, capped at `MAX_INGEST_INTERVAL_HOURS`.
/// `None` means scheduling is disabled.
fn ingest_period(hours: u64) -> Option<Duration> {
    if hours == 0 {
        return None;
    }
    if hours > MAX_INGEST_INTERVAL_HOURS {
        warn!("INGEST_INTERVAL_HOURS={hours} capped at {MAX_INGEST_INTERVAL_HOURS}");
    }
    Some(Duration::from_secs(hours.min(MAX_INGEST_INTERVAL_HOURS) * 60 * 60))
}

/// Starts periodic ingestion, first run immediately.
/// Returns `None` when the interval is 0 (scheduling disabled).
pub fn spawn_ingest_scheduler(state: AppState) -> Option<JoinHandle<()>> {
    let Some(period) = ingest_period(state.config.ingest_interval_hours) else {
        info!("Scheduled job ingestion disabled");
        return None;
    };

    info!("Scheduling job ingestion every {}h", period.as_secs() / 3600);
    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            run_ingestion(&state).await;
        }
    }))
}
