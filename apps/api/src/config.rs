use std::str::FromStr;

use anyhow::{Context, Result};

/// Remote software-development listings, the default ingestion source.
pub const DEFAULT_JOBS_FEED_URL: &str = "https://remotive.com/api/remote-jobs?category=software-dev";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openai_api_key: String,
    pub groq_api_key: String,
    pub jobs_feed_url: String,
    /// 0 disables scheduled ingestion.
    pub ingest_interval_hours: u64,
    pub rank_timeout_ms: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            groq_api_key: require_env("GROQ_API_KEY")?,
            jobs_feed_url: std::env::var("JOBS_FEED_URL")
                .unwrap_or_else(|_| DEFAULT_JOBS_FEED_URL.to_string()),
            ingest_interval_hours: parse_or_default(
                "INGEST_INTERVAL_HOURS",
                std::env::var("INGEST_INTERVAL_HOURS").ok(),
                24,
            )?,
            rank_timeout_ms: parse_or_default(
                "RANK_TIMEOUT_MS",
                std::env::var("RANK_TIMEOUT_MS").ok(),
                5000,
            )?,
            port: parse_or_default("PORT", std::env::var("PORT").ok(), 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_or_default<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{value}'")),
        None => Ok(default),
    }
}
