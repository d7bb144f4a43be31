use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// A row of the `jobs` table as stored.
///
/// `skills` and `embedding` are JSONB and come back untouched: newer rows
/// hold native arrays, older ones hold the array JSON-encoded as a string.
/// `matching::normalizer` turns them into canonical values.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredJob {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub description: String,
    pub remote: bool,
    pub skills: Value,
    pub embedding: Value,
    pub created_at: DateTime<Utc>,
}

/// A normalized job ready for insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub description: String,
    pub remote: bool,
    pub skills: Vec<String>,
    pub embedding: Vec<f64>,
}
