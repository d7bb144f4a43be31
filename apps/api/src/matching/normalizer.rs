//! Record Normalizer: turns a stored job's embedding/skills columns into
//! canonical `Embedding` / `SkillSet` values.
//!
//! Stored values arrive either as native JSON arrays or as a JSON array
//! encoded into a string. Anything that cannot be decoded degrades to an
//! empty value with a warning; a single malformed record never fails the
//! ranking pass it belongs to.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::matching::{Embedding, SkillSet};
use crate::models::job::StoredJob;

/// A stored field as it came out of the store, before normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawField<'a> {
    Native(&'a [Value]),
    Encoded(&'a str),
    Null,
    /// Numbers, booleans and objects: nothing we can read a list from.
    Unsupported(&'a Value),
}

impl<'a> From<&'a Value> for RawField<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => RawField::Native(items),
            Value::String(s) => RawField::Encoded(s),
            Value::Null => RawField::Null,
            other => RawField::Unsupported(other),
        }
    }
}

#[derive(Debug, Error)]
enum DecodeError {
    #[error("field is null")]
    Null,

    #[error("expected an array, found {0}")]
    Unsupported(&'static str),

    #[error("encoded value is not a JSON array: {0}")]
    Encoded(#[from] serde_json::Error),

    #[error("element {index} is not a number")]
    NotANumber { index: usize },
}

/// A stored job with its embedding and skills in canonical form.
/// Borrows everything else from the stored row.
#[derive(Debug, Clone)]
pub struct JobRecord<'a> {
    pub job: &'a StoredJob,
    pub embedding: Embedding,
    pub skills: SkillSet,
}

/// Normalizes one stored job. Never fails.
pub fn normalize_record(job: &StoredJob) -> JobRecord<'_> {
    JobRecord {
        job,
        embedding: normalize_embedding(job.id, RawField::from(&job.embedding)),
        skills: normalize_skills(job.id, RawField::from(&job.skills)),
    }
}

/// Decodes an embedding, falling back to an empty vector.
pub fn normalize_embedding(job_id: i64, raw: RawField<'_>) -> Embedding {
    decode_embedding(raw).unwrap_or_else(|e| {
        log_fallback(job_id, "embedding", &e);
        Vec::new()
    })
}

/// Decodes a skill list, falling back to an empty set.
pub fn normalize_skills(job_id: i64, raw: RawField<'_>) -> SkillSet {
    decode_skills(job_id, raw).unwrap_or_else(|e| {
        log_fallback(job_id, "skills", &e);
        SkillSet::new()
    })
}

fn decode_embedding(raw: RawField<'_>) -> Result<Embedding, DecodeError> {
    match raw {
        RawField::Native(items) => numbers(items),
        RawField::Encoded(text) => {
            let items: Vec<Value> = serde_json::from_str(text)?;
            numbers(&items)
        }
        RawField::Null => Err(DecodeError::Null),
        RawField::Unsupported(v) => Err(DecodeError::Unsupported(kind_of(v))),
    }
}

/// An embedding is all-or-nothing: a single bad element discards the vector,
/// since a shortened vector would no longer match the résumé's dimensionality.
fn numbers(items: &[Value]) -> Result<Embedding, DecodeError> {
    items
        .iter()
        .enumerate()
        .map(|(index, v)| v.as_f64().ok_or(DecodeError::NotANumber { index }))
        .collect()
}

fn decode_skills(job_id: i64, raw: RawField<'_>) -> Result<SkillSet, DecodeError> {
    match raw {
        RawField::Native(items) => Ok(strings(job_id, items)),
        RawField::Encoded(text) => {
            let items: Vec<Value> = serde_json::from_str(text)?;
            Ok(strings(job_id, &items))
        }
        RawField::Null => Err(DecodeError::Null),
        RawField::Unsupported(v) => Err(DecodeError::Unsupported(kind_of(v))),
    }
}

/// Keeps the string tags and drops anything else.
fn strings(job_id: i64, items: &[Value]) -> SkillSet {
    let skills: SkillSet = items
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();
    let dropped = items.iter().filter(|v| !v.is_string()).count();
    if dropped > 0 {
        warn!(job_id, dropped, "Ignoring non-string skill tags");
    }
    skills
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn log_fallback(job_id: i64, field: &str, err: &DecodeError) {
    match err {
        DecodeError::Null => debug!(job_id, field, "Stored field is null, using empty value"),
        _ => warn!(job_id, field, error = %err, "Undecodable stored field, using empty value"),
    }
}
