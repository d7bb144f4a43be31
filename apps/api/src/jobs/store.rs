use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::job::{NewJob, StoredJob};

/// The job catalog. Ranking reads it whole; ingestion writes to it.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Every stored job, oldest first.
    async fn fetch_all(&self) -> Result<Vec<StoredJob>, AppError>;

    /// Whether a job with this exact title at this company is already stored.
    async fn exists(&self, title: &str, company: &str) -> Result<bool, AppError>;

    /// Inserts a job and returns its id.
    async fn insert(&self, job: &NewJob) -> Result<i64, AppError>;
}

#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn fetch_all(&self) -> Result<Vec<StoredJob>, AppError> {
        Ok(sqlx::query_as::<_, StoredJob>(
            r#"
            SELECT id, title, company, description, remote, skills, embedding, created_at
            FROM jobs
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn exists(&self, title: &str, company: &str) -> Result<bool, AppError> {
        Ok(sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM jobs WHERE title = $1 AND company = $2)",
        )
        .bind(title)
        .bind(company)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn insert(&self, job: &NewJob) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO jobs (title, company, description, remote, skills, embedding)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.description)
        .bind(job.remote)
        .bind(Json(&job.skills))
        .bind(Json(&job.embedding))
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted job {id}: {} @ {}", job.title, job.company);
        Ok(id)
    }
}
