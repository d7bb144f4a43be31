//! Ranking Engine: scores every job in the catalog against a résumé and
//! returns the best-fit jobs, best first.
//!
//! Algorithm, per job:
//! 1. normalize the stored embedding/skills (`normalizer`)
//! 2. sim = cosine(resume embedding, job embedding)
//! 3. overlap = |resume skills ∩ job skills| / |job skills|
//! 4. score = round(0.7 × sim + 0.3 × overlap, 3)
//!
//! Then sort descending (ties keep catalog order) and keep the top
//! `RANK_LIMIT`. The whole call either returns a full list or fails with a
//! single `RankingError`; it never hands back a partial ranking.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::matching::normalizer::{normalize_record, JobRecord};
use crate::matching::similarity::{cosine_similarity, ensure_usable, skill_overlap, SimilarityError};
use crate::matching::SkillSet;
use crate::models::job::StoredJob;

pub const SIMILARITY_WEIGHT: f64 = 0.7;
pub const OVERLAP_WEIGHT: f64 = 0.3;
/// Maximum number of jobs returned by one ranking call.
pub const RANK_LIMIT: usize = 10;

/// One ranked job as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredJob {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub description: String,
    pub skills: SkillSet,
    pub score: f64,
}

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("resume embedding cannot be compared: {0}")]
    ResumeEmbedding(#[source] SimilarityError),

    #[error("job {job_id} produced a non-finite score")]
    NonFiniteScore { job_id: i64 },

    #[error("ranking cancelled after {scored} of {total} jobs")]
    Cancelled { scored: usize, total: usize },

    /// The task running the ranking pass died before returning.
    #[error("ranking aborted: {0}")]
    Aborted(String),
}

/// Ranks `catalog` against a résumé. See the module docs for the algorithm.
///
/// `resume_text` is not part of the score; it is accepted so callers can
/// pass the same résumé triple they hand to the explanation step.
/// `cancel` is checked before scoring each job; once it is set the call
/// stops with `RankingError::Cancelled`.
pub fn rank_jobs_cancellable(
    catalog: &[StoredJob],
    resume_text: &str,
    resume_embedding: &[f64],
    resume_skills: &SkillSet,
    cancel: &AtomicBool,
) -> Result<Vec<ScoredJob>, RankingError> {
    debug!(
        catalog_size = catalog.len(),
        resume_chars = resume_text.len(),
        dimensions = resume_embedding.len(),
        "Ranking jobs"
    );

    ensure_usable(resume_embedding).map_err(RankingError::ResumeEmbedding)?;

    let total = catalog.len();
    // Indexed parallel collect keeps catalog order, which the stable sort
    // below relies on for ties.
    let mut scored: Vec<ScoredJob> = catalog
        .par_iter()
        .enumerate()
        .map(|(position, job)| {
            if cancel.load(Ordering::Relaxed) {
                return Err(RankingError::Cancelled {
                    scored: position,
                    total,
                });
            }
            let record = normalize_record(job);
            score_record(&record, resume_embedding, resume_skills)
        })
        .collect::<Result<_, _>>()?;

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(RANK_LIMIT);

    debug!(returned = scored.len(), "Ranking complete");
    Ok(scored)
}

fn score_record(
    record: &JobRecord<'_>,
    resume_embedding: &[f64],
    resume_skills: &SkillSet,
) -> Result<ScoredJob, RankingError> {
    let job = record.job;

    let sim = match cosine_similarity(resume_embedding, &record.embedding) {
        Ok(sim) => sim,
        Err(SimilarityError::DimensionMismatch { left, right }) if !record.embedding.is_empty() => {
            warn!(
                job_id = job.id,
                resume_dims = left,
                job_dims = right,
                "Embedding dimensionality mismatch, scoring similarity as 0"
            );
            0.0
        }
        Err(e) => {
            debug!(job_id = job.id, error = %e, "Unusable job embedding, scoring similarity as 0");
            0.0
        }
    };
    let overlap = skill_overlap(resume_skills, &record.skills);

    let score = composite_score(sim, overlap);
    if !score.is_finite() {
        return Err(RankingError::NonFiniteScore { job_id: job.id });
    }

    Ok(ScoredJob {
        id: job.id,
        title: job.title.clone(),
        company: job.company.clone(),
        description: job.description.clone(),
        skills: record.skills.clone(),
        score,
    })
}

/// `0.7 × sim + 0.3 × overlap`, rounded to three decimals.
pub fn composite_score(similarity: f64, overlap: f64) -> f64 {
    round3(SIMILARITY_WEIGHT * similarity + OVERLAP_WEIGHT * overlap)
}

/// Rounds to three decimals. A result of `-0.0` becomes `0.0` so it ties
/// with other zeros under `total_cmp` and never reaches the wire.
fn round3(value: f64) -> f64 {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::stored_job;
    use serde_json::{json, Value};

    fn rank_jobs(
        catalog: &[StoredJob],
        resume_text: &str,
        resume_embedding: &[f64],
        resume_skills: &SkillSet,
    ) -> Result<Vec<ScoredJob>, RankingError> {
        let never = AtomicBool::new(false);
        rank_jobs_cancellable(catalog, resume_text, resume_embedding, resume_skills, &never)
    }

    fn skills(items: &[&str]) -> SkillSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn job(id: i64, title: &str, skills: Value, embedding: Value) -> StoredJob {
        stored_job(id, title, skills, embedding)
    }

    fn titles(ranked: &[ScoredJob]) -> Vec<&str> {
        ranked.iter().map(|j| j.title.as_str()).collect()
    }

    #[test]
    fn test_composite_score_weights_and_rounding() {
        assert_eq!(composite_score(1.0, 1.0), 1.0);
        assert_eq!(composite_score(0.0, 0.0), 0.0);
        assert_eq!(composite_score(0.8, 0.5), 0.71);
        // 0.7 × 0.123456 + 0.3 × 0.5 = 0.2364192
        assert_eq!(composite_score(0.123456, 0.5), 0.236);
        assert_eq!(composite_score(-1.0, 0.0), -0.7);
    }

    #[test]
    fn test_two_job_scenario() {
        let catalog = vec![
            job(1, "A", json!(["Python"]), json!([1, 0, 0])),
            job(2, "B", json!(["Java"]), json!([0, 1, 0])),
        ];

        let ranked = rank_jobs(&catalog, "text", &[1.0, 0.0, 0.0], &skills(&["Python"])).unwrap();

        assert_eq!(titles(&ranked), vec!["A", "B"]);
        assert_eq!(ranked[0].score, 1.0);
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn test_output_is_sorted_best_first() {
        let catalog = vec![
            job(1, "weak", json!(["Go"]), json!([0.0, 1.0])),
            job(2, "strong", json!(["Rust"]), json!([1.0, 0.1])),
            job(3, "middle", json!(["Rust", "Go"]), json!([0.5, 0.5])),
        ];

        let ranked = rank_jobs(&catalog, "", &[1.0, 0.0], &skills(&["Rust"])).unwrap();

        assert_eq!(titles(&ranked), vec!["strong", "middle", "weak"]);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_output_is_capped() {
        let catalog: Vec<StoredJob> = (0..25)
            .map(|i| job(i, &format!("job-{i}"), json!([]), json!([1.0, i as f64])))
            .collect();

        let ranked = rank_jobs(&catalog, "", &[1.0, 0.0], &SkillSet::new()).unwrap();

        assert_eq!(ranked.len(), RANK_LIMIT);
        assert_eq!(ranked[0].title, "job-0");
    }

    #[test]
    fn test_small_catalog_returns_every_job() {
        let catalog: Vec<StoredJob> = (0..4)
            .map(|i| job(i, &format!("job-{i}"), json!([]), json!([1.0, 1.0])))
            .collect();

        let ranked = rank_jobs(&catalog, "", &[1.0, 0.0], &SkillSet::new()).unwrap();
        assert_eq!(ranked.len(), 4);
    }

    #[test]
    fn test_empty_catalog_returns_empty_list() {
        let ranked = rank_jobs(&[], "", &[1.0], &SkillSet::new()).unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog = vec![
            job(1, "first", json!(["SQL"]), json!([0.0, 1.0])),
            job(2, "second", json!(["SQL"]), json!([0.0, 1.0])),
            job(3, "top", json!(["SQL"]), json!([1.0, 0.0])),
            job(4, "third", json!(["SQL"]), json!([0.0, 1.0])),
        ];

        let ranked = rank_jobs(&catalog, "", &[1.0, 0.0], &skills(&["SQL"])).unwrap();

        assert_eq!(titles(&ranked), vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn test_near_zero_negative_score_ties_with_zero() {
        let catalog = vec![
            job(1, "first", json!([]), json!([-1e-9, 1.0])),
            job(2, "second", json!([]), json!([0.0, 1.0])),
        ];

        let ranked = rank_jobs(&catalog, "", &[1.0, 0.0], &SkillSet::new()).unwrap();

        assert_eq!(titles(&ranked), vec!["first", "second"]);
        assert!(ranked.iter().all(|j| j.score.to_bits() == 0.0f64.to_bits()));
        assert_eq!(
            serde_json::to_string(&ranked.iter().map(|j| j.score).collect::<Vec<_>>()).unwrap(),
            "[0.0,0.0]"
        );
    }

    #[test]
    fn test_round3_clears_negative_zero() {
        assert_eq!(round3(-0.0001).to_bits(), 0.0f64.to_bits());
        assert_eq!(round3(-0.0006), -0.001);
        assert_eq!(round3(0.0004), 0.0);
    }

    #[test]
    fn test_encoded_embedding_scores_like_native() {
        let native = vec![job(1, "n", json!(["Rust", "Go"]), json!([0.3, 0.4, 0.5]))];
        let encoded = vec![job(1, "n", json!("[\"Rust\", \"Go\"]"), json!("[0.3, 0.4, 0.5]"))];
        let resume = [0.1, 0.9, 0.2];
        let resume_skills = skills(&["Rust"]);

        let a = rank_jobs(&native, "", &resume, &resume_skills).unwrap();
        let b = rank_jobs(&encoded, "", &resume, &resume_skills).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_malformed_record_does_not_abort_ranking() {
        let catalog = vec![
            job(1, "broken", json!("invalid json"), json!("invalid json")),
            job(2, "fine", json!(["Python"]), json!([1.0, 0.0])),
        ];

        let ranked = rank_jobs(&catalog, "", &[1.0, 0.0], &skills(&["Python"])).unwrap();

        assert_eq!(titles(&ranked), vec!["fine", "broken"]);
        assert_eq!(ranked[1].score, 0.0);
        assert!(ranked[1].skills.is_empty());
    }

    #[test]
    fn test_broken_embedding_still_counts_skill_overlap() {
        let catalog = vec![job(1, "half", json!(["Python", "SQL"]), json!("not json"))];

        let ranked = rank_jobs(&catalog, "", &[1.0, 0.0], &skills(&["Python"])).unwrap();

        // 0.7 × 0 + 0.3 × 0.5
        assert_eq!(ranked[0].score, 0.15);
    }

    #[test]
    fn test_zero_job_embedding_scores_zero_similarity() {
        let catalog = vec![job(1, "zero", json!([]), json!([0.0, 0.0]))];
        let ranked = rank_jobs(&catalog, "", &[1.0, 0.0], &SkillSet::new()).unwrap();
        assert_eq!(ranked[0].score, 0.0);
    }

    #[test]
    fn test_dimension_mismatch_scores_zero_similarity() {
        let catalog = vec![
            job(1, "short", json!(["Rust"]), json!([1.0, 0.0])),
            job(2, "match", json!([]), json!([1.0, 0.0, 0.0])),
        ];

        let ranked = rank_jobs(&catalog, "", &[1.0, 0.0, 0.0], &skills(&["Rust"])).unwrap();

        assert_eq!(titles(&ranked), vec!["match", "short"]);
        assert_eq!(ranked[0].score, 0.7);
        assert_eq!(ranked[1].score, 0.3);
    }

    #[test]
    fn test_degenerate_resume_embedding_fails_whole_call() {
        let catalog = vec![job(1, "a", json!([]), json!([1.0, 0.0]))];

        let err = rank_jobs(&catalog, "", &[0.0, 0.0], &SkillSet::new()).unwrap_err();
        assert!(matches!(
            err,
            RankingError::ResumeEmbedding(SimilarityError::DegenerateVector)
        ));

        let err = rank_jobs(&catalog, "", &[], &SkillSet::new()).unwrap_err();
        assert!(matches!(err, RankingError::ResumeEmbedding(_)));
    }

    #[test]
    fn test_non_finite_score_fails_whole_call() {
        let catalog = vec![
            job(1, "ok", json!([]), json!([1.0, 0.0])),
            job(2, "overflow", json!([]), json!([1e300, 1e300])),
        ];

        let err = rank_jobs(&catalog, "", &[1e300, 1e300], &SkillSet::new()).unwrap_err();
        assert!(matches!(err, RankingError::NonFiniteScore { job_id: 2 }));
    }

    #[test]
    fn test_cancelled_ranking_returns_no_results() {
        let catalog = vec![job(1, "a", json!([]), json!([1.0, 0.0]))];
        let cancel = AtomicBool::new(true);

        let err =
            rank_jobs_cancellable(&catalog, "", &[1.0, 0.0], &SkillSet::new(), &cancel).unwrap_err();

        assert!(matches!(err, RankingError::Cancelled { total: 1, .. }));
    }

    #[test]
    fn test_ranking_is_idempotent() {
        let catalog: Vec<StoredJob> = (0..30)
            .map(|i| {
                let x = (i as f64 * 0.37).sin();
                let tags = if i % 2 == 0 { vec!["Rust"] } else { vec!["Go", "Rust"] };
                job(i, &format!("job-{i}"), json!(tags), json!([x, 1.0 - x, 0.25]))
            })
            .collect();
        let resume = [0.4, 0.6, 0.1];
        let resume_skills = skills(&["Rust"]);

        let first = rank_jobs(&catalog, "", &resume, &resume_skills).unwrap();
        let second = rank_jobs(&catalog, "", &resume, &resume_skills).unwrap();

        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }
}
