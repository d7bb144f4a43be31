//! Leaf scoring primitives: cosine similarity between embeddings and
//! skill overlap between skill sets.

use thiserror::Error;

use crate::matching::SkillSet;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimilarityError {
    /// One side is empty or has zero magnitude.
    #[error("degenerate vector: empty or zero magnitude")]
    DegenerateVector,

    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
}

/// Cosine similarity `dot(a, b) / (‖a‖ · ‖b‖)`, in [-1.0, 1.0].
///
/// Fails instead of producing NaN when either vector is empty or all zeros,
/// or when the lengths differ.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if a.is_empty() || norm_a == 0.0 || norm_b == 0.0 {
        return Err(SimilarityError::DegenerateVector);
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();

    // Float drift can push identical vectors a hair past 1.0
    Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0))
}

/// Checks that an embedding can take part in a cosine comparison.
pub fn ensure_usable(v: &[f64]) -> Result<(), SimilarityError> {
    if v.is_empty() || l2_norm(v) == 0.0 {
        Err(SimilarityError::DegenerateVector)
    } else {
        Ok(())
    }
}

fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Fraction of the job's skills that the résumé also lists:
/// `|resume ∩ job| / |job|`, or 0.0 when the job lists no skills.
///
/// Not symmetric. The denominator is always the job side.
pub fn skill_overlap(resume_skills: &SkillSet, job_skills: &SkillSet) -> f64 {
    if job_skills.is_empty() {
        return 0.0;
    }
    let shared = job_skills
        .iter()
        .filter(|s| resume_skills.contains(*s))
        .count();
    shared as f64 / job_skills.len() as f64
}
