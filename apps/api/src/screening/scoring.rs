//! Relevance scoring: blends embedding similarity with literal keyword hits.
//!
//! score = round₂(0.7 × semantic + 0.3 × keyword), clamped to 0–100, where
//! - semantic = mean cosine(resume, requirement) × 100
//! - keyword  = share of requirements found verbatim (case-insensitive) × 100

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::embeddings::{cosine_similarity, Embedder, EmbeddingError};

const SEMANTIC_WEIGHT: f64 = 0.7;
const KEYWORD_WEIGHT: f64 = 0.3;

/// Both components of a relevance score, kept for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub semantic: f64,
    pub keyword: f64,
    pub overall: f64,
}

impl ScoreBreakdown {
    const ZERO: ScoreBreakdown = ScoreBreakdown {
        semantic: 0.0,
        keyword: 0.0,
        overall: 0.0,
    };

    fn blend(semantic: f64, keyword: f64) -> Self {
        let overall = round2(SEMANTIC_WEIGHT * semantic + KEYWORD_WEIGHT * keyword).clamp(0.0, 100.0);
        Self {
            semantic,
            keyword,
            overall,
        }
    }
}

#[derive(Clone)]
pub struct RelevanceScorer {
    embedder: Arc<dyn Embedder>,
}

impl RelevanceScorer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// Scores a resume against an ordered list of requirements.
    /// An empty list scores 0.0 without calling the embedding service.
    pub async fn score(
        &self,
        resume_text: &str,
        requirements: &[String],
    ) -> Result<ScoreBreakdown, EmbeddingError> {
        if requirements.is_empty() {
            return Ok(ScoreBreakdown::ZERO);
        }

        let resume_vec = self
            .embedder
            .embed(&[resume_text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::Shape("no vector for resume text".to_string()))?;
        let requirement_vecs = self.embedder.embed(requirements).await?;

        let similarities: Vec<f64> = requirement_vecs
            .iter()
            .map(|req_vec| cosine_similarity(&resume_vec, req_vec))
            .collect();

        let breakdown = ScoreBreakdown::blend(
            semantic_score(&similarities),
            keyword_score(resume_text, requirements),
        );
        debug!(
            "Relevance score: semantic={:.2} keyword={:.2} overall={:.2}",
            breakdown.semantic, breakdown.keyword, breakdown.overall
        );
        Ok(breakdown)
    }
}

fn semantic_score(similarities: &[f64]) -> f64 {
    if similarities.is_empty() {
        return 0.0;
    }
    similarities.iter().sum::<f64>() / similarities.len() as f64 * 100.0
}

fn keyword_score(resume_text: &str, requirements: &[String]) -> f64 {
    if requirements.is_empty() {
        return 0.0;
    }
    let resume_lower = resume_text.to_lowercase();
    let hits = requirements
        .iter()
        .filter(|req| resume_lower.contains(&req.to_lowercase()))
        .count();
    hits as f64 / requirements.len() as f64 * 100.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
