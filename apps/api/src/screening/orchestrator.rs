//! Screening pipeline for one candidate submission:
//! job lookup → PDF extraction → {score, persona, tasks, review} → one insert.
//!
//! The four calls run concurrently and are joined all-or-nothing. Nothing is
//! written unless every call succeeds, so a failed attempt leaves no record.

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{ChatPrompt, Generation, Generator, LlmError};
use crate::models::{Candidate, CandidateStatus, Job, PerformanceMetrics};
use crate::screening::extractor::extract_resume_text;
use crate::screening::normalize::{normalize_persona, normalize_review, normalize_tasks};
use crate::screening::prompts::{
    insights_prompt, interview_tasks_prompt, performance_review_prompt, persona_prompt,
};
use crate::state::AppState;

const INSIGHT_POOL_SIZE: usize = 5;
const RATE_LIMIT_MESSAGE: &str = "AI rate limit reached. Please try again in a few seconds.";

/// Identity fields supplied alongside an uploaded resume.
#[derive(Debug, Clone)]
pub struct Applicant {
    pub candidate_id: String,
    pub name: String,
}

/// Runs the full pipeline and persists a `screened` candidate.
pub async fn screen_candidate(
    state: &AppState,
    job_id: &str,
    applicant: Applicant,
    resume_pdf: Bytes,
) -> Result<Candidate, AppError> {
    let job = state
        .store
        .find_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    if state.store.find_candidate(&applicant.candidate_id).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Candidate {} already exists",
            applicant.candidate_id
        )));
    }

    let resume_text = extract_resume_text(resume_pdf).await?;
    screen_resume(state, &job, applicant, resume_text).await
}

/// Scores and generates for already-extracted resume text, then inserts.
pub(crate) async fn screen_resume(
    state: &AppState,
    job: &Job,
    applicant: Applicant,
    resume_text: String,
) -> Result<Candidate, AppError> {
    info!(
        "Screening candidate {} for job {} ({} chars of resume text)",
        applicant.candidate_id,
        job.job_id,
        resume_text.len()
    );

    let (score, persona, tasks, review) = tokio::try_join!(
        async {
            state
                .scorer
                .score(&resume_text, &job.requirements)
                .await
                .map_err(AppError::from)
        },
        generate(&state.generator, persona_prompt(job, &resume_text)),
        generate(&state.generator, interview_tasks_prompt(job, &resume_text)),
        generate(&state.generator, performance_review_prompt(job, &resume_text)),
    )?;

    let review = normalize_review(&review);
    if review.metrics.is_empty() {
        warn!(
            "No performance metrics recovered for candidate {}",
            applicant.candidate_id
        );
    }
    info!(
        "Candidate {} scored {:.2} (semantic {:.2}, keyword {:.2}); review parsed via {:?}",
        applicant.candidate_id, score.overall, score.semantic, score.keyword, review.source
    );

    let now = Utc::now();
    let candidate = Candidate {
        candidate_id: applicant.candidate_id,
        name: applicant.name,
        job_id: job.job_id.clone(),
        resume_text: Some(resume_text),
        status: CandidateStatus::Screened,
        score: Some(score.overall),
        persona: Some(normalize_persona(&persona)),
        interview_tasks: Some(normalize_tasks(&tasks.text)),
        performance_review: Some(review.review),
        performance_metrics: Some(review.metrics),
        task_evaluation: None,
        created_at: now,
        updated_at: now,
    };

    state.store.insert_candidate(&candidate).await?;
    Ok(candidate)
}

/// Re-runs interview-task generation and replaces only the stored task list.
/// `job_id` defaults to the candidate's own job.
pub async fn regenerate_tasks(
    state: &AppState,
    candidate_id: &str,
    job_id: Option<&str>,
) -> Result<Vec<String>, AppError> {
    let not_found = || AppError::NotFound("Candidate or Job not found".to_string());

    let candidate = state
        .store
        .find_candidate(candidate_id)
        .await?
        .ok_or_else(not_found)?;
    let job = state
        .store
        .find_job(job_id.unwrap_or(&candidate.job_id))
        .await?
        .ok_or_else(not_found)?;

    let resume_text = candidate.resume_text.as_deref().unwrap_or_default();
    let generation = generate(&state.generator, interview_tasks_prompt(&job, resume_text)).await?;
    let tasks = normalize_tasks(&generation.text);

    if !state.store.update_interview_tasks(candidate_id, &tasks).await? {
        return Err(not_found());
    }
    info!("Regenerated {} interview task(s) for candidate {candidate_id}", tasks.len());
    Ok(tasks)
}

/// A candidate as presented to the insight prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightCandidate {
    pub name: String,
    pub score: Option<f64>,
    pub status: CandidateStatus,
    pub performance_metrics: Option<PerformanceMetrics>,
}

/// Summarizes the top candidates for a job through the gated generation path.
/// A provider rate limit surfaces as `AppError::RateLimited` (429).
pub async fn generate_insights(state: &AppState, job_id: &str) -> Result<String, AppError> {
    let job = state
        .store
        .find_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    let candidates = state.store.candidates_for_job(job_id).await?;
    let pool = top_candidates(&candidates, INSIGHT_POOL_SIZE);
    let candidates_json = serde_json::to_string_pretty(&pool)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("serialize insight pool: {e}")))?;

    let generation = state
        .generator
        .generate_gated(&insights_prompt(&job, &candidates_json))
        .await
        .map_err(|e| match e {
            LlmError::RateLimited(_) => AppError::RateLimited(RATE_LIMIT_MESSAGE.to_string()),
            other => AppError::from(other),
        })?;

    Ok(generation.text)
}

/// Highest scores first; a missing score counts as 0. Ties keep store order.
pub fn top_candidates(candidates: &[Candidate], limit: usize) -> Vec<InsightCandidate> {
    let mut ranked: Vec<&Candidate> = candidates.iter().collect();
    ranked.sort_by(|a, b| {
        b.score
            .unwrap_or(0.0)
            .total_cmp(&a.score.unwrap_or(0.0))
    });
    ranked
        .into_iter()
        .take(limit)
        .map(|c| InsightCandidate {
            name: c.name.clone(),
            score: c.score,
            status: c.status,
            performance_metrics: c.performance_metrics.clone(),
        })
        .collect()
}

async fn generate(generator: &Generator, prompt: ChatPrompt) -> Result<Generation, AppError> {
    generator.generate(&prompt).await.map_err(AppError::from)
}
