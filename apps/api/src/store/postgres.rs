use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;

use crate::models::{Candidate, CandidateStatus, Job, PerformanceMetrics};
use crate::store::{Store, StoreError};

const CANDIDATE_COLUMNS: &str = "candidate_id, name, job_id, resume_text, status, score, persona, \
     interview_tasks, performance_review, performance_metrics, task_evaluation, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct JobRow {
    job_id: String,
    title: String,
    description: String,
    requirements: Vec<String>,
    created_at: DateTime<Utc>,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Job {
            job_id: row.job_id,
            title: row.title,
            description: row.description,
            requirements: row.requirements,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CandidateRow {
    candidate_id: String,
    name: String,
    job_id: String,
    resume_text: Option<String>,
    status: String,
    score: Option<f64>,
    persona: Option<String>,
    interview_tasks: Option<Vec<String>>,
    performance_review: Option<String>,
    performance_metrics: Option<Value>,
    task_evaluation: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CandidateRow> for Candidate {
    type Error = StoreError;

    fn try_from(row: CandidateRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<CandidateStatus>().map_err(|e| {
            StoreError::Corrupt(format!("candidate {}: {e}", row.candidate_id))
        })?;

        Ok(Candidate {
            candidate_id: row.candidate_id,
            name: row.name,
            job_id: row.job_id,
            resume_text: row.resume_text,
            status,
            score: row.score,
            persona: row.persona,
            interview_tasks: row.interview_tasks,
            performance_review: row.performance_review,
            performance_metrics: row
                .performance_metrics
                .as_ref()
                .map(PerformanceMetrics::from_loose),
            task_evaluation: row.task_evaluation,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_candidates(rows: Vec<CandidateRow>) -> Result<Vec<Candidate>, StoreError> {
    rows.into_iter().map(Candidate::try_from).collect()
}

/// Maps unique-key violations to `Duplicate`; everything else stays a database error.
fn map_insert_error(err: sqlx::Error, what: String) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Duplicate(format!("{what} already exists"))
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError> {
        let rows = sqlx::query_as::<_, JobRow>(
            "SELECT job_id, title, description, requirements, created_at FROM jobs ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Job::from).collect())
    }

    async fn insert_job(&self, job: &Job) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO jobs (job_id, title, description, requirements, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&job.job_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(job.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, format!("Job {}", job.job_id)))?;

        info!("Inserted job {}", job.job_id);
        Ok(())
    }

    async fn find_job(&self, job_id: &str) -> Result<Option<Job>, StoreError> {
        let row = sqlx::query_as::<_, JobRow>(
            "SELECT job_id, title, description, requirements, created_at FROM jobs WHERE job_id = $1",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Job::from))
    }

    async fn delete_job(&self, job_id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM jobs WHERE job_id = $1")
            .bind(job_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        let rows = sqlx::query_as::<_, CandidateRow>(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;
        into_candidates(rows)
    }

    async fn candidates_for_job(&self, job_id: &str) -> Result<Vec<Candidate>, StoreError> {
        let rows = sqlx::query_as::<_, CandidateRow>(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE job_id = $1 ORDER BY created_at"
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        into_candidates(rows)
    }

    async fn find_candidate(&self, candidate_id: &str) -> Result<Option<Candidate>, StoreError> {
        let row = sqlx::query_as::<_, CandidateRow>(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE candidate_id = $1"
        ))
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Candidate::try_from).transpose()
    }

    async fn insert_candidate(&self, candidate: &Candidate) -> Result<(), StoreError> {
        sqlx::query(&format!(
            "INSERT INTO candidates ({CANDIDATE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)"
        ))
        .bind(&candidate.candidate_id)
        .bind(&candidate.name)
        .bind(&candidate.job_id)
        .bind(&candidate.resume_text)
        .bind(candidate.status.as_str())
        .bind(candidate.score)
        .bind(&candidate.persona)
        .bind(&candidate.interview_tasks)
        .bind(&candidate.performance_review)
        .bind(candidate.performance_metrics.as_ref().map(Json))
        .bind(&candidate.task_evaluation)
        .bind(candidate.created_at)
        .bind(candidate.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, format!("Candidate {}", candidate.candidate_id)))?;

        info!(
            "Inserted candidate {} ({}) for job {}",
            candidate.candidate_id, candidate.status, candidate.job_id
        );
        Ok(())
    }

    async fn update_candidate_status(
        &self,
        candidate_id: &str,
        status: CandidateStatus,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE candidates SET status = $1, updated_at = now() WHERE candidate_id = $2",
        )
        .bind(status.as_str())
        .bind(candidate_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_interview_tasks(
        &self,
        candidate_id: &str,
        tasks: &[String],
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE candidates SET interview_tasks = $1, updated_at = now() WHERE candidate_id = $2",
        )
        .bind(tasks)
        .bind(candidate_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn record_task_evaluation(
        &self,
        candidate_id: &str,
        evaluation: &str,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE candidates SET task_evaluation = $1, updated_at = now() WHERE candidate_id = $2",
        )
        .bind(evaluation)
        .bind(candidate_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
