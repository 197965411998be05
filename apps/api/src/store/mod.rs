//! Persistence for the two collections: jobs and candidates.
//!
//! Handlers and the orchestrator only see the `Store` trait. Production uses
//! `PgStore`; tests use the in-memory store.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Candidate, CandidateStatus, Job};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Duplicate(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Equality-filtered CRUD over jobs and candidates.
/// Update and delete methods return `false` when nothing matched.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError>;
    async fn insert_job(&self, job: &Job) -> Result<(), StoreError>;
    async fn find_job(&self, job_id: &str) -> Result<Option<Job>, StoreError>;
    async fn delete_job(&self, job_id: &str) -> Result<bool, StoreError>;

    async fn list_candidates(&self) -> Result<Vec<Candidate>, StoreError>;
    async fn candidates_for_job(&self, job_id: &str) -> Result<Vec<Candidate>, StoreError>;
    async fn find_candidate(&self, candidate_id: &str) -> Result<Option<Candidate>, StoreError>;
    async fn insert_candidate(&self, candidate: &Candidate) -> Result<(), StoreError>;
    async fn update_candidate_status(
        &self,
        candidate_id: &str,
        status: CandidateStatus,
    ) -> Result<bool, StoreError>;
    async fn update_interview_tasks(
        &self,
        candidate_id: &str,
        tasks: &[String],
    ) -> Result<bool, StoreError>;
    async fn record_task_evaluation(
        &self,
        candidate_id: &str,
        evaluation: &str,
    ) -> Result<bool, StoreError>;
}
