//! In-memory `Store` used by handler and orchestrator tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::models::{Candidate, CandidateStatus, Job};
use crate::store::{Store, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    jobs: Mutex<Vec<Job>>,
    candidates: Mutex<Vec<Candidate>>,
}

impl MemoryStore {
    pub fn with_jobs(jobs: Vec<Job>) -> Self {
        Self {
            jobs: Mutex::new(jobs),
            candidates: Mutex::default(),
        }
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.lock().unwrap().len()
    }

    fn update_candidate(&self, candidate_id: &str, apply: impl FnOnce(&mut Candidate)) -> bool {
        let mut candidates = self.candidates.lock().unwrap();
        match candidates.iter_mut().find(|c| c.candidate_id == candidate_id) {
            Some(candidate) => {
                apply(candidate);
                candidate.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError> {
        Ok(self.jobs.lock().unwrap().clone())
    }

    async fn insert_job(&self, job: &Job) -> Result<(), StoreError> {
        let mut jobs = self.jobs.lock().unwrap();
        if jobs.iter().any(|j| j.job_id == job.job_id) {
            return Err(StoreError::Duplicate(format!("Job {} already exists", job.job_id)));
        }
        jobs.push(job.clone());
        Ok(())
    }

    async fn find_job(&self, job_id: &str) -> Result<Option<Job>, StoreError> {
        Ok(self.jobs.lock().unwrap().iter().find(|j| j.job_id == job_id).cloned())
    }

    async fn delete_job(&self, job_id: &str) -> Result<bool, StoreError> {
        let mut jobs = self.jobs.lock().unwrap();
        let before = jobs.len();
        jobs.retain(|j| j.job_id != job_id);
        Ok(jobs.len() < before)
    }

    async fn list_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        Ok(self.candidates.lock().unwrap().clone())
    }

    async fn candidates_for_job(&self, job_id: &str) -> Result<Vec<Candidate>, StoreError> {
        Ok(self
            .candidates
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn find_candidate(&self, candidate_id: &str) -> Result<Option<Candidate>, StoreError> {
        Ok(self
            .candidates
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.candidate_id == candidate_id)
            .cloned())
    }

    async fn insert_candidate(&self, candidate: &Candidate) -> Result<(), StoreError> {
        let mut candidates = self.candidates.lock().unwrap();
        if candidates.iter().any(|c| c.candidate_id == candidate.candidate_id) {
            return Err(StoreError::Duplicate(format!(
                "Candidate {} already exists",
                candidate.candidate_id
            )));
        }
        candidates.push(candidate.clone());
        Ok(())
    }

    async fn update_candidate_status(
        &self,
        candidate_id: &str,
        status: CandidateStatus,
    ) -> Result<bool, StoreError> {
        Ok(self.update_candidate(candidate_id, |c| c.status = status))
    }

    async fn update_interview_tasks(
        &self,
        candidate_id: &str,
        tasks: &[String],
    ) -> Result<bool, StoreError> {
        Ok(self.update_candidate(candidate_id, |c| c.interview_tasks = Some(tasks.to_vec())))
    }

    async fn record_task_evaluation(
        &self,
        candidate_id: &str,
        evaluation: &str,
    ) -> Result<bool, StoreError> {
        Ok(self.update_candidate(candidate_id, |c| {
            c.task_evaluation = Some(evaluation.to_string())
        }))
    }
}
