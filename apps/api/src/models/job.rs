use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A job posting. Immutable once created; the only mutation is deletion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub job_id: String,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /jobs`. `job_id` is generated when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct NewJob {
    #[serde(default)]
    pub job_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
}

impl NewJob {
    pub fn into_job(self, now: DateTime<Utc>) -> Job {
        let job_id = self
            .job_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Job {
            job_id,
            title: self.title,
            description: self.description,
            requirements: self
                .requirements
                .into_iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect(),
            created_at: now,
        }
    }
}
