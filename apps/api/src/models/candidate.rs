use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle status of a candidate. `applied` and `screened` are set by this
/// service; the rest are set by recruiters through the status endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStatus {
    #[default]
    Applied,
    Screened,
    Interview,
    Offer,
    Onboarded,
    Rejected,
}

impl CandidateStatus {
    pub const ALL: [CandidateStatus; 6] = [
        CandidateStatus::Applied,
        CandidateStatus::Screened,
        CandidateStatus::Interview,
        CandidateStatus::Offer,
        CandidateStatus::Onboarded,
        CandidateStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::Applied => "applied",
            CandidateStatus::Screened => "screened",
            CandidateStatus::Interview => "interview",
            CandidateStatus::Offer => "offer",
            CandidateStatus::Onboarded => "onboarded",
            CandidateStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CandidateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        CandidateStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == needle)
            .ok_or_else(|| {
                let allowed: Vec<&str> = CandidateStatus::ALL.iter().map(|s| s.as_str()).collect();
                format!("Unknown status '{s}'. Expected one of: {}", allowed.join(", "))
            })
    }
}

/// Scores (0–100) produced by the performance-review generation.
/// Any key may be missing: the model is not guaranteed to emit all four.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_skills: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_solving: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_collaboration: Option<f64>,
}

impl PerformanceMetrics {
    /// Builds metrics from loosely-typed generation output.
    ///
    /// Accepts numbers and numeric strings ("85", "85%"), clamps to 0–100,
    /// and silently drops anything else. Never fails.
    pub fn from_loose(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        let pick = |key: &str| map.get(key).and_then(coerce_score);

        Self {
            technical_skills: pick("technical_skills"),
            communication: pick("communication"),
            problem_solving: pick("problem_solving"),
            team_collaboration: pick("team_collaboration"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.technical_skills.is_none()
            && self.communication.is_none()
            && self.problem_solving.is_none()
            && self.team_collaboration.is_none()
    }
}

fn coerce_score(value: &Value) -> Option<f64> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    raw.is_finite().then(|| raw.clamp(0.0, 100.0))
}

/// A candidate record as stored in the candidates collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub candidate_id: String,
    pub name: String,
    /// Not enforced: a candidate outlives the deletion of its job.
    pub job_id: String,
    pub resume_text: Option<String>,
    pub status: CandidateStatus,
    pub score: Option<f64>,
    pub persona: Option<String>,
    pub interview_tasks: Option<Vec<String>>,
    pub performance_review: Option<String>,
    pub performance_metrics: Option<PerformanceMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_evaluation: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /candidates`: a direct insert with no AI processing.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCandidate {
    pub candidate_id: String,
    pub name: String,
    pub job_id: String,
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub status: CandidateStatus,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(default)]
    pub interview_tasks: Option<Vec<String>>,
    #[serde(default)]
    pub performance_review: Option<String>,
    #[serde(default)]
    pub performance_metrics: Option<PerformanceMetrics>,
}

impl NewCandidate {
    pub fn into_candidate(self, now: DateTime<Utc>) -> Candidate {
        Candidate {
            candidate_id: self.candidate_id,
            name: self.name,
            job_id: self.job_id,
            resume_text: self.resume_text,
            status: self.status,
            score: self.score,
            persona: self.persona,
            interview_tasks: self.interview_tasks,
            performance_review: self.performance_review,
            performance_metrics: self.performance_metrics,
            task_evaluation: None,
            created_at: now,
            updated_at: now,
        }
    }
}
