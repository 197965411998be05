//! Per-job reporting: aggregate stats and the CSV export.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Candidate, CandidateStatus, PerformanceMetrics};

pub mod handlers;

pub const CSV_HEADER: [&str; 5] = ["Candidate ID", "Name", "Score", "Status", "Persona"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub total_candidates: usize,
    pub average_score: f64,
    pub status_breakdown: BTreeMap<String, usize>,
}

/// The candidate fields exposed in a report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportCandidate {
    pub candidate_id: String,
    pub name: String,
    pub score: Option<f64>,
    pub status: CandidateStatus,
    pub persona: Option<String>,
    pub performance_review: Option<String>,
    pub performance_metrics: Option<PerformanceMetrics>,
}

impl From<&Candidate> for ReportCandidate {
    fn from(c: &Candidate) -> Self {
        Self {
            candidate_id: c.candidate_id.clone(),
            name: c.name.clone(),
            score: c.score,
            status: c.status,
            persona: c.persona.clone(),
            performance_review: c.performance_review.clone(),
            performance_metrics: c.performance_metrics.clone(),
        }
    }
}

/// An unscored candidate counts as 0 toward the average. No candidates → 0.
pub fn compute_stats(candidates: &[Candidate]) -> ReportStats {
    let total = candidates.len();
    let average_score = if total == 0 {
        0.0
    } else {
        let sum: f64 = candidates.iter().map(|c| c.score.unwrap_or(0.0)).sum();
        (sum / total as f64 * 100.0).round() / 100.0
    };

    let mut status_breakdown = BTreeMap::new();
    for candidate in candidates {
        *status_breakdown
            .entry(candidate.status.to_string())
            .or_insert(0) += 1;
    }

    ReportStats {
        total_candidates: total,
        average_score,
        status_breakdown,
    }
}

/// Renders the export rows. Absent values become empty cells.
pub fn render_csv(candidates: &[Candidate]) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;
    for c in candidates {
        let score = c.score.map(|s| s.to_string()).unwrap_or_default();
        wtr.write_record([
            c.candidate_id.as_str(),
            c.name.as_str(),
            score.as_str(),
            c.status.as_str(),
            c.persona.as_deref().unwrap_or_default(),
        ])?;
    }
    wtr.into_inner().map_err(|e| e.into_error().into())
}
