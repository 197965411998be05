use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::reports::{compute_stats, render_csv, ReportCandidate, ReportStats};
use crate::screening::handlers::{required_job_id, JobIdQuery};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ReportJob {
    pub job_id: String,
    pub title: String,
    pub requirements: Vec<String>,
}

#[derive(Serialize)]
pub struct ReportResponse {
    pub job: ReportJob,
    pub candidates: Vec<ReportCandidate>,
    pub stats: ReportStats,
}

#[derive(Deserialize)]
pub struct ExportQuery {
    pub job_id: Option<String>,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "csv".to_string()
}

/// GET /reports
pub async fn handle_report(
    State(state): State<AppState>,
    Query(params): Query<JobIdQuery>,
) -> Result<Json<ReportResponse>, AppError> {
    let job_id = params.require()?;
    let job = state
        .store
        .find_job(&job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    let candidates = state.store.candidates_for_job(&job.job_id).await?;

    Ok(Json(ReportResponse {
        stats: compute_stats(&candidates),
        candidates: candidates.iter().map(ReportCandidate::from).collect(),
        job: ReportJob {
            job_id: job.job_id,
            title: job.title,
            requirements: job.requirements,
        },
    }))
}

/// GET /export
/// Only `format=csv` (exact, lowercase) is supported; anything else is
/// rejected before querying.
pub async fn handle_export(
    State(state): State<AppState>,
    Query(params): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let job_id = required_job_id(params.job_id)?;
    if params.format != "csv" {
        return Err(AppError::Validation(format!(
            "Unsupported export format '{}'. Only 'csv' is supported",
            params.format
        )));
    }

    let candidates = state.store.candidates_for_job(&job_id).await?;
    let body = render_csv(&candidates)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("CSV export failed: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=report.csv"),
        ],
        body,
    )
        .into_response())
}
