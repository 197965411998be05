use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{Job, NewJob};
use crate::state::AppState;

#[derive(Serialize)]
pub struct JobCreatedResponse {
    pub message: &'static str,
    pub job: Job,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// GET /jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Result<Json<Vec<Job>>, AppError> {
    Ok(Json(state.store.list_jobs().await?))
}

/// POST /jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<NewJob>,
) -> Result<Json<JobCreatedResponse>, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("Job title must not be empty".to_string()));
    }
    let job = req.into_job(Utc::now());
    state.store.insert_job(&job).await?;
    Ok(Json(JobCreatedResponse {
        message: "Job created",
        job,
    }))
}

/// GET /job/:job_id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Job>, AppError> {
    let job = state
        .store
        .find_job(&job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    Ok(Json(job))
}

/// DELETE /jobs/:job_id
/// Candidates that reference the job are left in place.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.store.delete_job(&job_id).await? {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }
    Ok(Json(MessageResponse {
        message: "Job deleted",
    }))
}
