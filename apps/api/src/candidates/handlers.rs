use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::jobs::handlers::MessageResponse;
use crate::models::{Candidate, CandidateStatus, NewCandidate};
use crate::state::AppState;

#[derive(Serialize)]
pub struct CandidateCreatedResponse {
    pub message: &'static str,
    pub candidate: Candidate,
}

/// Parsed in the handler; an unknown value is a 400 listing the allowed set.
#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// GET /candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    Ok(Json(state.store.list_candidates().await?))
}

/// POST /candidates
pub async fn handle_create_candidate(
    State(state): State<AppState>,
    Json(req): Json<NewCandidate>,
) -> Result<Json<CandidateCreatedResponse>, AppError> {
    if req.candidate_id.trim().is_empty() || req.name.trim().is_empty() {
        return Err(AppError::Validation(
            "candidate_id and name must not be empty".to_string(),
        ));
    }
    let candidate = req.into_candidate(Utc::now());
    state.store.insert_candidate(&candidate).await?;
    Ok(Json(CandidateCreatedResponse {
        message: "Candidate created",
        candidate,
    }))
}

/// PATCH /candidates/:candidate_id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(candidate_id): Path<String>,
    Json(req): Json<StatusUpdate>,
) -> Result<Json<MessageResponse>, AppError> {
    let status: CandidateStatus = req.status.parse().map_err(AppError::Validation)?;
    if !state
        .store
        .update_candidate_status(&candidate_id, status)
        .await?
    {
        return Err(AppError::NotFound(format!("Candidate {candidate_id} not found")));
    }
    Ok(Json(MessageResponse {
        message: "Candidate status updated",
    }))
}
