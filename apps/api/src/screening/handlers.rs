use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, Path, Query, State,
    },
    Form, Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::Candidate;
use crate::screening::orchestrator::{self, Applicant};
use crate::state::AppState;

const TASK_EVALUATION_PLACEHOLDER: &str = "Task evaluation not implemented.";

#[derive(Serialize)]
pub struct CandidateProcessedResponse {
    pub message: &'static str,
    pub candidate: Candidate,
}

#[derive(Serialize)]
pub struct TasksRegeneratedResponse {
    pub message: &'static str,
    pub interview_tasks: Vec<String>,
}

#[derive(Serialize)]
pub struct InsightResponse {
    pub insight: String,
}

#[derive(Serialize)]
pub struct TaskEvaluatedResponse {
    pub message: &'static str,
    pub evaluation: &'static str,
}

#[derive(Deserialize)]
pub struct OptionalJobQuery {
    pub job_id: Option<String>,
}

/// `?job_id=` on read endpoints. Optional at the extractor; a missing or blank
/// value is a `Validation` error.
#[derive(Deserialize)]
pub struct JobIdQuery {
    pub job_id: Option<String>,
}

impl JobIdQuery {
    pub fn require(self) -> Result<String, AppError> {
        required_job_id(self.job_id)
    }
}

pub fn required_job_id(job_id: Option<String>) -> Result<String, AppError> {
    job_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("Missing required query parameter 'job_id'".to_string()))
}

#[derive(Deserialize)]
pub struct TaskSubmission {
    pub candidate_id: String,
    pub job_id: String,
    pub task_submission: String,
}

/// Multipart fields of an upload, collected before validation.
#[derive(Default)]
struct UploadForm {
    job_id: Option<String>,
    candidate_id: Option<String>,
    name: Option<String>,
    file: Option<Bytes>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
        {
            let field_name = field.name().unwrap_or_default().to_string();
            match field_name.as_str() {
                "file" => form.file = Some(field.bytes().await.map_err(multipart_read_error)?),
                "job_id" => form.job_id = text_value(field).await?,
                "candidate_id" => form.candidate_id = text_value(field).await?,
                "name" => form.name = text_value(field).await?,
                _ => {}
            }
        }
        Ok(form)
    }
}

/// Trimmed field text; blank counts as absent.
async fn text_value(field: Field<'_>) -> Result<Option<String>, AppError> {
    let value = field.text().await.map_err(multipart_read_error)?;
    Ok(Some(value.trim().to_string()).filter(|v| !v.is_empty()))
}

fn multipart_read_error(err: MultipartError) -> AppError {
    AppError::Validation(format!("Failed to read multipart field: {err}"))
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::Validation(format!("Missing required field '{field}'")))
}

/// POST /upload_resume/
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CandidateProcessedResponse>, AppError> {
    let form = UploadForm::read(multipart).await?;
    let job_id = required(form.job_id, "job_id")?;
    let applicant = Applicant {
        candidate_id: required(form.candidate_id, "candidate_id")?,
        name: required(form.name, "name")?,
    };
    let file = required(form.file.filter(|f| !f.is_empty()), "file")?;

    let candidate = orchestrator::screen_candidate(&state, &job_id, applicant, file).await?;
    Ok(Json(CandidateProcessedResponse {
        message: "Candidate processed",
        candidate,
    }))
}

/// POST /candidates/:candidate_id/regenerate_tasks
pub async fn handle_regenerate_tasks(
    State(state): State<AppState>,
    Path(candidate_id): Path<String>,
    Query(params): Query<OptionalJobQuery>,
) -> Result<Json<TasksRegeneratedResponse>, AppError> {
    let interview_tasks =
        orchestrator::regenerate_tasks(&state, &candidate_id, params.job_id.as_deref()).await?;
    Ok(Json(TasksRegeneratedResponse {
        message: "Interview tasks regenerated",
        interview_tasks,
    }))
}

/// GET /ai_insights
pub async fn handle_ai_insights(
    State(state): State<AppState>,
    Query(params): Query<JobIdQuery>,
) -> Result<Json<InsightResponse>, AppError> {
    let job_id = params.require()?;
    let insight = orchestrator::generate_insights(&state, &job_id).await?;
    Ok(Json(InsightResponse { insight }))
}

/// POST /evaluate_task/
/// Placeholder: stores a fixed string, the submission itself is not assessed.
pub async fn handle_evaluate_task(
    State(state): State<AppState>,
    Form(submission): Form<TaskSubmission>,
) -> Result<Json<TaskEvaluatedResponse>, AppError> {
    info!(
        "Task submission for candidate {} (job {}): {} chars",
        submission.candidate_id,
        submission.job_id,
        submission.task_submission.len()
    );
    state
        .store
        .record_task_evaluation(&submission.candidate_id, TASK_EVALUATION_PLACEHOLDER)
        .await?;
    Ok(Json(TaskEvaluatedResponse {
        message: "Task evaluated",
        evaluation: TASK_EVALUATION_PLACEHOLDER,
    }))
}
