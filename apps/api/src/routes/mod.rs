pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};

use crate::candidates::handlers as candidates;
use crate::jobs::handlers as jobs;
use crate::reports::handlers as reports;
use crate::screening::handlers as screening;
use crate::state::AppState;

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route("/jobs", get(jobs::handle_list_jobs).post(jobs::handle_create_job))
        .route("/jobs/:job_id", delete(jobs::handle_delete_job))
        .route("/job/:job_id", get(jobs::handle_get_job))
        // Candidates
        .route(
            "/candidates",
            get(candidates::handle_list_candidates).post(candidates::handle_create_candidate),
        )
        .route(
            "/candidates/:candidate_id/status",
            patch(candidates::handle_update_status),
        )
        // Screening
        .route("/upload_resume/", post(screening::handle_upload_resume))
        .route(
            "/candidates/:candidate_id/regenerate_tasks",
            post(screening::handle_regenerate_tasks),
        )
        .route("/evaluate_task/", post(screening::handle_evaluate_task))
        .route("/ai_insights", get(screening::handle_ai_insights))
        // Reporting
        .route("/reports", get(reports::handle_report))
        .route("/export", get(reports::handle_export))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
