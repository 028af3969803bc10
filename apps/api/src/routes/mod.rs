pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::feedback::handlers as feedback_handlers;
use crate::jobs::handlers as jobs_handlers;
use crate::profile::handlers as profile_handlers;
use crate::salary::handlers as salary_handlers;
use crate::state::AppState;
use crate::upload::handlers as upload_handlers;
use crate::upload::validate::MAX_FILE_SIZE;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume upload-and-scoring workflow
        .route(
            "/api/v1/resumes",
            post(upload_handlers::handle_upload_resume).get(upload_handlers::handle_get_resume),
        )
        .route(
            "/api/v1/resumes/status",
            get(upload_handlers::handle_upload_status),
        )
        // Profile and skill assessments
        .route(
            "/api/v1/profile",
            get(profile_handlers::handle_get_profile).put(profile_handlers::handle_update_profile),
        )
        .route("/api/v1/skills", get(profile_handlers::handle_list_skills))
        // Job board
        .route(
            "/api/v1/jobs",
            get(jobs_handlers::handle_list_jobs).post(jobs_handlers::handle_post_job),
        )
        .route(
            "/api/v1/jobs/:id/save",
            post(jobs_handlers::handle_toggle_saved_job),
        )
        .route(
            "/api/v1/jobs/:id/apply",
            post(jobs_handlers::handle_apply_job),
        )
        // Salary estimator
        .route(
            "/api/v1/salary/estimate",
            post(salary_handlers::handle_estimate_salary),
        )
        // Interview feedback
        .route(
            "/api/v1/feedback",
            post(feedback_handlers::handle_generate_feedback),
        )
        // Multipart bodies must fit the file ceiling plus form overhead
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 64 * 1024))
        .with_state(state)
}
