use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::{job_match_percentage, split_requirements};
use crate::models::jobs::{ApplicationRow, JobRow};
use crate::state::AppState;
use crate::upload::persist::fetch_resume;

#[derive(Deserialize)]
pub struct JobsQuery {
    pub user_id: Option<Uuid>,
    pub company: Option<String>,
}

#[derive(Deserialize)]
pub struct UserIdBody {
    pub user_id: Uuid,
}

/// A job annotated for one user: match score against their resume keywords,
/// plus whether they saved or applied to it.
#[derive(Serialize)]
pub struct JobListing {
    #[serde(flatten)]
    pub job: JobRow,
    pub match_score: f64,
    pub saved: bool,
    pub applied: bool,
}

#[derive(Deserialize)]
pub struct JobPost {
    pub title: String,
    pub company: String,
    pub description: String,
    /// Comma-separated, split and trimmed server-side.
    pub requirements: String,
    pub salary_range: Option<String>,
    pub location: Option<String>,
}

#[derive(Serialize)]
pub struct SaveJobResponse {
    pub saved: bool,
}

/// GET /api/v1/jobs
///
/// Newest first. With `user_id`, each job carries the match score against
/// that user's stored resume keywords (0 when they have no resume) and their
/// saved/applied flags. With `company`, only that company's postings.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobsQuery>,
) -> Result<Json<Vec<JobListing>>, AppError> {
    let jobs: Vec<JobRow> = match &params.company {
        Some(company) => {
            sqlx::query_as("SELECT * FROM jobs WHERE company = $1 ORDER BY created_at DESC")
                .bind(company)
                .fetch_all(&state.db)
                .await?
        }
        None => {
            sqlx::query_as("SELECT * FROM jobs ORDER BY created_at DESC")
                .fetch_all(&state.db)
                .await?
        }
    };

    let (keywords, saved, applied) = match params.user_id {
        Some(user_id) => {
            let keywords = fetch_resume(&state.db, user_id)
                .await?
                .map(|r| r.keywords)
                .unwrap_or_default();
            let saved: Vec<Uuid> =
                sqlx::query_scalar("SELECT job_id FROM saved_jobs WHERE user_id = $1")
                    .bind(user_id)
                    .fetch_all(&state.db)
                    .await?;
            let applied: Vec<Uuid> =
                sqlx::query_scalar("SELECT job_id FROM applications WHERE user_id = $1")
                    .bind(user_id)
                    .fetch_all(&state.db)
                    .await?;
            (keywords, saved, applied)
        }
        None => (Vec::new(), Vec::new(), Vec::new()),
    };

    let listings = jobs
        .into_iter()
        .map(|job| JobListing {
            match_score: job_match_percentage(&job.requirements, &keywords),
            saved: saved.contains(&job.id),
            applied: applied.contains(&job.id),
            job,
        })
        .collect();

    Ok(Json(listings))
}

/// POST /api/v1/jobs
pub async fn handle_post_job(
    State(state): State<AppState>,
    Json(post): Json<JobPost>,
) -> Result<Json<JobRow>, AppError> {
    if post.title.trim().is_empty() || post.company.trim().is_empty() {
        return Err(AppError::Validation(
            "Title and company are required".to_string(),
        ));
    }

    let requirements = split_requirements(&post.requirements);

    let row: JobRow = sqlx::query_as(
        r#"
        INSERT INTO jobs
            (id, title, company, description, requirements,
             salary_range, location, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(post.title.trim())
    .bind(post.company.trim())
    .bind(&post.description)
    .bind(&requirements)
    .bind(&post.salary_range)
    .bind(&post.location)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(row))
}

/// POST /api/v1/jobs/:id/save
///
/// Toggles the bookmark: saves the job if it is not saved, removes the save
/// if it is.
pub async fn handle_toggle_saved_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<UserIdBody>,
) -> Result<Json<SaveJobResponse>, AppError> {
    ensure_job_exists(&state.db, job_id).await?;

    let deleted: Option<Uuid> = sqlx::query_scalar(
        "DELETE FROM saved_jobs WHERE user_id = $1 AND job_id = $2 RETURNING id",
    )
    .bind(body.user_id)
    .bind(job_id)
    .fetch_optional(&state.db)
    .await?;

    if deleted.is_some() {
        return Ok(Json(SaveJobResponse { saved: false }));
    }

    sqlx::query("INSERT INTO saved_jobs (id, user_id, job_id, created_at) VALUES ($1, $2, $3, NOW())")
        .bind(Uuid::new_v4())
        .bind(body.user_id)
        .bind(job_id)
        .execute(&state.db)
        .await?;

    Ok(Json(SaveJobResponse { saved: true }))
}

/// POST /api/v1/jobs/:id/apply
///
/// One application per user per job; a second attempt is rejected.
pub async fn handle_apply_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<UserIdBody>,
) -> Result<Json<ApplicationRow>, AppError> {
    ensure_job_exists(&state.db, job_id).await?;

    let existing: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM applications WHERE user_id = $1 AND job_id = $2")
            .bind(body.user_id)
            .bind(job_id)
            .fetch_optional(&state.db)
            .await?;

    if existing.is_some() {
        return Err(AppError::Validation(
            "You have already applied for this job".to_string(),
        ));
    }

    let row: ApplicationRow = sqlx::query_as(
        r#"
        INSERT INTO applications (id, user_id, job_id, status, created_at)
        VALUES ($1, $2, $3, 'applied', NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(body.user_id)
    .bind(job_id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(row))
}

async fn ensure_job_exists(pool: &PgPool, job_id: Uuid) -> Result<(), AppError> {
    let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }
    Ok(())
}
