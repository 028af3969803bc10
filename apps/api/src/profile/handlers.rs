use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::ProfileRow;
use crate::models::skills::SkillAssessmentRow;
use crate::profile::completeness::completion_percentage;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub profile: ProfileRow,
    pub completion: f64,
}

#[derive(Deserialize)]
pub struct ProfileUpdate {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile: Option<ProfileRow> = sqlx::query_as("SELECT * FROM profiles WHERE id = $1")
        .bind(params.user_id)
        .fetch_optional(&state.db)
        .await?;

    let profile = profile
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", params.user_id)))?;
    let completion = completion_percentage(&profile);

    Ok(Json(ProfileResponse {
        profile,
        completion,
    }))
}

/// PUT /api/v1/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile: Option<ProfileRow> = sqlx::query_as(
        r#"
        UPDATE profiles
        SET full_name = $1, title = $2, company = $3, location = $4, bio = $5,
            updated_at = NOW()
        WHERE id = $6
        RETURNING *
        "#,
    )
    .bind(&update.full_name)
    .bind(&update.title)
    .bind(&update.company)
    .bind(&update.location)
    .bind(&update.bio)
    .bind(update.user_id)
    .fetch_optional(&state.db)
    .await?;

    let profile = profile
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", update.user_id)))?;
    let completion = completion_percentage(&profile);

    Ok(Json(ProfileResponse {
        profile,
        completion,
    }))
}

/// GET /api/v1/skills
///
/// Skill assessments are produced elsewhere; this service only reads them.
pub async fn handle_list_skills(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<SkillAssessmentRow>>, AppError> {
    let skills: Vec<SkillAssessmentRow> =
        sqlx::query_as("SELECT * FROM skill_assessments WHERE user_id = $1 ORDER BY skill_name")
            .bind(params.user_id)
            .fetch_all(&state.db)
            .await?;
    Ok(Json(skills))
}
