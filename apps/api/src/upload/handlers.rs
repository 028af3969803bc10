use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::state::AppState;
use crate::upload::persist::fetch_resume;
use crate::upload::run_upload;
use crate::upload::stage::UploadState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// POST /api/v1/resumes
///
/// Multipart form with a `user_id` text field and a `file` field. Runs the
/// full upload-and-scoring pipeline and returns the saved row.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeRow>, AppError> {
    let mut user_id: Option<Uuid> = None;
    let mut file: Option<(String, Option<String>, bytes::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::Validation("Failed to read file".to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("user_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| AppError::Validation("Failed to read file".to_string()))?;
                let id = text
                    .parse()
                    .map_err(|_| AppError::Validation("Invalid user id".to_string()))?;
                user_id = Some(id);
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::Validation("Failed to read file".to_string()))?;
                file = Some((file_name, content_type, bytes));
            }
            _ => {}
        }
    }

    let user_id =
        user_id.ok_or_else(|| AppError::Validation("Missing user_id field".to_string()))?;
    let (file_name, content_type, bytes) =
        file.ok_or_else(|| AppError::Validation("Please select a file to upload".to_string()))?;

    let row = run_upload(&state, user_id, file_name, content_type, bytes).await?;
    Ok(Json(row))
}

/// GET /api/v1/resumes
///
/// The user's current resume row. An absent row is `null`, not an error.
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Option<ResumeRow>>, AppError> {
    let row = fetch_resume(&state.db, params.user_id).await?;
    Ok(Json(row))
}

/// GET /api/v1/resumes/status
///
/// Current upload state for the user. Users who never uploaded are idle.
pub async fn handle_upload_status(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Json<UploadState> {
    Json(
        state
            .uploads
            .state(params.user_id)
            .unwrap_or_else(UploadState::idle),
    )
}
