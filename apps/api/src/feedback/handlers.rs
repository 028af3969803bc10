use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::generate_feedback;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct FeedbackResponse {
    pub text: String,
}

/// POST /api/v1/feedback
pub async fn handle_generate_feedback(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let text = generate_feedback(&state.db, &state.llm, req.user_id).await?;
    Ok(Json(FeedbackResponse { text }))
}
