//! Interview feedback generation.
//!
//! Combines the user's stored resume text with their skill assessments and
//! asks the LLM for coaching feedback. Unlike resume scoring there is no
//! local fallback here; failures surface to the caller.

pub mod handlers;
pub mod prompts;

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, FEEDBACK_MODEL};
use crate::models::skills::SkillAssessmentRow;
use crate::upload::persist::fetch_resume;

use prompts::{FEEDBACK_SYSTEM_PROMPT, FEEDBACK_USER_TEMPLATE};

pub async fn generate_feedback(
    pool: &PgPool,
    llm: &LlmClient,
    user_id: Uuid,
) -> Result<String, AppError> {
    let resume_text = fetch_resume(pool, user_id)
        .await?
        .map(|r| r.parsed_content)
        .unwrap_or_else(|| "No resume available".to_string());

    let skills: Vec<SkillAssessmentRow> =
        sqlx::query_as("SELECT * FROM skill_assessments WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

    let skills_json = json!(skills
        .iter()
        .map(|s| json!({ "skill_name": s.skill_name, "score": s.score }))
        .collect::<Vec<_>>());

    let prompt = FEEDBACK_USER_TEMPLATE
        .replace("{resume}", &resume_text)
        .replace("{skills}", &skills_json.to_string());

    llm.chat(FEEDBACK_MODEL, FEEDBACK_SYSTEM_PROMPT, &prompt, false)
        .await
        .map_err(|e| AppError::Llm(format!("Failed to generate feedback: {e}")))
}
