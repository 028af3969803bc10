use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Externally produced skill assessment. Read-only from this service's
/// perspective.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillAssessmentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub skill_name: String,
    pub score: f64,
    pub created_at: DateTime<Utc>,
}
