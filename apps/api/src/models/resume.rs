use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One resume per user, replaced on every successful upload (upsert keyed by
/// `user_id`). `ats_score` is nullable: the store may hand back a row without
/// a valid score, which the reconciler repairs after the fact.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_url: String,
    pub file_name: String,
    pub parsed_content: String,
    pub ats_score: Option<f64>,
    pub keywords: Vec<String>,
    pub recommendations: Vec<String>,
    pub updated_at: DateTime<Utc>,
}
