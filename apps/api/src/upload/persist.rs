use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::storage::FileStore;
use crate::upload::scorer::{ResumeAnalysis, DEFAULT_ATS_SCORE};

/// Everything needed to write one resume row.
pub struct ResumeDraft {
    pub user_id: Uuid,
    pub file_url: String,
    pub file_name: String,
    pub parsed_content: String,
    pub analysis: ResumeAnalysis,
}

/// Guarantees a finite in-range score before the row is written. The scorer
/// already normalizes, so this only matters if a caller hands over raw data.
pub fn normalize_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        DEFAULT_ATS_SCORE
    }
}

/// Seam over the resume table so the pipeline's persistence step can be
/// exercised without a database.
#[async_trait]
pub trait ResumeRepo: Send + Sync {
    /// Writes the draft as the user's one resume row. Keyed by `user_id`:
    /// re-running replaces the row, it never inserts a second one.
    async fn upsert(&self, draft: &ResumeDraft) -> Result<ResumeRow, sqlx::Error>;
}

#[async_trait]
impl ResumeRepo for PgPool {
    async fn upsert(&self, draft: &ResumeDraft) -> Result<ResumeRow, sqlx::Error> {
        upsert_resume(self, draft).await
    }
}

/// Persists the draft through the repo; if the write fails, the uploaded
/// object is removed before the error propagates, so no orphaned file is
/// left behind.
pub async fn persist_with_compensation(
    repo: &dyn ResumeRepo,
    store: &dyn FileStore,
    draft: &ResumeDraft,
    object_key: &str,
) -> Result<ResumeRow, AppError> {
    match repo.upsert(draft).await {
        Ok(row) => Ok(row),
        Err(e) => {
            error!("Database error while saving resume: {e}");
            store.remove(object_key).await;
            Err(AppError::Database(e))
        }
    }
}

/// Upserts the user's resume row. Keyed by `user_id`: re-running with
/// identical input replaces the row, it never inserts a second one.
pub async fn upsert_resume(pool: &PgPool, draft: &ResumeDraft) -> Result<ResumeRow, sqlx::Error> {
    let ats_score = normalize_score(draft.analysis.ats_score);

    let row: ResumeRow = sqlx::query_as(
        r#"
        INSERT INTO resumes
            (id, user_id, file_url, file_name, parsed_content,
             ats_score, keywords, recommendations, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
        ON CONFLICT (user_id) DO UPDATE SET
            file_url = EXCLUDED.file_url,
            file_name = EXCLUDED.file_name,
            parsed_content = EXCLUDED.parsed_content,
            ats_score = EXCLUDED.ats_score,
            keywords = EXCLUDED.keywords,
            recommendations = EXCLUDED.recommendations,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(draft.user_id)
    .bind(&draft.file_url)
    .bind(&draft.file_name)
    .bind(&draft.parsed_content)
    .bind(ats_score)
    .bind(&draft.analysis.keywords)
    .bind(&draft.analysis.recommendations)
    .fetch_one(pool)
    .await?;

    info!(
        "Saved resume for user {} (score {})",
        draft.user_id, ats_score
    );

    Ok(row)
}

/// Fetches the user's resume row, if one exists. An absent row is a clean
/// `None`, not an error.
pub async fn fetch_resume(pool: &PgPool, user_id: Uuid) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM resumes WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;

    use bytes::Bytes;
    use chrono::Utc;

    use crate::storage::StoredObject;
    use crate::upload::scorer::ResumeAnalysis;

    /// In-memory repo with the same upsert contract as the table: one row
    /// per user, replaced on rewrite, original id retained.
    struct MemoryRepo {
        rows: Mutex<HashMap<Uuid, ResumeRow>>,
        fail_writes: bool,
    }

    impl MemoryRepo {
        fn new() -> Self {
            Self {
                rows: Mutex::new(HashMap::new()),
                fail_writes: false,
            }
        }

        fn failing() -> Self {
            Self {
                rows: Mutex::new(HashMap::new()),
                fail_writes: true,
            }
        }
    }

    #[async_trait]
    impl ResumeRepo for MemoryRepo {
        async fn upsert(&self, draft: &ResumeDraft) -> Result<ResumeRow, sqlx::Error> {
            if self.fail_writes {
                return Err(sqlx::Error::PoolClosed);
            }
            let mut rows = self.rows.lock().unwrap();
            let id = rows
                .get(&draft.user_id)
                .map(|r| r.id)
                .unwrap_or_else(Uuid::new_v4);
            let row = ResumeRow {
                id,
                user_id: draft.user_id,
                file_url: draft.file_url.clone(),
                file_name: draft.file_name.clone(),
                parsed_content: draft.parsed_content.clone(),
                ats_score: Some(normalize_score(draft.analysis.ats_score)),
                keywords: draft.analysis.keywords.clone(),
                recommendations: draft.analysis.recommendations.clone(),
                updated_at: Utc::now(),
            };
            rows.insert(draft.user_id, row.clone());
            Ok(row)
        }
    }

    struct MemoryStore {
        removed: Mutex<Vec<String>>,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self {
                removed: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FileStore for MemoryStore {
        async fn upload_resume(
            &self,
            _user_id: Uuid,
            file_name: &str,
            _content_type: &str,
            _bytes: Bytes,
        ) -> Result<StoredObject, AppError> {
            Ok(StoredObject {
                key: format!("mem/{file_name}"),
                public_url: format!("http://store/mem/{file_name}"),
            })
        }

        async fn remove(&self, key: &str) {
            self.removed.lock().unwrap().push(key.to_string());
        }
    }

    fn draft_for(user_id: Uuid, file_name: &str) -> ResumeDraft {
        ResumeDraft {
            user_id,
            file_url: format!("http://store/mem/{file_name}"),
            file_name: file_name.to_string(),
            parsed_content: "react developer".to_string(),
            analysis: ResumeAnalysis {
                ats_score: 82.0,
                keywords: vec!["react".to_string()],
                recommendations: Vec::new(),
            },
        }
    }

    #[tokio::test]
    async fn test_failed_write_removes_uploaded_object() {
        let repo = MemoryRepo::failing();
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let key = format!("{user}/resumes/1-cv.pdf");

        let result =
            persist_with_compensation(&repo, &store, &draft_for(user, "cv.pdf"), &key).await;

        assert!(matches!(result, Err(AppError::Database(_))));
        assert_eq!(*store.removed.lock().unwrap(), vec![key]);
    }

    #[tokio::test]
    async fn test_successful_write_keeps_uploaded_object() {
        let repo = MemoryRepo::new();
        let store = MemoryStore::new();
        let user = Uuid::new_v4();

        let row = persist_with_compensation(&repo, &store, &draft_for(user, "cv.pdf"), "key")
            .await
            .expect("persist succeeds");

        assert_eq!(row.user_id, user);
        assert!(store.removed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repeat_persist_keeps_one_row_per_user() {
        let repo = MemoryRepo::new();
        let store = MemoryStore::new();
        let user = Uuid::new_v4();

        let first = persist_with_compensation(&repo, &store, &draft_for(user, "old.pdf"), "k1")
            .await
            .expect("first persist");
        let second = persist_with_compensation(&repo, &store, &draft_for(user, "new.pdf"), "k2")
            .await
            .expect("second persist");

        assert_eq!(first.id, second.id);
        assert_eq!(second.file_name, "new.pdf");
        assert_eq!(repo.rows.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_normalize_score_passes_valid_values() {
        assert_eq!(normalize_score(36.0), 36.0);
        assert_eq!(normalize_score(0.0), 0.0);
        assert_eq!(normalize_score(100.0), 100.0);
    }

    #[test]
    fn test_normalize_score_clamps_range() {
        assert_eq!(normalize_score(-5.0), 0.0);
        assert_eq!(normalize_score(130.0), 100.0);
    }

    #[test]
    fn test_normalize_score_replaces_non_finite() {
        assert_eq!(normalize_score(f64::NAN), DEFAULT_ATS_SCORE);
        assert_eq!(normalize_score(f64::INFINITY), DEFAULT_ATS_SCORE);
    }
}
