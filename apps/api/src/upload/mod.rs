//! Resume upload-and-scoring workflow.
//!
//! One pipeline per request: validate → store → extract → score → persist →
//! reconcile, with the stage machine in [`stage`] publishing progress. The
//! persistence step owns the compensating cleanup: a failed database write
//! removes the just-uploaded file before the error propagates.

pub mod extract;
pub mod handlers;
pub mod persist;
pub mod prompts;
pub mod reconcile;
pub mod scorer;
pub mod stage;
pub mod validate;

use bytes::Bytes;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::state::AppState;
use crate::storage::FileStore;
use crate::upload::stage::UploadStage;

/// Runs the full upload pipeline for one file.
///
/// Validation failures reject before any network call. Scoring failures are
/// absorbed by the scorer's fallback and never abort the flow. Storage and
/// database failures abort with the stage reset to idle and a generic
/// message on the state stream.
pub async fn run_upload(
    state: &AppState,
    user_id: Uuid,
    file_name: String,
    content_type: Option<String>,
    bytes: Bytes,
) -> Result<ResumeRow, AppError> {
    let expected_type = validate::validate_upload(&file_name, content_type.as_deref(), bytes.len())?;

    let mut publisher = state.uploads.begin(user_id)?;
    publisher.advance(UploadStage::Uploading);

    let stored = match state
        .store
        .upload_resume(user_id, &file_name, expected_type, bytes.clone())
        .await
    {
        Ok(stored) => stored,
        Err(e) => {
            publisher.finish(Err("Failed to upload resume".to_string()));
            return Err(e);
        }
    };

    publisher.advance(UploadStage::Analyzing);
    let parsed_content = extract::extract_text(&bytes);
    let analysis = state.scorer.analyze(&parsed_content).await.into_analysis();

    publisher.advance(UploadStage::Saving);
    let draft = persist::ResumeDraft {
        user_id,
        file_url: stored.public_url.clone(),
        file_name,
        parsed_content,
        analysis,
    };

    let row = match persist::persist_with_compensation(&state.db, &state.store, &draft, &stored.key)
        .await
    {
        Ok(row) => row,
        Err(e) => {
            publisher.finish(Err("Failed to save resume information".to_string()));
            return Err(e);
        }
    };

    // Immediate refetch; the store may lag behind the write, in which case
    // the row returned by the upsert stands in until the delayed refetch.
    let row = persist::fetch_resume(&state.db, user_id)
        .await
        .ok()
        .flatten()
        .unwrap_or(row);

    publisher.finish(Ok(row.clone()));

    let refetch = reconcile::spawn_refetch(state.db.clone(), user_id, publisher.handle());
    publisher.track(refetch);
    let reconciler = reconcile::spawn_reconciler(state.db.clone(), user_id, publisher.handle());
    publisher.track(reconciler);

    Ok(row)
}
