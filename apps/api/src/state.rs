use std::sync::Arc;

use sqlx::PgPool;

use crate::llm_client::LlmClient;
use crate::storage::ObjectStore;
use crate::upload::scorer::AtsScorer;
use crate::upload::stage::UploadRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub store: ObjectStore,
    pub llm: LlmClient,
    /// Pluggable ATS scorer. Default: `LlmAtsScorer` with the local heuristic
    /// as its silent fallback.
    pub scorer: Arc<dyn AtsScorer>,
    /// Per-user upload state machines and their delayed tasks.
    pub uploads: UploadRegistry,
}
