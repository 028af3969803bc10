#![allow(dead_code)]

//! Upload state machine.
//!
//! Each user's upload runs through `idle → uploading → analyzing → saving →
//! idle`, returning to `idle` on both success and failure. The state is an
//! explicit struct published on a watch channel so callers can observe
//! progress, and the registry enforces one in-flight upload per user.
//! Delayed tasks (staggered refetch, reconciler) are tracked per upload and
//! aborted when the same user starts a new one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStage {
    Idle,
    Uploading,
    Analyzing,
    Saving,
}

/// Observable state of a user's upload flow.
#[derive(Debug, Clone, Serialize)]
pub struct UploadState {
    pub stage: UploadStage,
    pub error: Option<String>,
    pub result: Option<ResumeRow>,
}

impl UploadState {
    pub fn idle() -> Self {
        Self {
            stage: UploadStage::Idle,
            error: None,
            result: None,
        }
    }
}

/// Legal transitions: the forward chain, plus a reset to idle from anywhere.
pub fn is_valid_transition(from: UploadStage, to: UploadStage) -> bool {
    use UploadStage::*;
    matches!(
        (from, to),
        (Idle, Uploading) | (Uploading, Analyzing) | (Analyzing, Saving) | (_, Idle)
    )
}

struct UserUpload {
    tx: watch::Sender<UploadState>,
    /// Claimed inside `begin`'s critical section, released by `finish` or
    /// the publisher's `Drop`. The published stage is display state only;
    /// this flag is what gates concurrent uploads.
    in_flight: AtomicBool,
    /// Delayed tasks for the last upload, aborted when a new one begins.
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl UserUpload {
    fn abort_pending(&self) {
        for handle in self.pending.lock().expect("pending tasks poisoned").drain(..) {
            handle.abort();
        }
    }
}

/// Tracks in-flight uploads and their published state, one slot per user.
#[derive(Clone, Default)]
pub struct UploadRegistry {
    inner: Arc<Mutex<HashMap<Uuid, Arc<UserUpload>>>>,
}

impl UploadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins an upload for a user. Fails if one is already in flight —
    /// the server-side analog of the disabled file input. The slot is
    /// claimed before the registry lock is released, so two simultaneous
    /// requests for one user cannot both pass the guard. Delayed tasks left
    /// over from the previous upload are cancelled so they cannot overwrite
    /// fresh state with stale data.
    pub fn begin(&self, user_id: Uuid) -> Result<StagePublisher, AppError> {
        let mut map = self.inner.lock().expect("upload registry poisoned");

        if let Some(existing) = map.get(&user_id) {
            if existing.in_flight.load(Ordering::Acquire) {
                return Err(AppError::Validation(
                    "An upload is already in progress".to_string(),
                ));
            }
            existing.abort_pending();
        }

        let (tx, _rx) = watch::channel(UploadState::idle());
        let upload = Arc::new(UserUpload {
            tx,
            in_flight: AtomicBool::new(true),
            pending: Mutex::new(Vec::new()),
        });
        map.insert(user_id, upload.clone());

        Ok(StagePublisher {
            upload,
            current: UploadStage::Idle,
            finished: false,
        })
    }

    /// Current state of a user's upload, if any has been started.
    pub fn state(&self, user_id: Uuid) -> Option<UploadState> {
        let map = self.inner.lock().expect("upload registry poisoned");
        map.get(&user_id).map(|u| u.tx.borrow().clone())
    }

    /// Subscribes to a user's upload state stream.
    pub fn subscribe(&self, user_id: Uuid) -> Option<watch::Receiver<UploadState>> {
        let map = self.inner.lock().expect("upload registry poisoned");
        map.get(&user_id).map(|u| u.tx.subscribe())
    }
}

/// Drives one upload's state. The flow resets to idle via
/// [`StagePublisher::finish`] on success and failure alike; if the driving
/// future is dropped mid-flight (client disconnect), `Drop` resets the slot
/// so the user is not locked out of future uploads.
pub struct StagePublisher {
    upload: Arc<UserUpload>,
    current: UploadStage,
    finished: bool,
}

impl StagePublisher {
    /// Advances to the next stage. Transitions outside the legal set are a
    /// programming error.
    pub fn advance(&mut self, stage: UploadStage) {
        debug_assert!(
            is_valid_transition(self.current, stage),
            "illegal upload transition {:?} -> {:?}",
            self.current,
            stage
        );
        self.current = stage;
        self.upload.tx.send_replace(UploadState {
            stage,
            error: None,
            result: None,
        });
    }

    /// Resets to idle with the final outcome: the saved row on success, a
    /// generic message on failure. Releases the user's upload slot.
    pub fn finish(&mut self, result: Result<ResumeRow, String>) {
        self.current = UploadStage::Idle;
        self.finished = true;
        let state = match result {
            Ok(row) => UploadState {
                stage: UploadStage::Idle,
                error: None,
                result: Some(row),
            },
            Err(message) => UploadState {
                stage: UploadStage::Idle,
                error: Some(message),
                result: None,
            },
        };
        self.upload.tx.send_replace(state);
        self.upload.in_flight.store(false, Ordering::Release);
    }

    /// A cloneable handle for delayed tasks to publish refreshed rows.
    pub fn handle(&self) -> StageHandle {
        StageHandle {
            upload: self.upload.clone(),
        }
    }

    /// Ties a delayed task to this upload's lifetime; it is aborted when the
    /// user starts a new upload.
    pub fn track(&self, handle: JoinHandle<()>) {
        self.upload
            .pending
            .lock()
            .expect("pending tasks poisoned")
            .push(handle);
    }
}

impl Drop for StagePublisher {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        // The driving future was dropped without reaching `finish` — reset
        // to idle and release the slot so later uploads are not blocked.
        self.upload.tx.send_replace(UploadState {
            stage: UploadStage::Idle,
            error: Some("Upload interrupted".to_string()),
            result: None,
        });
        self.upload.in_flight.store(false, Ordering::Release);
    }
}

/// Publishes refreshed rows from delayed refetch/reconcile tasks.
#[derive(Clone)]
pub struct StageHandle {
    upload: Arc<UserUpload>,
}

impl StageHandle {
    pub fn publish_result(&self, row: ResumeRow) {
        self.upload.tx.send_replace(UploadState {
            stage: UploadStage::Idle,
            error: None,
            result: Some(row),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_chain_is_valid() {
        use UploadStage::*;
        assert!(is_valid_transition(Idle, Uploading));
        assert!(is_valid_transition(Uploading, Analyzing));
        assert!(is_valid_transition(Analyzing, Saving));
        assert!(is_valid_transition(Saving, Idle));
    }

    #[test]
    fn test_any_stage_can_reset_to_idle() {
        use UploadStage::*;
        for stage in [Idle, Uploading, Analyzing, Saving] {
            assert!(is_valid_transition(stage, Idle));
        }
    }

    #[test]
    fn test_skipping_stages_is_invalid() {
        use UploadStage::*;
        assert!(!is_valid_transition(Idle, Analyzing));
        assert!(!is_valid_transition(Idle, Saving));
        assert!(!is_valid_transition(Uploading, Saving));
        assert!(!is_valid_transition(Saving, Uploading));
    }

    #[tokio::test]
    async fn test_registry_rejects_concurrent_upload() {
        let registry = UploadRegistry::new();
        let user = Uuid::new_v4();

        let mut first = registry.begin(user).expect("first upload");
        first.advance(UploadStage::Uploading);

        assert!(matches!(
            registry.begin(user),
            Err(AppError::Validation(_))
        ));
        first.finish(Err("done".to_string()));
    }

    #[tokio::test]
    async fn test_slot_is_claimed_before_any_stage_advance() {
        // The guard must hold from `begin` itself, not from the first
        // `advance`, or two simultaneous requests could both pass it.
        let registry = UploadRegistry::new();
        let user = Uuid::new_v4();

        let _first = registry.begin(user).expect("first upload");
        assert!(matches!(
            registry.begin(user),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_registry_allows_new_upload_after_finish() {
        let registry = UploadRegistry::new();
        let user = Uuid::new_v4();

        let mut first = registry.begin(user).expect("first upload");
        first.advance(UploadStage::Uploading);
        first.finish(Err("Failed to upload resume".to_string()));

        assert!(registry.begin(user).is_ok());
        let state = registry.state(user).expect("state present");
        assert_eq!(state.stage, UploadStage::Idle);
    }

    #[tokio::test]
    async fn test_dropped_publisher_releases_slot() {
        // A client disconnect drops the handler future mid-upload; the slot
        // must reset to idle instead of blocking the user forever.
        let registry = UploadRegistry::new();
        let user = Uuid::new_v4();

        let mut abandoned = registry.begin(user).expect("first upload");
        abandoned.advance(UploadStage::Uploading);
        drop(abandoned);

        let state = registry.state(user).expect("state present");
        assert_eq!(state.stage, UploadStage::Idle);
        assert!(state.error.is_some());
        assert!(registry.begin(user).is_ok());
    }

    #[tokio::test]
    async fn test_finished_publisher_drop_keeps_result() {
        let registry = UploadRegistry::new();
        let user = Uuid::new_v4();

        let mut publisher = registry.begin(user).expect("upload");
        publisher.advance(UploadStage::Uploading);
        publisher.finish(Err("Failed to upload resume".to_string()));
        let before = registry.state(user).expect("state present");
        drop(publisher);

        // Drop after finish must not overwrite the published outcome
        let after = registry.state(user).expect("state present");
        assert_eq!(after.error, before.error);
        assert_eq!(after.stage, UploadStage::Idle);
    }

    #[tokio::test]
    async fn test_new_upload_aborts_pending_tasks() {
        let registry = UploadRegistry::new();
        let user = Uuid::new_v4();

        let mut first = registry.begin(user).expect("first upload");
        first.advance(UploadStage::Uploading);
        let task = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        });
        first.track(task);
        first.finish(Err("boom".to_string()));

        let _second = registry.begin(user).expect("second upload");

        // The tracked task was aborted by the new begin
        let pending = first.upload.pending.lock().unwrap();
        assert!(pending.is_empty());
    }
}
