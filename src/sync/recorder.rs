//! Best-effort run history bookkeeping.
//!
//! Neither method can fail: store errors are logged as warnings and dropped,
//! so a broken history table never affects a run.

use uuid::Uuid;

use crate::models::{SyncRun, SyncRunUpdate};
use crate::store::LocalStore;

pub struct SyncRunRecorder<'a> {
    store: &'a dyn LocalStore,
}

impl<'a> SyncRunRecorder<'a> {
    pub fn new(store: &'a dyn LocalStore) -> Self {
        Self { store }
    }

    pub async fn start(&self, run: &SyncRun) {
        match self.store.create_sync_run(run).await {
            Ok(()) => tracing::debug!(sync_id = %run.id, "Recorded sync run start"),
            Err(e) => {
                tracing::warn!(sync_id = %run.id, error = %e, "Failed to record sync run start")
            }
        }
    }

    pub async fn finish(&self, id: Uuid, update: &SyncRunUpdate) {
        match self.store.update_sync_run(id, update).await {
            Ok(()) => tracing::debug!(sync_id = %id, status = %update.status, "Finalized sync run"),
            Err(e) => tracing::warn!(sync_id = %id, error = %e, "Failed to finalize sync run"),
        }
    }
}
