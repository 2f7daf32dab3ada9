//! Sync error types.

use crate::catalog::FetchError;
use crate::filter::FilterError;
use crate::store::StoreError;

/// Errors that can occur during a sync run.
///
/// Only `Fetch` and `Filter` abort a run; the rest are recorded against the
/// item that caused them.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Invalid catalog item '{external_id}': {reason}")]
    InvalidItem { external_id: String, reason: String },
}
