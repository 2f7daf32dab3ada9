//! Local store contract consumed by the sync engine.
//!
//! Each call is its own atomic unit; the engine never wraps several writes in
//! one transaction, so a run is not all-or-nothing.

#[cfg(test)]
pub mod memory;
mod sqlite;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    CategoryData, LocalCategory, LocalProduct, ProductData, SyncRun, SyncRunUpdate,
};

pub use sqlite::{init_db, SqliteStore};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid stored value: {0}")]
    InvalidData(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Write rejected: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn find_product_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<LocalProduct>, StoreError>;

    async fn find_product_by_slug(&self, slug: &str) -> Result<Option<LocalProduct>, StoreError>;

    async fn create_product(&self, data: &ProductData) -> Result<LocalProduct, StoreError>;

    async fn update_product(&self, id: Uuid, data: &ProductData)
        -> Result<LocalProduct, StoreError>;

    /// Matches on external id first, then on case-insensitive name.
    async fn find_category_by_name_or_external_id(
        &self,
        name: &str,
        external_id: Option<&str>,
    ) -> Result<Option<LocalCategory>, StoreError>;

    async fn create_category(&self, data: &CategoryData) -> Result<LocalCategory, StoreError>;

    async fn update_category(
        &self,
        id: Uuid,
        data: &CategoryData,
    ) -> Result<LocalCategory, StoreError>;

    async fn create_sync_run(&self, run: &SyncRun) -> Result<(), StoreError>;

    async fn update_sync_run(&self, id: Uuid, update: &SyncRunUpdate) -> Result<(), StoreError>;

    /// Most recent runs first.
    async fn list_sync_runs(&self, limit: u32) -> Result<Vec<SyncRun>, StoreError>;
}
