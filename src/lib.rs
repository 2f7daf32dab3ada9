//! Filtered catalog synchronization.
//!
//! Mirrors a product catalog owned by an external service into a local
//! SQLite store, syncing only items that match name or category rules and
//! never touching items in protected categories.

pub mod assets;
pub mod catalog;
pub mod config;
pub mod filter;
pub mod models;
pub mod store;
pub mod sync;

pub use catalog::{CatalogFetcher, HttpCatalogFetcher};
pub use config::{Config, ConfigError};
pub use filter::{FilterConfig, FilterOverrides, ProductFilter};
pub use store::{LocalStore, SqliteStore, StoreError};
pub use sync::{PreviewResult, SyncError, SyncOrchestrator, SyncResult};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
