//! The filtered catalog sync engine.
//!
//! [`SyncOrchestrator`] is the entry point. It builds a [`ProductFilter`]
//! from the run's rules, fetches the catalog, and hands the items either to
//! the [`Reconciler`] (which writes) or the [`PreviewPlanner`] (which only
//! reads). Run history goes through [`SyncRunRecorder`], whose failures are
//! logged and never surface.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use catalog_sync::catalog::{CatalogClientConfig, HttpCatalogFetcher};
//! use catalog_sync::filter::{FilterConfig, FilterOverrides};
//! use catalog_sync::store::SqliteStore;
//! use catalog_sync::sync::SyncOrchestrator;
//!
//! # async fn demo(client: CatalogClientConfig) -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(SqliteStore::open("catalog.db".as_ref()).await?);
//! let fetcher = Arc::new(HttpCatalogFetcher::from_config(&client)?);
//! let orchestrator = SyncOrchestrator::new(store, fetcher, FilterConfig::default());
//!
//! let result = orchestrator
//!     .sync_filtered_products(&FilterOverrides::default())
//!     .await;
//! println!("{}", result.message);
//! # Ok(())
//! # }
//! ```
//!
//! [`ProductFilter`]: crate::filter::ProductFilter

mod error;
#[cfg(test)]
mod fixtures;
pub mod orchestrator;
pub mod preview;
pub mod reconciler;
pub mod recorder;
pub mod report;
pub mod slug;
pub mod stats;

pub use error::SyncError;
pub use orchestrator::{RunPhase, SyncOrchestrator};
pub use preview::PreviewPlanner;
pub use reconciler::Reconciler;
pub use recorder::SyncRunRecorder;
pub use report::{
    PlannedProduct, PreviewResult, PreviewSummary, ProductDetails, SkippedItem, SyncAction,
    SyncMetadata, SyncResult,
};
pub use slug::slugify;
pub use stats::RunStats;
