//! Entry points for sync runs and previews.
//!
//! A run moves through `Initialized -> Fetching -> Reconciling -> Finalizing`
//! and ends in `Succeeded` or `Failed`. A fetch failure skips reconciliation
//! entirely; every other problem is recorded and the run carries on.

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use super::preview::PreviewPlanner;
use super::reconciler::Reconciler;
use super::recorder::SyncRunRecorder;
use super::report::{PreviewResult, SyncResult, STRATEGY};
use super::stats::RunStats;
use super::SyncError;
use crate::catalog::{CatalogFetcher, CatalogSnapshot, FetchRequest};
use crate::filter::{FilterConfig, FilterOverrides, ProductFilter};
use crate::models::{RunStatus, SyncRun, SyncRunUpdate};
use crate::store::LocalStore;

const DEFAULT_FETCH_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
    Initialized,
    Fetching,
    Reconciling,
    Finalizing,
    Succeeded,
    Failed,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunPhase::Initialized => write!(f, "initialized"),
            RunPhase::Fetching => write!(f, "fetching"),
            RunPhase::Reconciling => write!(f, "reconciling"),
            RunPhase::Finalizing => write!(f, "finalizing"),
            RunPhase::Succeeded => write!(f, "succeeded"),
            RunPhase::Failed => write!(f, "failed"),
        }
    }
}

fn enter(phase: &mut RunPhase, next: RunPhase, sync_id: Uuid) {
    tracing::debug!(%sync_id, from = %phase, to = %next, "Sync phase change");
    *phase = next;
}

/// Compiles the run's filter, moving the run to `Failed` when the
/// configuration is invalid.
fn compile_filter(
    config: FilterConfig,
    phase: &mut RunPhase,
    sync_id: Uuid,
) -> Result<ProductFilter, String> {
    ProductFilter::new(config).map_err(|e| {
        enter(phase, RunPhase::Failed, sync_id);
        tracing::error!(%sync_id, error = %e, "Invalid filter configuration");
        e.to_string()
    })
}

pub struct SyncOrchestrator {
    store: Arc<dyn LocalStore>,
    fetcher: Arc<dyn CatalogFetcher>,
    config: FilterConfig,
    fetch_limit: u32,
}

impl SyncOrchestrator {
    pub fn new(
        store: Arc<dyn LocalStore>,
        fetcher: Arc<dyn CatalogFetcher>,
        config: FilterConfig,
    ) -> Self {
        Self {
            store,
            fetcher,
            config,
            fetch_limit: DEFAULT_FETCH_LIMIT,
        }
    }

    pub fn with_fetch_limit(mut self, limit: u32) -> Self {
        self.fetch_limit = limit.max(1);
        self
    }

    /// Runs a sync with `overrides` layered on the configured rules.
    pub async fn sync_filtered_products(&self, overrides: &FilterOverrides) -> SyncResult {
        self.run(self.config.clone().with_overrides(overrides)).await
    }

    /// Previews a sync with `overrides` layered on the configured rules.
    pub async fn preview_filtered_sync(&self, overrides: &FilterOverrides) -> PreviewResult {
        self.preview(self.config.clone().with_overrides(overrides))
            .await
    }

    async fn fetch(&self) -> Result<CatalogSnapshot, SyncError> {
        let request = FetchRequest::items_and_categories(self.fetch_limit);
        Ok(self.fetcher.fetch(&request).await?)
    }

    pub async fn run(&self, config: FilterConfig) -> SyncResult {
        let sync_id = Uuid::new_v4();
        let started_at = Utc::now();
        let mut phase = RunPhase::Initialized;

        tracing::info!(%sync_id, dry_run = config.dry_run, "Starting catalog sync");

        let filter = match compile_filter(config, &mut phase, sync_id) {
            Ok(filter) => filter,
            Err(message) => {
                return SyncResult::failed(sync_id, started_at, Utc::now(), message);
            }
        };
        let dry_run = filter.config().dry_run;

        let recorder = SyncRunRecorder::new(self.store.as_ref());
        recorder
            .start(&SyncRun::start(
                sync_id,
                started_at,
                json!({
                    "strategy": STRATEGY,
                    "dryRun": dry_run,
                    "config": filter.config(),
                }),
            ))
            .await;

        enter(&mut phase, RunPhase::Fetching, sync_id);
        let outcome: Result<RunStats, SyncError> = match self.fetch().await {
            Ok(snapshot) => {
                enter(&mut phase, RunPhase::Reconciling, sync_id);
                tracing::info!(
                    %sync_id,
                    items = snapshot.items.len(),
                    related = snapshot.related_objects.len(),
                    "Fetched catalog"
                );
                let graph = snapshot.graph();
                let reconciler = Reconciler::new(self.store.as_ref(), &filter, &graph);
                Ok(reconciler.reconcile(&snapshot.items).await)
            }
            Err(e) => {
                tracing::error!(%sync_id, error = %e, "Catalog fetch failed; aborting run");
                Err(e)
            }
        };

        enter(&mut phase, RunPhase::Finalizing, sync_id);
        let completed_at = Utc::now();

        let (result, update) = match outcome {
            Ok(stats) => {
                enter(&mut phase, RunPhase::Succeeded, sync_id);
                let result =
                    SyncResult::completed(sync_id, started_at, completed_at, &stats, dry_run);
                let update = SyncRunUpdate {
                    status: RunStatus::Succeeded,
                    completed_at,
                    products_synced: stats.synced() as i64,
                    products_skipped: (stats.skipped + stats.protected) as i64,
                    errors: stats.error_messages.clone(),
                    metadata: json!({
                        "strategy": STRATEGY,
                        "dryRun": dry_run,
                        "config": filter.config(),
                        "stats": stats,
                        "outcome": "succeeded",
                        "phase": phase,
                    }),
                };
                (result, update)
            }
            Err(e) => {
                enter(&mut phase, RunPhase::Failed, sync_id);
                let message = e.to_string();
                let update = SyncRunUpdate {
                    status: RunStatus::Failed,
                    completed_at,
                    products_synced: 0,
                    products_skipped: 0,
                    errors: vec![message.clone()],
                    metadata: json!({
                        "strategy": STRATEGY,
                        "dryRun": dry_run,
                        "config": filter.config(),
                        "stats": RunStats::default(),
                        "outcome": "failed",
                        "phase": phase,
                    }),
                };
                (
                    SyncResult::failed(sync_id, started_at, completed_at, message),
                    update,
                )
            }
        };

        recorder.finish(sync_id, &update).await;

        tracing::info!(%sync_id, success = result.success, "{}", result.message);
        result
    }

    /// Classifies the current catalog without writing anything, including
    /// run history.
    pub async fn preview(&self, config: FilterConfig) -> PreviewResult {
        let filter = match ProductFilter::new(config) {
            Ok(filter) => filter,
            Err(e) => return PreviewResult::failed(e.to_string()),
        };

        let snapshot = match self.fetch().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "Catalog fetch failed during preview");
                return PreviewResult::failed(e.to_string());
            }
        };

        let graph = snapshot.graph();
        PreviewPlanner::new(self.store.as_ref(), &filter, &graph)
            .plan(&snapshot.items)
            .await
    }
}
