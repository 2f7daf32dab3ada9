mod config_cmd;
mod history_cmd;
mod preview_cmd;
mod sync_cmd;

pub use config_cmd::ConfigCommand;
pub use history_cmd::HistoryCommand;
pub use preview_cmd::PreviewCommand;
pub use sync_cmd::SyncCommand;

use clap::ValueEnum;
use std::sync::Arc;

use catalog_sync::{Config, HttpCatalogFetcher, SqliteStore, SyncOrchestrator};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Wires the SQLite store and HTTP catalog client from `config`.
pub async fn build_orchestrator(
    config: &Config,
) -> Result<SyncOrchestrator, Box<dyn std::error::Error>> {
    if !config.catalog.is_configured() {
        return Err(
            "Catalog not configured: set catalog.base_url and catalog.access_token \
             (or CATALOG_SYNC_CATALOG_URL / CATALOG_SYNC_ACCESS_TOKEN)"
                .into(),
        );
    }

    let store = SqliteStore::open(&config.database_path.value).await?;
    let fetcher = HttpCatalogFetcher::from_config(&config.catalog)?;

    Ok(SyncOrchestrator::new(
        Arc::new(store),
        Arc::new(fetcher),
        config.filter.clone(),
    )
    .with_fetch_limit(config.catalog.page_limit))
}
