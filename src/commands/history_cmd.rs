use clap::Args;

use super::OutputFormat;
use catalog_sync::{Config, LocalStore, SqliteStore};

#[derive(Args)]
pub struct HistoryCommand {
    /// Number of runs to show, newest first
    #[arg(long, short, default_value = "10")]
    pub limit: u32,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl HistoryCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let store = SqliteStore::open(&config.database_path.value).await?;
        let runs = store.list_sync_runs(self.limit).await?;

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&runs)?);
            }
            OutputFormat::Text => {
                if runs.is_empty() {
                    println!("No sync runs recorded.");
                    return Ok(());
                }

                for run in &runs {
                    let completed = run
                        .completed_at
                        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                        .unwrap_or_else(|| "-".to_string());
                    let dry_run = run.metadata["dryRun"].as_bool().unwrap_or(false);

                    println!(
                        "{}  {}{}",
                        run.id,
                        run.status,
                        if dry_run { " (dry run)" } else { "" }
                    );
                    println!(
                        "  started: {}  completed: {}",
                        run.started_at.format("%Y-%m-%d %H:%M:%S"),
                        completed
                    );
                    println!(
                        "  synced: {}  skipped: {}  errors: {}",
                        run.products_synced,
                        run.products_skipped,
                        run.errors.len()
                    );
                }
            }
        }
        Ok(())
    }
}
