use clap::Args;

use super::{build_orchestrator, OutputFormat};
use catalog_sync::{Config, FilterOverrides, SyncResult};

#[derive(Args)]
pub struct SyncCommand {
    /// Report what would change without writing products or categories
    #[arg(long)]
    pub dry_run: bool,

    /// Items processed per batch
    #[arg(long, short)]
    pub batch_size: Option<usize>,

    /// Restrict the run to a category (can be repeated)
    #[arg(long = "category", value_name = "NAME")]
    pub categories: Vec<String>,

    /// Skip image resolution and keep stored images
    #[arg(long)]
    pub no_images: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl SyncCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let orchestrator = build_orchestrator(config).await?;
        let result = orchestrator
            .sync_filtered_products(&self.overrides())
            .await;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
            OutputFormat::Text => print_result(&result),
        }

        if !result.success {
            return Err(result.message.into());
        }
        Ok(())
    }

    fn overrides(&self) -> FilterOverrides {
        FilterOverrides {
            selected_categories: if self.categories.is_empty() {
                None
            } else {
                Some(self.categories.clone())
            },
            batch_size: self.batch_size,
            enable_image_sync: self.no_images.then_some(false),
            dry_run: self.dry_run.then_some(true),
            ..FilterOverrides::default()
        }
    }
}

fn print_result(result: &SyncResult) {
    println!("{}", result.message);
    println!("  Sync ID: {}", result.metadata.sync_id);
    if !result.success {
        return;
    }

    let details = &result.product_details;
    println!("  Created: {}", details.created);
    println!("  Updated: {}", details.updated);
    println!("  Skipped: {}", details.skipped);
    println!("  Protected: {}", result.protected_items);
    println!(
        "  Images: {} with, {} without",
        details.with_images, details.without_images
    );

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in &result.errors {
            println!("  - {}", error);
        }
    }
}
