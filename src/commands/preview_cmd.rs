use clap::Args;

use super::{build_orchestrator, OutputFormat};
use catalog_sync::{Config, FilterOverrides, PreviewResult};

#[derive(Args)]
pub struct PreviewCommand {
    /// Restrict the preview to a category (can be repeated)
    #[arg(long = "category", value_name = "NAME")]
    pub categories: Vec<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl PreviewCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let orchestrator = build_orchestrator(config).await?;
        let overrides = FilterOverrides {
            selected_categories: if self.categories.is_empty() {
                None
            } else {
                Some(self.categories.clone())
            },
            ..FilterOverrides::default()
        };
        let preview = orchestrator.preview_filtered_sync(&overrides).await;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&preview)?),
            OutputFormat::Text => print_preview(&preview),
        }
        Ok(())
    }
}

fn print_preview(preview: &PreviewResult) {
    let summary = &preview.summary;
    println!("Sync Preview");
    println!("============\n");
    println!("Total products: {}", summary.total_products);
    println!("Will sync: {}", summary.will_sync);
    println!("Will skip: {}", summary.will_skip);
    println!("Protected: {}", summary.protected_items);

    if !preview.products_to_sync.is_empty() {
        println!("\nTo sync:");
        for product in &preview.products_to_sync {
            println!(
                "  [{}] {} ({}) -> {}",
                product.action, product.name, product.id, product.category
            );
        }
    }

    if !preview.items_to_skip.is_empty() {
        println!("\nSkipped:");
        for item in &preview.items_to_skip {
            println!("  {} ({}): {}", item.name, item.id, item.reason);
        }
    }

    if !preview.errors.is_empty() {
        println!("\nErrors:");
        for error in &preview.errors {
            println!("  - {}", error);
        }
    }
}
