use clap::{Args, Subcommand};
use std::fs;
use std::io::Write;

use super::OutputFormat;
use catalog_sync::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

const DEFAULT_CONFIG: &str = r#"# catalog-sync configuration

# Path to SQLite database (default: platform data dir/catalog-sync/catalog.db)
# database_path: catalog.db

catalog:
  # base_url: https://connect.example.com
  # access_token: set CATALOG_SYNC_ACCESS_TOKEN instead of storing it here
  api_version: "2024-01-18"
  page_limit: 100
  max_pages: 50

filter:
  allowed_product_name_patterns: [alfajor, empanada]
  allowed_categories: [ALFAJORES, EMPANADAS]
  # selected_categories: [ALFAJORES]
  protected_categories: [CATERING]
  batch_size: 50
  enable_image_sync: true
  dry_run: false
  batch_delay_ms: 100
"#;

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => print_config(config),
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = Config::default_config_path();

                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'catalog-sync config show' to view current configuration.");
                    return Ok(());
                }

                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = fs::File::create(&config_path)?;
                file.write_all(DEFAULT_CONFIG.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}

fn print_config(config: &Config) {
    println!("Configuration");
    println!("=============\n");

    if let Some(path) = &config.config_file {
        println!("Config file: {}", path.display());
    } else {
        println!(
            "Config file: {} (not found)",
            Config::default_config_path().display()
        );
    }
    println!();

    println!("database_path: {}", config.database_path.value.display());
    println!("  source: {}", config.database_path.source);
    println!();

    let catalog = &config.catalog;
    println!(
        "catalog.base_url: {}",
        catalog.base_url.as_deref().unwrap_or("(not set)")
    );
    println!(
        "catalog.access_token: {}",
        if catalog.access_token.is_some() {
            "(set)"
        } else {
            "(not set)"
        }
    );
    println!("catalog.api_version: {}", catalog.api_version);
    println!("catalog.page_limit: {}", catalog.page_limit);
    println!("catalog.max_pages: {}", catalog.max_pages);
    println!();

    let filter = &config.filter;
    println!(
        "filter.allowed_product_name_patterns: {}",
        filter.allowed_product_name_patterns.join(", ")
    );
    println!(
        "filter.allowed_categories: {}",
        filter.allowed_categories.join(", ")
    );
    if let Some(selected) = &filter.selected_categories {
        println!("filter.selected_categories: {}", selected.join(", "));
    }
    println!(
        "filter.protected_categories: {}",
        filter.protected_categories.join(", ")
    );
    println!("filter.batch_size: {}", filter.batch_size);
    println!("filter.enable_image_sync: {}", filter.enable_image_sync);
    println!("filter.dry_run: {}", filter.dry_run);
    println!("filter.batch_delay_ms: {}", filter.batch_delay_ms);
}
