//! Inclusion and protection rules applied to catalog items.

pub mod category;
mod config;
mod product;

pub use category::{CategoryResolution, CategoryResolver};
pub use config::{FilterConfig, FilterOverrides};
pub use product::{FilterDecision, ProductFilter};

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("Invalid product name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
