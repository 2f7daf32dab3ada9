mod catalog;
mod category;
mod product;
mod sync_run;

pub use catalog::{CatalogItem, ItemVariation, Visibility};
pub use category::{CategoryData, LocalCategory};
pub use product::{LocalProduct, ProductData};
pub use sync_run::{RunStatus, SyncRun, SyncRunUpdate};
