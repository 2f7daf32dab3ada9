//! Access to the external catalog service.
//!
//! The engine only depends on the [`CatalogFetcher`] trait; the HTTP
//! implementation lives in [`client`].

pub mod client;
pub mod graph;

use async_trait::async_trait;
use serde::Serialize;

use crate::models::CatalogItem;

pub use client::{CatalogClientConfig, HttpCatalogFetcher};
pub use graph::{RelatedObject, RelatedObjectGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectType {
    Item,
    Category,
}

/// Parameters of a catalog fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub object_types: Vec<ObjectType>,
    pub include_deleted: bool,
    pub include_related: bool,
    pub limit: u32,
}

impl FetchRequest {
    /// Items and categories, live objects only, with related objects.
    pub fn items_and_categories(limit: u32) -> Self {
        Self {
            object_types: vec![ObjectType::Item, ObjectType::Category],
            include_deleted: false,
            include_related: true,
            limit,
        }
    }
}

/// Everything one fetch returned.
///
/// `related_objects` already contains top-level categories merged with the
/// related-object list.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub items: Vec<CatalogItem>,
    pub related_objects: Vec<RelatedObject>,
}

impl CatalogSnapshot {
    pub fn graph(&self) -> RelatedObjectGraph {
        RelatedObjectGraph::build(self.related_objects.iter().cloned())
    }
}

/// Errors surfaced by a catalog fetch. All of them abort the run.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Catalog service not configured: {0}")]
    NotConfigured(String),
    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Catalog service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to decode catalog response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<CatalogSnapshot, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_and_categories_request() {
        let request = FetchRequest::items_and_categories(100);
        assert_eq!(
            request.object_types,
            vec![ObjectType::Item, ObjectType::Category]
        );
        assert!(!request.include_deleted);
        assert!(request.include_related);
        assert_eq!(request.limit, 100);
    }

    #[test]
    fn test_object_type_wire_names() {
        let json = serde_json::to_string(&vec![ObjectType::Item, ObjectType::Category]).unwrap();
        assert_eq!(json, r#"["ITEM","CATEGORY"]"#);
    }

    #[test]
    fn test_snapshot_graph() {
        let snapshot = CatalogSnapshot {
            items: vec![],
            related_objects: vec![
                RelatedObject::category("C1", "ALFAJORES"),
                RelatedObject::image("I1", "https://img/1.jpg"),
            ],
        };
        let graph = snapshot.graph();
        assert_eq!(graph.category_name("C1"), Some("ALFAJORES"));
        assert_eq!(graph.image_url("I1"), Some("https://img/1.jpg"));
    }
}
