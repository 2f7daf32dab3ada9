//! Shared catalog fixtures for engine tests.

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::catalog::{CatalogFetcher, CatalogSnapshot, FetchError, FetchRequest, RelatedObject};
use crate::models::{CatalogItem, ItemVariation};

fn priced(amount: serde_json::Value) -> ItemVariation {
    ItemVariation {
        external_id: "VAR".to_string(),
        name: Some("Regular".to_string()),
        price_amount: Some(amount),
    }
}

/// Five items: three to sync, one protected, one unmatched.
pub fn snapshot() -> CatalogSnapshot {
    let items = vec![
        CatalogItem::new("ALF-1", "Alfajor de Dulce de Leche")
            .with_description("Classic")
            .with_categories(vec!["CAT-ALF".to_string()])
            .with_images(vec!["IMG-1".to_string()])
            .with_variation(priced(json!(450))),
        CatalogItem::new("EMP-1", "Empanada de Carne")
            .with_legacy_category("CAT-EMP")
            .with_images(vec!["IMG-MISSING".to_string()])
            .with_variation(priced(json!("900"))),
        CatalogItem::new("EMP-LOOSE", "Empanada Suelta"),
        CatalogItem::new("CATER-1", "Alfajor Catering Tray")
            .with_categories(vec!["CAT-CATER".to_string()])
            .with_variation(priced(json!(9000))),
        CatalogItem::new("BEB-1", "Coca Cola")
            .with_categories(vec!["CAT-BEB".to_string()])
            .with_variation(priced(json!(300))),
    ];

    CatalogSnapshot {
        items,
        related_objects: vec![
            RelatedObject::category("CAT-ALF", "ALFAJORES"),
            RelatedObject::category("CAT-EMP", "EMPANADAS - Horno"),
            RelatedObject::category("CAT-CATER", "CATERING- TRAYS"),
            RelatedObject::category("CAT-BEB", "Bebidas"),
            RelatedObject::image("IMG-1", "https://img/alf-1.jpg"),
        ],
    }
}

/// Returns the same snapshot on every call.
pub struct StaticFetcher {
    snapshot: CatalogSnapshot,
    pub calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            snapshot,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CatalogFetcher for StaticFetcher {
    async fn fetch(&self, _request: &FetchRequest) -> Result<CatalogSnapshot, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot.clone())
    }
}

/// Fails every fetch with a status error.
pub struct FailingFetcher;

#[async_trait]
impl CatalogFetcher for FailingFetcher {
    async fn fetch(&self, _request: &FetchRequest) -> Result<CatalogSnapshot, FetchError> {
        Err(FetchError::Status {
            status: 503,
            body: "catalog unavailable".to_string(),
        })
    }
}
