//! Read-only classification of a catalog against the local store.

use super::reconciler::FALLBACK_CATEGORY;
use super::report::{PlannedProduct, PreviewResult, PreviewSummary, SkippedItem, SyncAction};
use crate::catalog::RelatedObjectGraph;
use crate::filter::{FilterDecision, ProductFilter};
use crate::models::CatalogItem;
use crate::store::LocalStore;

/// Classifies items into will-create, will-update and will-skip.
///
/// Only ever reads from the store.
pub struct PreviewPlanner<'a> {
    store: &'a dyn LocalStore,
    filter: &'a ProductFilter,
    graph: &'a RelatedObjectGraph,
}

impl<'a> PreviewPlanner<'a> {
    pub fn new(
        store: &'a dyn LocalStore,
        filter: &'a ProductFilter,
        graph: &'a RelatedObjectGraph,
    ) -> Self {
        Self {
            store,
            filter,
            graph,
        }
    }

    pub async fn plan(&self, items: &[CatalogItem]) -> PreviewResult {
        let mut result = PreviewResult::default();
        let mut protected = 0;

        for item in items {
            match self.filter.decide(item, self.graph) {
                FilterDecision::Sync => {}
                FilterDecision::SkipProtected(reason) => {
                    protected += 1;
                    result.items_to_skip.push(skipped(item, reason));
                    continue;
                }
                FilterDecision::SkipUnmatched(reason) => {
                    result.items_to_skip.push(skipped(item, reason));
                    continue;
                }
            }

            let action = match self.store.find_product_by_external_id(&item.external_id).await {
                Ok(Some(_)) => SyncAction::Update,
                Ok(None) => SyncAction::Create,
                Err(e) => {
                    tracing::warn!(external_id = %item.external_id, error = %e, "Lookup failed during preview");
                    result
                        .errors
                        .push(format!("{} ({}): {}", item.name, item.external_id, e));
                    result
                        .items_to_skip
                        .push(skipped(item, format!("Lookup failed: {}", e)));
                    continue;
                }
            };

            let category = self
                .filter
                .primary_category(item, self.graph)
                .map(|(_, name)| name)
                .unwrap_or(FALLBACK_CATEGORY);

            result.products_to_sync.push(PlannedProduct {
                id: item.external_id.clone(),
                name: item.name.clone(),
                category: category.to_string(),
                action,
            });
        }

        result.summary = PreviewSummary {
            total_products: items.len(),
            will_sync: result.products_to_sync.len(),
            will_skip: result.items_to_skip.len(),
            protected_items: protected,
        };
        result
    }
}

fn skipped(item: &CatalogItem, reason: String) -> SkippedItem {
    SkippedItem {
        id: item.external_id.clone(),
        name: item.name.clone(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterConfig;
    use crate::models::{LocalProduct, ProductData};
    use crate::store::memory::MemoryStore;
    use crate::sync::fixtures;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_plan_classifies_items() {
        let store = MemoryStore::new();
        store.insert_product(LocalProduct::from_data(&ProductData {
            external_id: Some("EMP-1".to_string()),
            name: "Empanada de Carne".to_string(),
            description: None,
            price_minor_units: 900,
            category_id: Uuid::new_v4(),
            images: vec![],
            active: true,
            slug: "empanada-de-carne".to_string(),
        }));
        let snapshot = fixtures::snapshot();
        let graph = snapshot.graph();
        let filter = ProductFilter::new(FilterConfig::default()).unwrap();

        let preview = PreviewPlanner::new(&store, &filter, &graph)
            .plan(&snapshot.items)
            .await;

        assert_eq!(preview.summary.total_products, 5);
        assert_eq!(preview.summary.will_sync, 3);
        assert_eq!(preview.summary.will_skip, 2);
        assert_eq!(preview.summary.protected_items, 1);

        let action_of = |id: &str| {
            preview
                .products_to_sync
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.action)
        };
        assert_eq!(action_of("ALF-1"), Some(SyncAction::Create));
        assert_eq!(action_of("EMP-1"), Some(SyncAction::Update));

        let loose = preview
            .products_to_sync
            .iter()
            .find(|p| p.id == "EMP-LOOSE")
            .unwrap();
        assert_eq!(loose.category, FALLBACK_CATEGORY);

        let protected = preview
            .items_to_skip
            .iter()
            .find(|s| s.id == "CATER-1")
            .unwrap();
        assert!(protected.reason.contains("CATERING- TRAYS"));
        assert!(preview.errors.is_empty());
    }

    #[tokio::test]
    async fn test_plan_never_writes() {
        let store = MemoryStore::new();
        let snapshot = fixtures::snapshot();
        let graph = snapshot.graph();
        let filter = ProductFilter::new(FilterConfig::default()).unwrap();

        PreviewPlanner::new(&store, &filter, &graph)
            .plan(&snapshot.items)
            .await;

        assert_eq!(store.calls().catalog_writes(), 0);
        assert_eq!(store.calls().create_sync_run, 0);
    }
}
