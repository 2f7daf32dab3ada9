//! Turns filtered catalog items into local store writes.
//!
//! Batches run one after another with a short pause between them, and items
//! inside a batch run one at a time. A failing item is logged and counted but
//! never stops its batch or the run.

use uuid::Uuid;

use super::slug::slugify;
use super::stats::RunStats;
use super::SyncError;
use crate::assets::AssetResolver;
use crate::catalog::RelatedObjectGraph;
use crate::filter::{FilterDecision, ProductFilter};
use crate::models::{CatalogItem, CategoryData, ProductData};
use crate::store::LocalStore;

/// Local category for items accepted by name with no resolvable category.
pub const FALLBACK_CATEGORY: &str = "Uncategorized";

const DEFAULT_CATEGORY_ORDER: i64 = 100;

/// Sort order for a newly created local category.
pub fn category_order(name: &str) -> i64 {
    let lower = name.to_lowercase();
    if lower.contains("alfajores") {
        1
    } else if lower.contains("empanadas") {
        2
    } else {
        DEFAULT_CATEGORY_ORDER
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Created,
    Updated,
}

#[derive(Debug, Clone, Copy)]
struct ItemOutcome {
    action: Action,
    has_images: bool,
}

pub struct Reconciler<'a> {
    store: &'a dyn LocalStore,
    filter: &'a ProductFilter,
    graph: &'a RelatedObjectGraph,
}

impl<'a> Reconciler<'a> {
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

    fn dry_run(&self) -> bool {
        self.filter.config().dry_run
    }

    /// Filters `items`, then syncs the accepted ones in batches.
    pub async fn reconcile(&self, items: &[CatalogItem]) -> RunStats {
        let mut stats = RunStats::default();
        let mut accepted = Vec::with_capacity(items.len());

        for item in items {
            match self.filter.decide(item, self.graph) {
                FilterDecision::Sync => accepted.push(item),
                FilterDecision::SkipProtected(reason) => {
                    tracing::debug!(external_id = %item.external_id, %reason, "Skipping protected item");
                    stats.protected += 1;
                }
                FilterDecision::SkipUnmatched(_) => stats.skipped += 1,
            }
        }

        let config = self.filter.config();
        let batch_size = config.effective_batch_size();
        let delay = config.batch_delay();
        let total_batches = accepted.len().div_ceil(batch_size);

        tracing::info!(
            accepted = accepted.len(),
            skipped = stats.skipped,
            protected = stats.protected,
            batches = total_batches,
            dry_run = config.dry_run,
            "Filtered catalog items"
        );

        for (index, batch) in accepted.chunks(batch_size).enumerate() {
            if index > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            tracing::info!(
                batch = index + 1,
                total = total_batches,
                size = batch.len(),
                "Processing batch"
            );
            self.process_batch(batch, &mut stats).await;
            stats.batches += 1;
        }

        stats
    }

    /// Processes one batch sequentially, recording every outcome in `stats`.
    pub async fn process_batch(&self, batch: &[&CatalogItem], stats: &mut RunStats) {
        for item in batch {
            stats.processed += 1;

            match self.filter.decide(item, self.graph) {
                FilterDecision::Sync => {}
                FilterDecision::SkipProtected(reason) => {
                    tracing::warn!(external_id = %item.external_id, %reason, "Protected item reached a batch; skipping");
                    stats.protected += 1;
                    continue;
                }
                FilterDecision::SkipUnmatched(_) => {
                    stats.skipped += 1;
                    continue;
                }
            }

            match self.sync_item(item).await {
                Ok(outcome) => {
                    match outcome.action {
                        Action::Created => stats.created += 1,
                        Action::Updated => stats.updated += 1,
                    }
                    if outcome.has_images {
                        stats.with_images += 1;
                    } else {
                        stats.without_images += 1;
                    }
                }
                Err(e) => {
                    tracing::error!(
                        external_id = %item.external_id,
                        name = %item.name,
                        error = %e,
                        "Failed to sync item"
                    );
                    stats.record_error(format!("{} ({}): {}", item.name, item.external_id, e));
                }
            }
        }
    }

    async fn sync_item(&self, item: &CatalogItem) -> Result<ItemOutcome, SyncError> {
        if item.external_id.trim().is_empty() {
            return Err(SyncError::InvalidItem {
                external_id: item.external_id.clone(),
                reason: "missing external id".to_string(),
            });
        }
        if item.name.trim().is_empty() {
            return Err(SyncError::InvalidItem {
                external_id: item.external_id.clone(),
                reason: "missing name".to_string(),
            });
        }

        let category_id = self.ensure_category(item).await?;

        let price_minor_units = item.listed_price().unwrap_or_else(|| {
            tracing::warn!(
                external_id = %item.external_id,
                "No usable variation price; defaulting to 0"
            );
            0
        });

        let enable_images = self.filter.config().enable_image_sync;
        let resolved_images = enable_images.then(|| {
            AssetResolver::new(self.graph).resolve(&item.image_ref_ids, !item.image_ref_ids.is_empty())
        });

        let existing = self
            .store
            .find_product_by_external_id(&item.external_id)
            .await?;

        let mut data = ProductData {
            external_id: Some(item.external_id.clone()),
            name: item.name.trim().to_string(),
            description: item.description.clone(),
            price_minor_units,
            category_id,
            images: Vec::new(),
            active: item.is_active(),
            slug: String::new(),
        };

        let action = match existing {
            Some(product) => {
                // with image sync off, stored images are left alone
                data.images = resolved_images.unwrap_or_else(|| product.images.clone());
                data.slug = product.slug.clone();
                if !self.dry_run() {
                    self.store.update_product(product.id, &data).await?;
                }
                tracing::debug!(external_id = %item.external_id, product_id = %product.id, "Updated product");
                Action::Updated
            }
            None => {
                data.images = resolved_images.unwrap_or_default();
                data.slug = self.unique_slug(item).await?;
                if !self.dry_run() {
                    let created = self.store.create_product(&data).await?;
                    tracing::debug!(external_id = %item.external_id, product_id = %created.id, "Created product");
                }
                Action::Created
            }
        };

        Ok(ItemOutcome {
            action,
            has_images: !data.images.is_empty(),
        })
    }

    /// Finds or creates the local category for `item`.
    ///
    /// In a dry run a missing category is not created and the nil id is
    /// returned in its place.
    async fn ensure_category(&self, item: &CatalogItem) -> Result<Uuid, SyncError> {
        let (external_id, name) = match self.filter.primary_category(item, self.graph) {
            Some((id, name)) => (Some(id), name),
            None => (None, FALLBACK_CATEGORY),
        };

        let existing = self
            .store
            .find_category_by_name_or_external_id(name, external_id)
            .await?;

        match existing {
            Some(category) => {
                if category.external_id.is_none() && external_id.is_some() && !self.dry_run() {
                    let mut data = category.to_data();
                    data.external_id = external_id.map(String::from);
                    self.store.update_category(category.id, &data).await?;
                    tracing::info!(
                        category = %category.name,
                        external_id = external_id.unwrap_or_default(),
                        "Linked local category to catalog category"
                    );
                }
                Ok(category.id)
            }
            None if self.dry_run() => Ok(Uuid::nil()),
            None => {
                let data = CategoryData {
                    name: name.to_string(),
                    slug: slugify(name),
                    external_id: external_id.map(String::from),
                    order: category_order(name),
                };
                let created = self.store.create_category(&data).await?;
                tracing::info!(category = %created.name, order = created.order, "Created local category");
                Ok(created.id)
            }
        }
    }

    /// Slug for a new product, suffixed with the external id when the plain
    /// slug already belongs to another product.
    async fn unique_slug(&self, item: &CatalogItem) -> Result<String, SyncError> {
        let external = slugify(&item.external_id);
        let base = match slugify(&item.name) {
            s if s.is_empty() => external.clone(),
            s => s,
        };

        match self.store.find_product_by_slug(&base).await? {
            None => Ok(base),
            Some(_) => Ok(format!("{}-{}", base, external)),
        }
    }
}
