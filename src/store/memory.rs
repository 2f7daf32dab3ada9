//! In-memory store for engine tests.
//!
//! Counts every mutating call and can fail writes for chosen external ids.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use uuid::Uuid;

use super::{LocalStore, StoreError};
use crate::models::{
    CategoryData, LocalCategory, LocalProduct, ProductData, SyncRun, SyncRunUpdate,
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CallCounts {
    pub create_product: usize,
    pub update_product: usize,
    pub create_category: usize,
    pub update_category: usize,
    pub create_sync_run: usize,
    pub update_sync_run: usize,
}

impl CallCounts {
    pub fn catalog_writes(&self) -> usize {
        self.create_product + self.update_product + self.create_category + self.update_category
    }
}

#[derive(Default)]
struct State {
    products: Vec<LocalProduct>,
    categories: Vec<LocalCategory>,
    runs: Vec<SyncRun>,
    calls: CallCounts,
    failing_external_ids: HashSet<String>,
    fail_sync_runs: bool,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Product writes for `external_id` will fail.
    pub fn fail_product(&self, external_id: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_external_ids
            .insert(external_id.to_string());
    }

    /// Every sync-run write will fail.
    pub fn fail_sync_runs(&self) {
        self.state.lock().unwrap().fail_sync_runs = true;
    }

    pub fn calls(&self) -> CallCounts {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn products(&self) -> Vec<LocalProduct> {
        self.state.lock().unwrap().products.clone()
    }

    pub fn categories(&self) -> Vec<LocalCategory> {
        self.state.lock().unwrap().categories.clone()
    }

    pub fn runs(&self) -> Vec<SyncRun> {
        self.state.lock().unwrap().runs.clone()
    }

    pub fn insert_product(&self, product: LocalProduct) {
        self.state.lock().unwrap().products.push(product);
    }

    pub fn insert_category(&self, category: LocalCategory) {
        self.state.lock().unwrap().categories.push(category);
    }
}

fn check_product(state: &State, data: &ProductData) -> Result<(), StoreError> {
    match &data.external_id {
        Some(id) if state.failing_external_ids.contains(id) => {
            Err(StoreError::Rejected(format!("injected failure for {}", id)))
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn find_product_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<LocalProduct>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .products
            .iter()
            .find(|p| p.external_id.as_deref() == Some(external_id))
            .cloned())
    }

    async fn find_product_by_slug(&self, slug: &str) -> Result<Option<LocalProduct>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.products.iter().find(|p| p.slug == slug).cloned())
    }

    async fn create_product(&self, data: &ProductData) -> Result<LocalProduct, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.create_product += 1;
        check_product(&state, data)?;
        if state.products.iter().any(|p| p.slug == data.slug) {
            return Err(StoreError::Rejected(format!("duplicate slug {}", data.slug)));
        }
        let product = LocalProduct::from_data(data);
        state.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: Uuid,
        data: &ProductData,
    ) -> Result<LocalProduct, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.update_product += 1;
        check_product(&state, data)?;
        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("product {}", id)))?;
        product.apply(data);
        Ok(product.clone())
    }

    async fn find_category_by_name_or_external_id(
        &self,
        name: &str,
        external_id: Option<&str>,
    ) -> Result<Option<LocalCategory>, StoreError> {
        let state = self.state.lock().unwrap();
        if let Some(external_id) = external_id {
            if let Some(found) = state
                .categories
                .iter()
                .find(|c| c.external_id.as_deref() == Some(external_id))
            {
                return Ok(Some(found.clone()));
            }
        }
        let key = name.to_lowercase();
        Ok(state
            .categories
            .iter()
            .find(|c| c.name.to_lowercase() == key)
            .cloned())
    }

    async fn create_category(&self, data: &CategoryData) -> Result<LocalCategory, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.create_category += 1;
        let category = LocalCategory::from_data(data);
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: Uuid,
        data: &CategoryData,
    ) -> Result<LocalCategory, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.update_category += 1;
        let category = state
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("category {}", id)))?;
        category.name = data.name.clone();
        category.slug = data.slug.clone();
        category.external_id = data.external_id.clone();
        category.order = data.order;
        Ok(category.clone())
    }

    async fn create_sync_run(&self, run: &SyncRun) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.create_sync_run += 1;
        if state.fail_sync_runs {
            return Err(StoreError::Rejected("sync runs unavailable".to_string()));
        }
        state.runs.push(run.clone());
        Ok(())
    }

    async fn update_sync_run(&self, id: Uuid, update: &SyncRunUpdate) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.update_sync_run += 1;
        if state.fail_sync_runs {
            return Err(StoreError::Rejected("sync runs unavailable".to_string()));
        }
        let run = state
            .runs
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("sync run {}", id)))?;
        run.apply(update);
        Ok(())
    }

    async fn list_sync_runs(&self, limit: u32) -> Result<Vec<SyncRun>, StoreError> {
        let state = self.state.lock().unwrap();
        let mut runs = state.runs.clone();
        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        runs.truncate(limit as usize);
        Ok(runs)
    }
}
