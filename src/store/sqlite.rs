use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

use super::{LocalStore, StoreError};
use crate::models::{
    CategoryData, LocalCategory, LocalProduct, ProductData, RunStatus, SyncRun, SyncRunUpdate,
};

/// Initialize the database connection pool and run migrations
pub async fn init_db(path: &Path) -> Result<SqlitePool, StoreError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite:{}?mode=rwc", path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .foreign_keys(true)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

pub struct SqliteStore {
    pool: SqlitePool,
}

// Row types for database queries
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: String,
    external_id: Option<String>,
    name: String,
    description: Option<String>,
    price_minor_units: i64,
    category_id: String,
    images: String,
    active: bool,
    slug: String,
    created_at: String,
    updated_at: String,
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: String,
    name: String,
    slug: String,
    external_id: Option<String>,
    sort_order: i64,
    created_at: String,
    updated_at: String,
}

#[derive(sqlx::FromRow)]
struct SyncRunRow {
    id: String,
    status: String,
    started_at: String,
    completed_at: Option<String>,
    products_synced: i64,
    products_skipped: i64,
    errors: String,
    metadata: String,
}

fn parse_uuid(value: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(value).map_err(|e| StoreError::InvalidData(format!("{}: {}", value, e)))
}

fn parse_time(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

impl TryFrom<ProductRow> for LocalProduct {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(LocalProduct {
            id: parse_uuid(&row.id)?,
            external_id: row.external_id,
            name: row.name,
            description: row.description,
            price_minor_units: row.price_minor_units,
            category_id: parse_uuid(&row.category_id)?,
            images: serde_json::from_str(&row.images)?,
            active: row.active,
            slug: row.slug,
            created_at: parse_time(&row.created_at),
            updated_at: parse_time(&row.updated_at),
        })
    }
}

impl TryFrom<CategoryRow> for LocalCategory {
    type Error = StoreError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(LocalCategory {
            id: parse_uuid(&row.id)?,
            name: row.name,
            slug: row.slug,
            external_id: row.external_id,
            order: row.sort_order,
            created_at: parse_time(&row.created_at),
            updated_at: parse_time(&row.updated_at),
        })
    }
}

impl TryFrom<SyncRunRow> for SyncRun {
    type Error = StoreError;

    fn try_from(row: SyncRunRow) -> Result<Self, Self::Error> {
        Ok(SyncRun {
            id: parse_uuid(&row.id)?,
            status: RunStatus::from_str(&row.status).map_err(StoreError::InvalidData)?,
            started_at: parse_time(&row.started_at),
            completed_at: row.completed_at.as_deref().map(parse_time),
            products_synced: row.products_synced,
            products_skipped: row.products_skipped,
            errors: serde_json::from_str(&row.errors)?,
            metadata: serde_json::from_str(&row.metadata)?,
        })
    }
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if needed) the database at `path`.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self::new(init_db(path).await?))
    }

    async fn get_product(&self, id: Uuid) -> Result<LocalProduct, StoreError> {
        let row: Option<ProductRow> = sqlx::query_as("SELECT * FROM products WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| StoreError::NotFound(format!("product {}", id)))?
            .try_into()
    }

    async fn get_category(&self, id: Uuid) -> Result<LocalCategory, StoreError> {
        let row: Option<CategoryRow> = sqlx::query_as("SELECT * FROM categories WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| StoreError::NotFound(format!("category {}", id)))?
            .try_into()
    }
}

#[async_trait]
impl LocalStore for SqliteStore {
    async fn find_product_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<LocalProduct>, StoreError> {
        let row: Option<ProductRow> =
            sqlx::query_as("SELECT * FROM products WHERE external_id = ?")
                .bind(external_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(LocalProduct::try_from).transpose()
    }

    async fn find_product_by_slug(&self, slug: &str) -> Result<Option<LocalProduct>, StoreError> {
        let row: Option<ProductRow> = sqlx::query_as("SELECT * FROM products WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        row.map(LocalProduct::try_from).transpose()
    }

    async fn create_product(&self, data: &ProductData) -> Result<LocalProduct, StoreError> {
        let product = LocalProduct::from_data(data);
        let images = serde_json::to_string(&product.images)?;

        sqlx::query(
            r#"
            INSERT INTO products (id, external_id, name, description, price_minor_units, category_id, images, active, slug, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(product.id.to_string())
        .bind(&product.external_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_minor_units)
        .bind(product.category_id.to_string())
        .bind(&images)
        .bind(product.active)
        .bind(&product.slug)
        .bind(product.created_at.to_rfc3339())
        .bind(product.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        self.get_product(product.id).await
    }

    async fn update_product(
        &self,
        id: Uuid,
        data: &ProductData,
    ) -> Result<LocalProduct, StoreError> {
        let images = serde_json::to_string(&data.images)?;
        let updated_at = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET external_id = ?, name = ?, description = ?, price_minor_units = ?,
                category_id = ?, images = ?, active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&data.external_id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price_minor_units)
        .bind(data.category_id.to_string())
        .bind(&images)
        .bind(data.active)
        .bind(&updated_at)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("product {}", id)));
        }

        self.get_product(id).await
    }

    async fn find_category_by_name_or_external_id(
        &self,
        name: &str,
        external_id: Option<&str>,
    ) -> Result<Option<LocalCategory>, StoreError> {
        if let Some(external_id) = external_id {
            let row: Option<CategoryRow> =
                sqlx::query_as("SELECT * FROM categories WHERE external_id = ?")
                    .bind(external_id)
                    .fetch_optional(&self.pool)
                    .await?;
            if let Some(row) = row {
                return LocalCategory::try_from(row).map(Some);
            }
        }

        let row: Option<CategoryRow> = sqlx::query_as(
            "SELECT * FROM categories WHERE name_key = ? ORDER BY created_at LIMIT 1",
        )
        .bind(name.to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        row.map(LocalCategory::try_from).transpose()
    }

    async fn create_category(&self, data: &CategoryData) -> Result<LocalCategory, StoreError> {
        let category = LocalCategory::from_data(data);

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, name_key, slug, external_id, sort_order, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(category.id.to_string())
        .bind(&category.name)
        .bind(category.name.to_lowercase())
        .bind(&category.slug)
        .bind(&category.external_id)
        .bind(category.order)
        .bind(category.created_at.to_rfc3339())
        .bind(category.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        self.get_category(category.id).await
    }

    async fn update_category(
        &self,
        id: Uuid,
        data: &CategoryData,
    ) -> Result<LocalCategory, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = ?, name_key = ?, slug = ?, external_id = ?, sort_order = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&data.name)
        .bind(data.name.to_lowercase())
        .bind(&data.slug)
        .bind(&data.external_id)
        .bind(data.order)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("category {}", id)));
        }

        self.get_category(id).await
    }

    async fn create_sync_run(&self, run: &SyncRun) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO sync_runs (id, status, started_at, completed_at, products_synced, products_skipped, errors, metadata)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(run.id.to_string())
        .bind(run.status.to_string())
        .bind(run.started_at.to_rfc3339())
        .bind(run.completed_at.map(|t| t.to_rfc3339()))
        .bind(run.products_synced)
        .bind(run.products_skipped)
        .bind(serde_json::to_string(&run.errors)?)
        .bind(serde_json::to_string(&run.metadata)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_sync_run(&self, id: Uuid, update: &SyncRunUpdate) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE sync_runs
            SET status = ?, completed_at = ?, products_synced = ?, products_skipped = ?,
                errors = ?, metadata = ?
            WHERE id = ?
            "#,
        )
        .bind(update.status.to_string())
        .bind(update.completed_at.to_rfc3339())
        .bind(update.products_synced)
        .bind(update.products_skipped)
        .bind(serde_json::to_string(&update.errors)?)
        .bind(serde_json::to_string(&update.metadata)?)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("sync run {}", id)));
        }
        Ok(())
    }

    async fn list_sync_runs(&self, limit: u32) -> Result<Vec<SyncRun>, StoreError> {
        let rows: Vec<SyncRunRow> =
            sqlx::query_as("SELECT * FROM sync_runs ORDER BY started_at DESC LIMIT ?")
                .bind(i64::from(limit))
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(SyncRun::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    async fn store() -> (tempfile::TempDir, SqliteStore) {
        let temp_dir = tempdir().unwrap();
        let store = SqliteStore::open(&temp_dir.path().join("test.db"))
            .await
            .unwrap();
        (temp_dir, store)
    }

    fn category_data(name: &str, external_id: Option<&str>) -> CategoryData {
        CategoryData {
            name: name.to_string(),
            slug: name.to_lowercase(),
            external_id: external_id.map(String::from),
            order: 100,
        }
    }

    fn product_data(category_id: Uuid, external_id: &str, slug: &str) -> ProductData {
        ProductData {
            external_id: Some(external_id.to_string()),
            name: "Alfajor Clasico".to_string(),
            description: Some("Dulce de leche".to_string()),
            price_minor_units: 450,
            category_id,
            images: vec!["https://img/a.jpg".to_string(), "https://img/b.jpg".to_string()],
            active: true,
            slug: slug.to_string(),
        }
    }

    #[tokio::test]
    async fn test_init_db_creates_tables() {
        let temp_dir = tempdir().unwrap();
        let pool = init_db(&temp_dir.path().join("nested").join("test.db"))
            .await
            .unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let table_names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert_eq!(table_names, vec!["categories", "products", "sync_runs"]);
    }

    #[tokio::test]
    async fn test_product_create_find_update() {
        let (_dir, store) = store().await;
        let category = store
            .create_category(&category_data("Alfajores", Some("CAT1")))
            .await
            .unwrap();

        let created = store
            .create_product(&product_data(category.id, "ITEM1", "alfajor-clasico"))
            .await
            .unwrap();
        assert_eq!(created.images.len(), 2);
        assert!(created.active);

        let found = store
            .find_product_by_external_id("ITEM1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);

        let mut changed = product_data(category.id, "ITEM1", "ignored-on-update");
        changed.price_minor_units = 500;
        changed.active = false;
        changed.images = vec![];
        let updated = store.update_product(created.id, &changed).await.unwrap();

        assert_eq!(updated.price_minor_units, 500);
        assert!(!updated.active);
        assert!(updated.images.is_empty());
        assert_eq!(updated.slug, "alfajor-clasico");

        assert!(store
            .find_product_by_slug("alfajor-clasico")
            .await
            .unwrap()
            .is_some());
        assert!(store
            .find_product_by_external_id("MISSING")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_external_id_rejected() {
        let (_dir, store) = store().await;
        let category = store
            .create_category(&category_data("Alfajores", None))
            .await
            .unwrap();

        store
            .create_product(&product_data(category.id, "ITEM1", "one"))
            .await
            .unwrap();
        let result = store
            .create_product(&product_data(category.id, "ITEM1", "two"))
            .await;
        assert!(matches!(result, Err(StoreError::Database(_))));
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let (_dir, store) = store().await;
        let category = store
            .create_category(&category_data("Alfajores", None))
            .await
            .unwrap();

        let result = store
            .update_product(Uuid::new_v4(), &product_data(category.id, "ITEM1", "x"))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_category_by_external_id_then_name() {
        let (_dir, store) = store().await;
        let by_ext = store
            .create_category(&category_data("Alfajores", Some("CAT1")))
            .await
            .unwrap();
        let by_name = store
            .create_category(&category_data("Empanadas", None))
            .await
            .unwrap();

        let found = store
            .find_category_by_name_or_external_id("Renamed upstream", Some("CAT1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, by_ext.id);

        let found = store
            .find_category_by_name_or_external_id("EMPANADAS", Some("CAT2"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, by_name.id);

        assert!(store
            .find_category_by_name_or_external_id("Bebidas", None)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_find_category_by_name_folds_non_ascii_case() {
        let (_dir, store) = store().await;
        let category = store
            .create_category(&category_data("Empanadas Salteñas", None))
            .await
            .unwrap();

        let found = store
            .find_category_by_name_or_external_id("EMPANADAS SALTEÑAS", Some("CAT-X"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, category.id);

        let mut data = category.to_data();
        data.name = "Ñoquis".to_string();
        store.update_category(category.id, &data).await.unwrap();
        let found = store
            .find_category_by_name_or_external_id("ñOQUIS", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, category.id);
    }

    #[tokio::test]
    async fn test_update_category_backfills_external_id() {
        let (_dir, store) = store().await;
        let category = store
            .create_category(&category_data("Empanadas", None))
            .await
            .unwrap();

        let mut data = category.to_data();
        data.external_id = Some("CAT2".to_string());
        let updated = store.update_category(category.id, &data).await.unwrap();
        assert_eq!(updated.external_id.as_deref(), Some("CAT2"));
    }

    #[tokio::test]
    async fn test_sync_run_lifecycle() {
        let (_dir, store) = store().await;
        let run = SyncRun::start(Uuid::new_v4(), Utc::now(), json!({"config": {}}));
        store.create_sync_run(&run).await.unwrap();

        let update = SyncRunUpdate {
            status: RunStatus::Succeeded,
            completed_at: Utc::now(),
            products_synced: 4,
            products_skipped: 2,
            errors: vec!["ITEM9: boom".to_string()],
            metadata: json!({"outcome": "succeeded"}),
        };
        store.update_sync_run(run.id, &update).await.unwrap();

        let runs = store.list_sync_runs(10).await.unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].status, RunStatus::Succeeded);
        assert_eq!(runs[0].products_synced, 4);
        assert_eq!(runs[0].errors, vec!["ITEM9: boom".to_string()]);
        assert_eq!(runs[0].metadata["outcome"], "succeeded");
        assert!(runs[0].completed_at.is_some());
    }

    #[tokio::test]
    async fn test_update_missing_sync_run() {
        let (_dir, store) = store().await;
        let update = SyncRunUpdate {
            status: RunStatus::Failed,
            completed_at: Utc::now(),
            products_synced: 0,
            products_skipped: 0,
            errors: vec![],
            metadata: json!({}),
        };
        let result = store.update_sync_run(Uuid::new_v4(), &update).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }
}
