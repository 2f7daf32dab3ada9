use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A category in the local store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalCategory {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    /// Backfilled the first time a matching external category is seen.
    pub external_id: Option<String>,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryData {
    pub name: String,
    pub slug: String,
    pub external_id: Option<String>,
    pub order: i64,
}

impl LocalCategory {
    pub fn from_data(data: &CategoryData) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            slug: data.slug.clone(),
            external_id: data.external_id.clone(),
            order: data.order,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn to_data(&self) -> CategoryData {
        CategoryData {
            name: self.name.clone(),
            slug: self.slug.clone(),
            external_id: self.external_id.clone(),
            order: self.order,
        }
    }
}
