use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product in the local store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalProduct {
    pub id: Uuid,
    /// `None` for products created by hand rather than by sync.
    pub external_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub price_minor_units: i64,
    pub category_id: Uuid,
    pub images: Vec<String>,
    pub active: bool,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field values written by a create or update.
///
/// `slug` is only applied on create; updates keep the stored slug so
/// storefront links stay stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductData {
    pub external_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub price_minor_units: i64,
    pub category_id: Uuid,
    pub images: Vec<String>,
    pub active: bool,
    pub slug: String,
}

impl LocalProduct {
    pub fn from_data(data: &ProductData) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            external_id: data.external_id.clone(),
            name: data.name.clone(),
            description: data.description.clone(),
            price_minor_units: data.price_minor_units,
            category_id: data.category_id,
            images: data.images.clone(),
            active: data.active,
            slug: data.slug.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies mutable fields from `data`, leaving id, slug and creation
    /// time untouched.
    pub fn apply(&mut self, data: &ProductData) {
        self.external_id = data.external_id.clone();
        self.name = data.name.clone();
        self.description = data.description.clone();
        self.price_minor_units = data.price_minor_units;
        self.category_id = data.category_id;
        self.images = data.images.clone();
        self.active = data.active;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> ProductData {
        ProductData {
            external_id: Some("ITEM1".to_string()),
            name: "Alfajor Clasico".to_string(),
            description: None,
            price_minor_units: 450,
            category_id: Uuid::new_v4(),
            images: vec!["https://img/1.jpg".to_string()],
            active: true,
            slug: "alfajor-clasico".to_string(),
        }
    }

    #[test]
    fn test_apply_keeps_slug_and_id() {
        let mut product = LocalProduct::from_data(&data());
        let id = product.id;

        let mut changed = data();
        changed.name = "Alfajor Clasico x6".to_string();
        changed.slug = "something-else".to_string();
        changed.price_minor_units = 2400;
        product.apply(&changed);

        assert_eq!(product.id, id);
        assert_eq!(product.slug, "alfajor-clasico");
        assert_eq!(product.name, "Alfajor Clasico x6");
        assert_eq!(product.price_minor_units, 2400);
    }
}
