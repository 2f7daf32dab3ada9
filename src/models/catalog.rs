//! Catalog items as returned by the external catalog service.
//!
//! These are read-only snapshots rebuilt on every run and never persisted
//! directly; the reconciler derives local product data from them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Storefront visibility of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Unknown,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Private => write!(f, "private"),
            Visibility::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            "" => Err("Empty visibility value".to_string()),
            _ => Ok(Visibility::Unknown),
        }
    }
}

/// A priced variation of a catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ItemVariation {
    pub external_id: String,
    pub name: Option<String>,
    /// Raw listed amount in minor units. The service sends either a
    /// number or a numeric string.
    pub price_amount: Option<Value>,
}

impl ItemVariation {
    /// Parses the listed amount, returning `None` when absent or unparseable.
    pub fn price_minor_units(&self) -> Option<i64> {
        match self.price_amount.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

/// A single product record from the external catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub external_id: String,
    pub name: String,
    pub description: Option<String>,
    pub variations: Vec<ItemVariation>,
    pub image_ref_ids: Vec<String>,
    pub category_ref_ids: Vec<String>,
    /// Single-category reference from older catalog payloads.
    pub legacy_category_id: Option<String>,
    pub is_deleted: bool,
    pub visibility: Visibility,
    pub available_online: bool,
    pub present_at_all_locations: bool,
}

impl CatalogItem {
    pub fn new(external_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            name: name.into(),
            description: None,
            variations: Vec::new(),
            image_ref_ids: Vec::new(),
            category_ref_ids: Vec::new(),
            legacy_category_id: None,
            is_deleted: false,
            visibility: Visibility::Public,
            available_online: true,
            present_at_all_locations: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_categories(mut self, ids: Vec<String>) -> Self {
        self.category_ref_ids = ids;
        self
    }

    pub fn with_legacy_category(mut self, id: impl Into<String>) -> Self {
        self.legacy_category_id = Some(id.into());
        self
    }

    pub fn with_images(mut self, ids: Vec<String>) -> Self {
        self.image_ref_ids = ids;
        self
    }

    pub fn with_variation(mut self, variation: ItemVariation) -> Self {
        self.variations.push(variation);
        self
    }

    /// Union of the list-valued and legacy category references, in
    /// first-seen order with duplicates removed.
    pub fn category_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::with_capacity(self.category_ref_ids.len() + 1);
        let all = self
            .category_ref_ids
            .iter()
            .chain(self.legacy_category_id.iter());
        for id in all {
            if !id.is_empty() && !ids.contains(&id.as_str()) {
                ids.push(id);
            }
        }
        ids
    }

    /// Listed price of the first variation.
    pub fn listed_price(&self) -> Option<i64> {
        self.variations.first()?.price_minor_units()
    }

    /// Whether the item should be sold on the storefront.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
            && self.available_online
            && self.present_at_all_locations
            && self.visibility != Visibility::Private
    }
}
