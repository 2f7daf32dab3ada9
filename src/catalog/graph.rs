//! Index over the related objects returned alongside catalog items.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An auxiliary object referenced by id from catalog items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RelatedObject {
    Category { id: String, name: String },
    Image { id: String, url: String },
}

impl RelatedObject {
    pub fn category(id: impl Into<String>, name: impl Into<String>) -> Self {
        RelatedObject::Category {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn image(id: impl Into<String>, url: impl Into<String>) -> Self {
        RelatedObject::Image {
            id: id.into(),
            url: url.into(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            RelatedObject::Category { id, .. } | RelatedObject::Image { id, .. } => id,
        }
    }
}

/// Categories and images keyed by id, built once per run.
///
/// When the same id appears more than once the last entry wins.
#[derive(Debug, Clone, Default)]
pub struct RelatedObjectGraph {
    categories: HashMap<String, String>,
    images: HashMap<String, String>,
}

impl RelatedObjectGraph {
    pub fn build<I>(objects: I) -> Self
    where
        I: IntoIterator<Item = RelatedObject>,
    {
        let mut graph = Self::default();
        for object in objects {
            match object {
                RelatedObject::Category { id, name } => {
                    graph.categories.insert(id, name);
                }
                RelatedObject::Image { id, url } => {
                    graph.images.insert(id, url);
                }
            }
        }
        graph
    }

    /// Category names by id.
    pub fn categories(&self) -> &HashMap<String, String> {
        &self.categories
    }

    /// Image urls by id.
    pub fn images(&self) -> &HashMap<String, String> {
        &self.images
    }

    pub fn category_name(&self, id: &str) -> Option<&str> {
        self.categories.get(id).map(String::as_str)
    }

    pub fn image_url(&self, id: &str) -> Option<&str> {
        self.images.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.len() + self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
